// This file is part of the terraform-provider-lidarr project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::marker::PhantomData;

use async_trait::async_trait;
use tf_provider::schema::{AttributeConstraint, Block, Description, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::Client;
use crate::fields::{mark_unknown_fields, reset_fields, resolve_unknown_fields, HasFields};
use crate::provider::ClientHandle;
use crate::utils::{parse_import_id, report_error};

use super::{field_attributes, FieldPayload, ResourceKind};

/// Terraform resource managing one server object of kind `K`
pub struct FieldResource<K> {
    client: ClientHandle,
    kind: PhantomData<fn() -> K>,
}

impl<K> FieldResource<K> {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> FieldResource<K> {
    pub fn resource_schema() -> Schema {
        let mut attributes = field_attributes(
            K::State::registry(),
            AttributeConstraint::OptionalComputed,
        );
        attributes.extend(K::attributes());
        Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes,
                description: Description::plain(K::DESCRIPTION),
                ..Default::default()
            },
        }
    }

    /// Store the server answer into `state`, then settle the attributes the answer did not cover
    fn apply(diags: &mut Diagnostics, state: &mut K::State, payload: &K::Payload) -> Option<()> {
        if let Err(err) = K::apply_payload(state, payload) {
            report_error(
                diags,
                format!("Invalid {} `{}` returned by Lidarr", K::NAME, payload.name()),
                err,
            );
            return None;
        }
        resolve_unknown_fields(K::State::registry(), state);
        Some(())
    }

    fn known_id(diags: &mut Diagnostics, state: &K::State) -> Option<i64> {
        match K::id(state) {
            Value::Value(id) => Some(*id),
            _ => {
                diags.error_short(
                    format!("The {} has no known identifier", K::NAME),
                    AttributePath::new("id"),
                );
                None
            }
        }
    }

    async fn save(
        &self,
        diags: &mut Diagnostics,
        client: &Client,
        id: Option<i64>,
        mut state: K::State,
    ) -> Option<K::State> {
        let payload = K::to_payload(&state, state.to_fields());
        let (action, saved) = match id {
            None => ("create", client.create(&payload).await),
            Some(id) => ("update", client.update(id, &payload).await),
        };
        match saved {
            Ok(saved) => {
                tracing::info!(kind = K::NAME, id = saved.id(), "{action}d {}", K::NAME);
                Self::apply(diags, &mut state, &saved)?;
                Some(state)
            }
            Err(err) => {
                report_error(
                    diags,
                    format!("Failed to {action} {} `{}`", K::NAME, payload.name()),
                    err,
                );
                None
            }
        }
    }
}

#[async_trait]
impl<K: ResourceKind> Resource for FieldResource<K> {
    type State<'a> = K::State;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Self::resource_schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        K::validate(diags, &config);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let id = Self::known_id(diags, &state)?;

        match client.get::<K::Payload>(id).await {
            Ok(payload) => {
                let mut state = state;
                reset_fields(K::State::registry(), &mut state);
                Self::apply(diags, &mut state, &payload)?;
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(kind = K::NAME, id, "{} vanished, removing it from state", K::NAME);
                None
            }
            Err(err) => {
                report_error(diags, format!("Failed to read {} {id}", K::NAME), err);
                None
            }
        }
    }

    async fn plan_create<'a>(
        &self,
        _diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = proposed_state;
        *K::id_mut(&mut state) = Value::Unknown;
        K::plan(&mut state);
        mark_unknown_fields(K::State::registry(), &mut state);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        _diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let mut state = proposed_state;
        *K::id_mut(&mut state) = *K::id(&prior_state);

        // The server cannot switch an object to another implementation
        let mut trigger_replace = Vec::new();
        if K::implementation(&state) != K::implementation(&prior_state) {
            trigger_replace.push(AttributePath::new("implementation"));
        }
        if K::config_contract(&state) != K::config_contract(&prior_state) {
            trigger_replace.push(AttributePath::new("config_contract"));
        }

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::PrivateState<'a>> {
        Some(prior_private_state)
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let state = self.save(diags, &client, None, planned_state).await?;
        Some((state, planned_private_state))
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let client = self.client.get(diags)?;
        let id = Self::known_id(diags, &prior_state)?;
        let state = self.save(diags, &client, Some(id), planned_state).await?;
        Some((state, planned_private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        _planned_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let client = self.client.get(diags)?;
        let id = Self::known_id(diags, &prior_state)?;

        match client.delete::<K::Payload>(id).await {
            Ok(()) => Some(()),
            Err(err) if err.is_not_found() => {
                tracing::info!(kind = K::NAME, id, "{} already deleted", K::NAME);
                Some(())
            }
            Err(err) => {
                report_error(diags, format!("Failed to delete {} {id}", K::NAME), err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let mut state = K::State::default();
        *K::id_mut(&mut state) = Value::Value(parse_import_id(diags, &id)?);
        Some((state, Default::default()))
    }
}
