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


use async_trait::async_trait;
use tf_provider::schema::{AttributeConstraint, Schema};
use tf_provider::value::{Value, ValueEmpty};
use tf_provider::{AttributePath, Diagnostics, Resource};

use crate::client::Client;
use crate::provider::ClientHandle;
use crate::utils::{parse_import_id, report_error};

use super::{normalize, schema, TagPayload, TagState};

pub struct TagResource {
    client: ClientHandle,
}

impl TagResource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    fn known_id(diags: &mut Diagnostics, state: &TagState) -> Option<i64> {
        match state.id {
            Value::Value(id) => Some(id),
            _ => {
                diags.error_short("The tag has no known identifier", AttributePath::new("id"));
                None
            }
        }
    }

    async fn save(
        diags: &mut Diagnostics,
        client: &Client,
        id: Option<i64>,
        mut state: TagState,
    ) -> Option<TagState> {
        let payload = TagPayload {
            id: id.unwrap_or_default(),
            label: state.label.as_deref_option().unwrap_or_default().to_owned(),
        };
        let saved = match id {
            None => client.create(&payload).await,
            Some(id) => client.update(id, &payload).await,
        };
        match saved {
            Ok(saved) => {
                state.apply(&saved);
                Some(state)
            }
            Err(err) => {
                report_error(diags, format!("Failed to save tag `{}`", payload.label), err);
                None
            }
        }
    }
}

#[async_trait]
impl Resource for TagResource {
    type State<'a> = TagState;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(schema(
            AttributeConstraint::Computed,
            AttributeConstraint::Required,
        ))
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        if let Some(label) = config.label.as_deref_option() {
            if label.is_empty() {
                diags.error_short("`label` must not be empty", AttributePath::new("label"));
            } else if normalize(label) != label {
                diags.error(
                    "Invalid tag label",
                    format!("Lidarr stores labels in lowercase, use `{}`", normalize(label)),
                    AttributePath::new("label"),
                );
            }
        }

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

        match client.get::<TagPayload>(id).await {
            Ok(payload) => {
                let mut state = state;
                state.apply(&payload);
                Some((state, private_state))
            }
            Err(err) if err.is_not_found() => {
                tracing::info!(id, "tag vanished, removing it from state");
                None
            }
            Err(err) => {
                report_error(diags, format!("Failed to read tag {id}"), err);
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
        state.id = Value::Unknown;
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
        state.id = prior_state.id;
        Some((state, prior_private_state, vec![]))
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
        let state = Self::save(diags, &client, None, planned_state).await?;
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
        let state = Self::save(diags, &client, Some(id), planned_state).await?;
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

        match client.delete::<TagPayload>(id).await {
            Ok(()) => Some(()),
            Err(err) if err.is_not_found() => Some(()),
            Err(err) => {
                report_error(diags, format!("Failed to delete tag {id}"), err);
                None
            }
        }
    }

    async fn import<'a>(
        &self,
        diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = TagState {
            id: Value::Value(parse_import_id(diags, &id)?),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}
