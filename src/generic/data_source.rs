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
use tf_provider::value::ValueEmpty;
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::fields::{resolve_unknown_fields, HasFields};
use crate::provider::ClientHandle;
use crate::utils::report_error;

use super::{data_source_attributes, field_attributes, FieldPayload, ResourceKind};

/// Terraform data source looking up a server object of kind `K` by name
pub struct FieldDataSource<K> {
    client: ClientHandle,
    kind: PhantomData<fn() -> K>,
}

impl<K> FieldDataSource<K> {
    pub fn new(client: ClientHandle) -> Self {
        Self {
            client,
            kind: PhantomData,
        }
    }
}

impl<K: ResourceKind> FieldDataSource<K> {
    pub fn data_source_schema() -> Schema {
        let mut attributes = data_source_attributes(K::attributes());
        attributes.extend(field_attributes(
            K::State::registry(),
            AttributeConstraint::Computed,
        ));
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
}

#[async_trait]
impl<K: ResourceKind> DataSource for FieldDataSource<K> {
    type State<'a> = K::State;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Self::data_source_schema())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let Some(name) = K::name(&config).as_deref_option() else {
            diags.error_short(
                format!("The name of the {} is not known", K::NAME),
                AttributePath::new("name"),
            );
            return None;
        };

        let candidates = match client.list::<K::Payload>().await {
            Ok(candidates) => candidates,
            Err(err) => {
                report_error(diags, format!("Failed to list {}s", K::NAME), err);
                return None;
            }
        };

        let Some(payload) = candidates.iter().find(|candidate| candidate.name() == name) else {
            diags.error(
                format!("No {} named `{name}`", K::NAME),
                format!(
                    "Lidarr knows {} {}s, none of them is named `{name}`",
                    candidates.len(),
                    K::NAME
                ),
                AttributePath::new("name"),
            );
            return None;
        };

        let mut state = K::State::default();
        if let Err(err) = K::apply_payload(&mut state, payload) {
            report_error(diags, format!("Invalid {} `{name}` returned by Lidarr", K::NAME), err);
            return None;
        }
        resolve_unknown_fields(K::State::registry(), &mut state);
        Some(state)
    }
}
