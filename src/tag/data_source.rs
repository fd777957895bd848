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
use tf_provider::value::ValueEmpty;
use tf_provider::{AttributePath, DataSource, Diagnostics};

use crate::provider::ClientHandle;
use crate::utils::report_error;

use super::{normalize, schema, TagPayload, TagState};

/// Look a tag up by label
pub struct TagDataSource {
    client: ClientHandle,
}

impl TagDataSource {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TagDataSource {
    type State<'a> = TagState;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(schema(
            AttributeConstraint::Computed,
            AttributeConstraint::Required,
        ))
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let client = self.client.get(diags)?;
        let Some(label) = config.label.as_deref_option().map(normalize) else {
            diags.error_short("The label of the tag is not known", AttributePath::new("label"));
            return None;
        };

        let tags = match client.list::<TagPayload>().await {
            Ok(tags) => tags,
            Err(err) => {
                report_error(diags, "Failed to list tags", err);
                return None;
            }
        };

        match tags.iter().find(|tag| normalize(&tag.label) == label) {
            Some(tag) => {
                let mut state = TagState::default();
                state.apply(tag);
                // Keep the label as configured, the match ignores the case
                state.label = config.label;
                Some(state)
            }
            None => {
                diags.error_short(format!("No tag labelled `{label}`"), AttributePath::new("label"));
                None
            }
        }
    }
}
