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


//! Tags, attached by identifier to the other resources

use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueNumber, ValueString};
use tf_provider::map;

use crate::client::ApiResource;

mod data_source;
mod resource;

pub use data_source::TagDataSource;
pub use resource::TagResource;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagPayload {
    pub id: i64,
    pub label: String,
}

impl ApiResource for TagPayload {
    const PATH: &'static str = "tag";
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagState {
    pub id: ValueNumber,
    pub label: ValueString<'static>,
}

impl TagState {
    fn apply(&mut self, payload: &TagPayload) {
        self.id = payload.id.into();
        self.label = Value::Value(payload.label.clone().into());
    }
}

/// Tag labels are stored lowercased by the server
fn normalize(label: &str) -> String {
    label.trim().to_lowercase()
}

fn schema(id: AttributeConstraint, label: AttributeConstraint) -> Schema {
    Schema {
        version: 1,
        block: Block {
            version: 1,
            attributes: map! {
                "id" => Attribute {
                    attr_type: AttributeType::Number,
                    description: Description::plain("Identifier of the tag"),
                    constraint: id,
                    ..Default::default()
                },
                "label" => Attribute {
                    attr_type: AttributeType::String,
                    description: Description::plain("Label of the tag, in lowercase"),
                    constraint: label,
                    ..Default::default()
                }
            },
            description: Description::plain("Lidarr tag"),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn schema_matches_state() {
        let serialized = serde_json::to_value(TagState::default()).unwrap();
        let keys: BTreeSet<&String> = serialized.as_object().unwrap().keys().collect();
        let schema = schema(AttributeConstraint::Computed, AttributeConstraint::Required);
        let attributes: BTreeSet<&String> = schema.block.attributes.keys().collect();
        assert_eq!(keys, attributes);
    }

    #[test]
    fn apply_payload() {
        let mut state = TagState::default();
        state.apply(&TagPayload {
            id: 2,
            label: String::from("flac"),
        });
        assert_eq!(state.id, Value::Value(2));
        assert_eq!(state.label, Value::Value("flac".into()));
        assert_eq!(normalize(" Lossless "), "lossless");
    }
}
