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

//! Indexers: Newznab, Torznab, Gazelle, Redacted, ...

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint};
use tf_provider::value::{ValueBool, ValueList, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, Diagnostics};

use crate::client::ApiResource;
use crate::fields::{field_registry, Field, FieldError, HasFields, Nesting, Registry, ValueFloat};
use crate::generic::{
    bool_attribute, common_attributes, known_or, number_attribute, numbers_of, or_default,
    set_of, string_attribute, string_of, string_value, validate_common, validate_one_of,
    FieldPayload, ResourceKind,
};

const PROTOCOLS: &[&str] = &["usenet", "torrent"];
const DEFAULT_PRIORITY: i64 = 25;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexerPayload {
    pub id: i64,
    pub name: String,
    pub implementation: String,
    pub config_contract: String,
    pub protocol: String,
    pub priority: i64,
    pub download_client_id: i64,
    pub enable_rss: bool,
    pub enable_automatic_search: bool,
    pub enable_interactive_search: bool,
    pub tags: Vec<i64>,
    pub fields: Vec<Field>,
}

impl ApiResource for IndexerPayload {
    const PATH: &'static str = "indexer";
    const FORCE_SAVE: bool = true;
}

impl FieldPayload for IndexerPayload {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerState {
    pub id: ValueNumber,
    pub name: ValueString<'static>,
    pub implementation: ValueString<'static>,
    pub config_contract: ValueString<'static>,
    pub protocol: ValueString<'static>,
    pub priority: ValueNumber,
    pub download_client_id: ValueNumber,
    pub enable_rss: ValueBool,
    pub enable_automatic_search: ValueBool,
    pub enable_interactive_search: ValueBool,
    pub tags: ValueSet<ValueNumber>,

    pub allow_zero_size: ValueBool,
    pub ranked_only: ValueBool,
    pub use_freeleech_token: ValueBool,
    pub delay: ValueNumber,
    pub early_release_limit: ValueNumber,
    pub minimum_seeders: ValueNumber,
    pub seed_time: ValueNumber,
    pub discography_seed_time: ValueNumber,
    pub seed_ratio: ValueFloat,
    pub additional_parameters: ValueString<'static>,
    pub api_key: ValueString<'static>,
    pub api_path: ValueString<'static>,
    pub base_url: ValueString<'static>,
    pub captcha_token: ValueString<'static>,
    pub cookie: ValueString<'static>,
    pub passkey: ValueString<'static>,
    pub password: ValueString<'static>,
    pub user_agent: ValueString<'static>,
    pub username: ValueString<'static>,
    pub categories: ValueList<ValueNumber>,
    pub required_flags: ValueList<ValueNumber>,
}

field_registry! {
    static INDEXER_FIELDS: Registry<IndexerState> = ("indexer", Nesting::Flat) {
        Bool "allowZeroSize" => allow_zero_size,
        Bool "rankedOnly" => ranked_only,
        Bool "useFreeleechToken" => use_freeleech_token,
        Int "delay" => delay,
        Int "earlyReleaseLimit" => early_release_limit,
        Int "minimumSeeders" => minimum_seeders,
        Int "seedCriteria.seedTime" => seed_time,
        Int "seedCriteria.discographySeedTime" => discography_seed_time,
        Float "seedCriteria.seedRatio" => seed_ratio,
        String "additionalParameters" => additional_parameters,
        String "apiKey" => api_key [sensitive],
        String "apiPath" => api_path,
        String "baseUrl" => base_url,
        String "captchaToken" => captcha_token,
        String "cookie" => cookie [sensitive],
        String "passkey" => passkey [sensitive],
        String "password" => password [sensitive],
        String "userAgent" => user_agent,
        String "username" => username,
        IntList "categories" => categories,
        IntList "requiredFlags" => required_flags,
    }
}

impl HasFields for IndexerState {
    fn registry() -> &'static Registry<Self> {
        &INDEXER_FIELDS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Indexer;

impl ResourceKind for Indexer {
    const NAME: &'static str = "indexer";
    const DESCRIPTION: &'static str = "Lidarr indexer";

    type Payload = IndexerPayload;
    type State = IndexerState;

    fn attributes() -> HashMap<String, Attribute> {
        let mut attributes = common_attributes(Self::NAME);
        attributes.extend::<HashMap<String, Attribute>>(map! {
            "protocol" => string_attribute(
                "Protocol of the indexer, either `usenet` or `torrent`",
                AttributeConstraint::Required,
            ),
            "priority" => number_attribute(
                "Priority of the indexer, from 1 (highest) to 50",
                AttributeConstraint::OptionalComputed,
            ),
            "download_client_id" => number_attribute(
                "Download client to use for the releases of this indexer, 0 for any",
                AttributeConstraint::OptionalComputed,
            ),
            "enable_rss" => bool_attribute("Use the indexer for RSS syncs"),
            "enable_automatic_search" => bool_attribute("Use the indexer for automatic searches"),
            "enable_interactive_search" => bool_attribute("Use the indexer for interactive searches")
        });
        attributes
    }

    fn id(state: &IndexerState) -> &ValueNumber {
        &state.id
    }
    fn id_mut(state: &mut IndexerState) -> &mut ValueNumber {
        &mut state.id
    }
    fn name(state: &IndexerState) -> &ValueString<'static> {
        &state.name
    }
    fn implementation(state: &IndexerState) -> &ValueString<'static> {
        &state.implementation
    }
    fn config_contract(state: &IndexerState) -> &ValueString<'static> {
        &state.config_contract
    }

    fn validate(diags: &mut Diagnostics, state: &IndexerState) {
        validate_common::<Self>(diags, state);
        validate_one_of(diags, "protocol", &state.protocol, PROTOCOLS);
    }

    fn plan(state: &mut IndexerState) {
        or_default(&mut state.priority, DEFAULT_PRIORITY);
        or_default(&mut state.download_client_id, 0);
        or_default(&mut state.enable_rss, true);
        or_default(&mut state.enable_automatic_search, true);
        or_default(&mut state.enable_interactive_search, true);
        or_default(&mut state.tags, Default::default());
    }

    fn to_payload(state: &IndexerState, fields: Vec<Field>) -> IndexerPayload {
        IndexerPayload {
            id: known_or(&state.id, 0),
            name: string_of(&state.name),
            implementation: string_of(&state.implementation),
            config_contract: string_of(&state.config_contract),
            protocol: string_of(&state.protocol),
            priority: known_or(&state.priority, DEFAULT_PRIORITY),
            download_client_id: known_or(&state.download_client_id, 0),
            enable_rss: known_or(&state.enable_rss, true),
            enable_automatic_search: known_or(&state.enable_automatic_search, true),
            enable_interactive_search: known_or(&state.enable_interactive_search, true),
            tags: numbers_of(&state.tags),
            fields,
        }
    }

    fn apply_payload(state: &mut IndexerState, payload: &IndexerPayload) -> Result<(), FieldError> {
        state.id = payload.id.into();
        state.name = string_value(&payload.name);
        state.implementation = string_value(&payload.implementation);
        state.config_contract = string_value(&payload.config_contract);
        state.protocol = string_value(&payload.protocol);
        state.priority = payload.priority.into();
        state.download_client_id = payload.download_client_id.into();
        state.enable_rss = payload.enable_rss.into();
        state.enable_automatic_search = payload.enable_automatic_search.into();
        state.enable_interactive_search = payload.enable_interactive_search.into();
        state.tags = set_of(&payload.tags);
        state.set_fields(&payload.fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tf_provider::value::Value;

    use super::*;
    use crate::generic::assert_consistent;

    fn newznab() -> IndexerPayload {
        serde_json::from_value(json!({
            "id": 3,
            "name": "NZBgeek",
            "implementation": "Newznab",
            "implementationName": "Newznab",
            "configContract": "NewznabSettings",
            "infoLink": "https://wiki.servarr.com/lidarr/supported#newznab",
            "protocol": "usenet",
            "priority": 10,
            "downloadClientId": 0,
            "enableRss": true,
            "enableAutomaticSearch": false,
            "enableInteractiveSearch": true,
            "supportsRss": true,
            "supportsSearch": true,
            "tags": [1],
            "fields": [
                {"order": 0, "name": "baseUrl", "label": "URL", "value": "https://api.nzbgeek.info"},
                {"order": 1, "name": "apiPath", "value": "/api"},
                {"order": 2, "name": "apiKey", "value": "********", "privacy": "apiKey"},
                {"order": 3, "name": "categories", "value": [3000, 3010]},
                {"order": 4, "name": "earlyReleaseLimit"},
                {"order": 5, "name": "additionalParameters"},
                {"order": 6, "name": "seedCriteria.seedRatio", "value": 1.5},
                {"order": 7, "name": "seedCriteria.seedTime", "value": 60},
                {"order": 8, "name": "unusedField", "value": "ignored"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn consistent() {
        assert_consistent::<Indexer>();
    }

    #[test]
    fn apply_server_payload() {
        let mut state = IndexerState {
            api_key: Value::Value("my-secret".into()),
            ..Default::default()
        };
        Indexer::apply_payload(&mut state, &newznab()).unwrap();

        assert_eq!(state.id, Value::Value(3));
        assert_eq!(state.name, Value::Value("NZBgeek".into()));
        assert_eq!(state.protocol, Value::Value("usenet".into()));
        assert_eq!(state.enable_automatic_search, Value::Value(false));
        assert_eq!(state.tags, set_of(&[1]));
        assert_eq!(state.base_url, Value::Value("https://api.nzbgeek.info".into()));
        assert_eq!(state.api_key, Value::Value("my-secret".into()));
        assert_eq!(state.seed_ratio, Value::Value(1.5));
        assert_eq!(state.seed_time, Value::Value(60));
        assert_eq!(
            state.categories,
            Value::Value(vec![Value::Value(3000), Value::Value(3010)])
        );
        assert_eq!(state.early_release_limit, Value::Null);
    }

    #[test]
    fn payload_carries_core_attributes_and_fields() {
        let mut state = IndexerState::default();
        Indexer::apply_payload(&mut state, &newznab()).unwrap();
        let payload = Indexer::to_payload(&state, state.to_fields());

        assert_eq!(payload.id, 3);
        assert_eq!(payload.priority, 10);
        assert_eq!(payload.tags, vec![1]);
        let names: Vec<&str> = payload.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "seedCriteria.seedTime",
                "seedCriteria.seedRatio",
                "apiPath",
                "baseUrl",
                "categories"
            ]
        );

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["configContract"], "NewznabSettings");
        assert_eq!(body["enableInteractiveSearch"], true);
    }

    #[test]
    fn plan_fills_server_defaults() {
        let mut state = IndexerState {
            priority: Value::Value(5),
            enable_rss: Value::Value(false),
            ..Default::default()
        };
        Indexer::plan(&mut state);

        assert_eq!(state.priority, Value::Value(5));
        assert_eq!(state.download_client_id, Value::Value(0));
        assert_eq!(state.enable_rss, Value::Value(false));
        assert_eq!(state.enable_automatic_search, Value::Value(true));
        assert_eq!(state.tags, Value::Value(Default::default()));
    }

    #[test]
    fn protocol_is_checked() {
        let mut state = IndexerState {
            name: Value::Value("NZBgeek".into()),
            implementation: Value::Value("Newznab".into()),
            config_contract: Value::Value("NewznabSettings".into()),
            protocol: Value::Value("usenet".into()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        Indexer::validate(&mut diags, &state);
        assert!(diags.errors.is_empty());

        state.protocol = Value::Value("ftp".into());
        state.name = Value::Value("".into());
        Indexer::validate(&mut diags, &state);
        assert_eq!(diags.errors.len(), 2);
    }
}
