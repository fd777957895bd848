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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint};
use tf_provider::value::{Value, ValueBool, ValueList, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, Diagnostics};

use crate::client::ApiResource;
use crate::fields::{field_registry, Field, FieldError, HasFields, Nesting, Registry};
use crate::generic::{
    bool_attribute, common_attributes, known_or, number_attribute, numbers_of, or_default,
    or_unknown, set_of, string_attribute, string_of, string_value, validate_common,
    validate_one_of, FieldPayload, ResourceKind,
};

const SHOULD_MONITOR: &[&str] = &["none", "specificAlbum", "entireArtist"];
const MONITOR_NEW_ITEMS: &[&str] = &["none", "all", "new"];
const LIST_TYPES: &[&str] = &["program", "spotify", "lastFm", "other", "advanced"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportListPayload {
    pub id: i64,
    pub name: String,
    pub implementation: String,
    pub config_contract: String,
    pub enable_automatic_add: bool,
    pub should_monitor: String,
    pub should_monitor_existing: bool,
    pub should_search: bool,
    pub monitor_new_items: String,
    pub root_folder_path: String,
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    /// Derived from the implementation when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<String>,
    pub list_order: i64,
    pub tags: Vec<i64>,
    pub fields: Vec<Field>,
}

impl ApiResource for ImportListPayload {
    const PATH: &'static str = "importlist";
    const FORCE_SAVE: bool = true;
}

impl FieldPayload for ImportListPayload {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportListState {
    pub id: ValueNumber,
    pub name: ValueString<'static>,
    pub implementation: ValueString<'static>,
    pub config_contract: ValueString<'static>,
    pub enable_automatic_add: ValueBool,
    pub should_monitor: ValueString<'static>,
    pub should_monitor_existing: ValueBool,
    pub should_search: ValueBool,
    pub monitor_new_items: ValueString<'static>,
    pub root_folder_path: ValueString<'static>,
    pub quality_profile_id: ValueNumber,
    pub metadata_profile_id: ValueNumber,
    pub list_type: ValueString<'static>,
    pub list_order: ValueNumber,
    pub tags: ValueSet<ValueNumber>,

    pub access_token: ValueString<'static>,
    pub api_key: ValueString<'static>,
    pub base_url: ValueString<'static>,
    pub expires: ValueString<'static>,
    pub list_id: ValueString<'static>,
    pub refresh_token: ValueString<'static>,
    pub series_id: ValueString<'static>,
    pub tag_id: ValueString<'static>,
    pub user_id: ValueString<'static>,
    pub profile_ids: ValueList<ValueNumber>,
    pub tag_ids: ValueList<ValueNumber>,
    pub playlist_ids: ValueList<ValueString<'static>>,
}

field_registry! {
    static IMPORT_LIST_FIELDS: Registry<ImportListState> = ("import list", Nesting::Flat) {
        String "accessToken" => access_token [sensitive],
        String "apiKey" => api_key [sensitive],
        String "baseUrl" => base_url,
        String "expires" => expires,
        String "listId" => list_id,
        String "refreshToken" => refresh_token [sensitive],
        String "seriesId" => series_id,
        String "tagId" => tag_id,
        String "userId" => user_id,
        IntList "profileIds" => profile_ids,
        IntList "tagIds" => tag_ids,
        StringList "playlistIds" => playlist_ids,
    }
}

impl HasFields for ImportListState {
    fn registry() -> &'static Registry<Self> {
        &IMPORT_LIST_FIELDS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportList;

impl ResourceKind for ImportList {
    const NAME: &'static str = "import_list";
    const DESCRIPTION: &'static str = "Lidarr import list";

    type Payload = ImportListPayload;
    type State = ImportListState;

    fn attributes() -> HashMap<String, Attribute> {
        let mut attributes = common_attributes("import list");
        attributes.extend::<HashMap<String, Attribute>>(map! {
            "enable_automatic_add" => bool_attribute("Add the artists of the list to the library"),
            "should_monitor" => string_attribute(
                "What to monitor on added artists: `none`, `specificAlbum` or `entireArtist`",
                AttributeConstraint::OptionalComputed,
            ),
            "should_monitor_existing" => bool_attribute("Also monitor the artists already in the library"),
            "should_search" => bool_attribute("Search for the albums once added"),
            "monitor_new_items" => string_attribute(
                "Albums to monitor when they are released: `none`, `all` or `new`",
                AttributeConstraint::OptionalComputed,
            ),
            "root_folder_path" => string_attribute(
                "Root folder of the added artists",
                AttributeConstraint::Required,
            ),
            "quality_profile_id" => number_attribute(
                "Quality profile of the added artists",
                AttributeConstraint::Required,
            ),
            "metadata_profile_id" => number_attribute(
                "Metadata profile of the added artists",
                AttributeConstraint::Required,
            ),
            "list_type" => string_attribute(
                "Family of the list, derived from the implementation",
                AttributeConstraint::OptionalComputed,
            ),
            "list_order" => number_attribute(
                "Ordering of the list",
                AttributeConstraint::OptionalComputed,
            )
        });
        attributes
    }

    fn id(state: &ImportListState) -> &ValueNumber {
        &state.id
    }
    fn id_mut(state: &mut ImportListState) -> &mut ValueNumber {
        &mut state.id
    }
    fn name(state: &ImportListState) -> &ValueString<'static> {
        &state.name
    }
    fn implementation(state: &ImportListState) -> &ValueString<'static> {
        &state.implementation
    }
    fn config_contract(state: &ImportListState) -> &ValueString<'static> {
        &state.config_contract
    }

    fn validate(diags: &mut Diagnostics, state: &ImportListState) {
        validate_common::<Self>(diags, state);
        validate_one_of(diags, "should_monitor", &state.should_monitor, SHOULD_MONITOR);
        validate_one_of(diags, "monitor_new_items", &state.monitor_new_items, MONITOR_NEW_ITEMS);
        validate_one_of(diags, "list_type", &state.list_type, LIST_TYPES);
    }

    fn plan(state: &mut ImportListState) {
        or_default(&mut state.enable_automatic_add, true);
        or_default(&mut state.should_monitor, "entireArtist".into());
        or_default(&mut state.should_monitor_existing, false);
        or_default(&mut state.should_search, true);
        or_default(&mut state.monitor_new_items, "none".into());
        or_default(&mut state.list_order, 0);
        or_default(&mut state.tags, Default::default());
        or_unknown(&mut state.list_type);
    }

    fn to_payload(state: &ImportListState, fields: Vec<Field>) -> ImportListPayload {
        ImportListPayload {
            id: known_or(&state.id, 0),
            name: string_of(&state.name),
            implementation: string_of(&state.implementation),
            config_contract: string_of(&state.config_contract),
            enable_automatic_add: known_or(&state.enable_automatic_add, true),
            should_monitor: known_or(&state.should_monitor, "entireArtist".into()).into_owned(),
            should_monitor_existing: known_or(&state.should_monitor_existing, false),
            should_search: known_or(&state.should_search, true),
            monitor_new_items: known_or(&state.monitor_new_items, "none".into()).into_owned(),
            root_folder_path: string_of(&state.root_folder_path),
            quality_profile_id: known_or(&state.quality_profile_id, 0),
            metadata_profile_id: known_or(&state.metadata_profile_id, 0),
            list_type: state.list_type.as_deref_option().map(str::to_owned),
            list_order: known_or(&state.list_order, 0),
            tags: numbers_of(&state.tags),
            fields,
        }
    }

    fn apply_payload(
        state: &mut ImportListState,
        payload: &ImportListPayload,
    ) -> Result<(), FieldError> {
        state.id = payload.id.into();
        state.name = string_value(&payload.name);
        state.implementation = string_value(&payload.implementation);
        state.config_contract = string_value(&payload.config_contract);
        state.enable_automatic_add = payload.enable_automatic_add.into();
        state.should_monitor = string_value(&payload.should_monitor);
        state.should_monitor_existing = payload.should_monitor_existing.into();
        state.should_search = payload.should_search.into();
        state.monitor_new_items = string_value(&payload.monitor_new_items);
        state.root_folder_path = string_value(&payload.root_folder_path);
        state.quality_profile_id = payload.quality_profile_id.into();
        state.metadata_profile_id = payload.metadata_profile_id.into();
        state.list_type = match &payload.list_type {
            Some(list_type) => string_value(list_type),
            None => Value::Null,
        };
        state.list_order = payload.list_order.into();
        state.tags = set_of(&payload.tags);
        state.set_fields(&payload.fields)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::generic::assert_consistent;

    fn spotify() -> ImportListState {
        ImportListState {
            name: Value::Value("Discover Weekly".into()),
            implementation: Value::Value("SpotifyPlaylist".into()),
            config_contract: Value::Value("SpotifyPlaylistSettings".into()),
            root_folder_path: Value::Value("/music".into()),
            quality_profile_id: Value::Value(1),
            metadata_profile_id: Value::Value(2),
            access_token: Value::Value("token".into()),
            playlist_ids: Value::Value(vec![Value::Value("37i9dQZEVXcJZyENOWUFo7".into())]),
            ..Default::default()
        }
    }

    #[test]
    fn consistent() {
        assert_consistent::<ImportList>();
    }

    #[test]
    fn planned_payload() {
        let mut state = spotify();
        ImportList::plan(&mut state);
        assert!(state.list_type.is_unknown());
        assert_eq!(state.should_monitor, Value::Value("entireArtist".into()));

        let body = serde_json::to_value(ImportList::to_payload(&state, state.to_fields())).unwrap();
        assert!(body.get("listType").is_none());
        assert_eq!(body["rootFolderPath"], "/music");
        assert_eq!(body["monitorNewItems"], "none");
        assert_eq!(
            body["fields"],
            json!([
                {"name": "accessToken", "value": "token"},
                {"name": "playlistIds", "value": ["37i9dQZEVXcJZyENOWUFo7"]}
            ])
        );
    }

    #[test]
    fn server_fills_the_list_type() {
        let mut state = spotify();
        ImportList::plan(&mut state);
        let mut payload = ImportList::to_payload(&state, state.to_fields());
        payload.id = 4;
        payload.list_type = Some(String::from("spotify"));
        payload.fields[0].value = Some(json!("********"));

        ImportList::apply_payload(&mut state, &payload).unwrap();
        assert_eq!(state.id, Value::Value(4));
        assert_eq!(state.list_type, Value::Value("spotify".into()));
        assert_eq!(state.access_token, Value::Value("token".into()));
    }

    #[test]
    fn enums_are_checked() {
        let mut diags = Diagnostics::default();
        ImportList::validate(&mut diags, &spotify());
        assert!(diags.errors.is_empty());

        let state = ImportListState {
            should_monitor: Value::Value("everything".into()),
            monitor_new_items: Value::Unknown,
            ..spotify()
        };
        ImportList::validate(&mut diags, &state);
        assert_eq!(diags.errors.len(), 1);
    }
}
