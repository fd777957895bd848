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
use tf_provider::value::{ValueBool, ValueList, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, Diagnostics};

use crate::client::ApiResource;
use crate::fields::{field_registry, Field, FieldError, HasFields, Nesting, Registry};
use crate::generic::{
    bool_attribute, common_attributes, known_or, number_attribute, numbers_of, or_default,
    set_of, string_attribute, string_of, string_value, validate_common, validate_one_of,
    FieldPayload, ResourceKind,
};

const PROTOCOLS: &[&str] = &["usenet", "torrent"];
const DEFAULT_PRIORITY: i64 = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DownloadClientPayload {
    pub id: i64,
    pub name: String,
    pub implementation: String,
    pub config_contract: String,
    pub protocol: String,
    pub priority: i64,
    pub enable: bool,
    pub remove_completed_downloads: bool,
    pub remove_failed_downloads: bool,
    pub tags: Vec<i64>,
    pub fields: Vec<Field>,
}

impl ApiResource for DownloadClientPayload {
    const PATH: &'static str = "downloadclient";
    const FORCE_SAVE: bool = true;
}

impl FieldPayload for DownloadClientPayload {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadClientState {
    pub id: ValueNumber,
    pub name: ValueString<'static>,
    pub implementation: ValueString<'static>,
    pub config_contract: ValueString<'static>,
    pub protocol: ValueString<'static>,
    pub priority: ValueNumber,
    pub enable: ValueBool,
    pub remove_completed_downloads: ValueBool,
    pub remove_failed_downloads: ValueBool,
    pub tags: ValueSet<ValueNumber>,

    pub add_paused: ValueBool,
    pub add_stopped: ValueBool,
    pub first_and_last: ValueBool,
    pub read_only: ValueBool,
    pub save_magnet_files: ValueBool,
    pub sequential_order: ValueBool,
    pub start_on_add: ValueBool,
    pub use_ssl: ValueBool,
    pub port: ValueNumber,
    pub initial_state: ValueNumber,
    pub recent_music_priority: ValueNumber,
    pub older_music_priority: ValueNumber,
    pub host: ValueString<'static>,
    pub url_base: ValueString<'static>,
    pub api_key: ValueString<'static>,
    pub username: ValueString<'static>,
    pub password: ValueString<'static>,
    pub music_category: ValueString<'static>,
    pub music_imported_category: ValueString<'static>,
    pub music_directory: ValueString<'static>,
    pub destination: ValueString<'static>,
    pub nzb_folder: ValueString<'static>,
    pub strm_folder: ValueString<'static>,
    pub torrent_folder: ValueString<'static>,
    pub watch_folder: ValueString<'static>,
    pub magnet_file_extension: ValueString<'static>,
    pub additional_tags: ValueList<ValueNumber>,
}

field_registry! {
    static DOWNLOAD_CLIENT_FIELDS: Registry<DownloadClientState> = ("download client", Nesting::Flat) {
        Bool "addPaused" => add_paused,
        Bool "addStopped" => add_stopped,
        Bool "firstAndLast" => first_and_last,
        Bool "readOnly" => read_only,
        Bool "saveMagnetFiles" => save_magnet_files,
        Bool "sequentialOrder" => sequential_order,
        Bool "startOnAdd" => start_on_add,
        Bool "useSsl" => use_ssl,
        Int "port" => port,
        Int "initialState" => initial_state,
        Int "recentMusicPriority" => recent_music_priority,
        Int "olderMusicPriority" => older_music_priority,
        String "host" => host,
        String "urlBase" => url_base,
        String "apiKey" => api_key [sensitive],
        String "username" => username,
        String "password" => password [sensitive],
        String "musicCategory" => music_category,
        String "musicImportedCategory" => music_imported_category,
        String "musicDirectory" => music_directory,
        String "destination" => destination,
        String "nzbFolder" => nzb_folder,
        String "strmFolder" => strm_folder,
        String "torrentFolder" => torrent_folder,
        String "watchFolder" => watch_folder,
        String "magnetFileExtension" => magnet_file_extension,
        IntList "additionalTags" => additional_tags,
    }
}

impl HasFields for DownloadClientState {
    fn registry() -> &'static Registry<Self> {
        &DOWNLOAD_CLIENT_FIELDS
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DownloadClient;

impl ResourceKind for DownloadClient {
    const NAME: &'static str = "download_client";
    const DESCRIPTION: &'static str = "Lidarr download client";

    type Payload = DownloadClientPayload;
    type State = DownloadClientState;

    fn attributes() -> HashMap<String, Attribute> {
        let mut attributes = common_attributes("download client");
        attributes.extend::<HashMap<String, Attribute>>(map! {
            "protocol" => string_attribute(
                "Protocol of the download client, either `usenet` or `torrent`",
                AttributeConstraint::Required,
            ),
            "priority" => number_attribute(
                "Priority of the download client, from 1 (highest) to 50",
                AttributeConstraint::OptionalComputed,
            ),
            "enable" => bool_attribute("Enable the download client"),
            "remove_completed_downloads" => bool_attribute("Remove the imported downloads from the client history"),
            "remove_failed_downloads" => bool_attribute("Remove the failed downloads from the client history")
        });
        attributes
    }

    fn id(state: &DownloadClientState) -> &ValueNumber {
        &state.id
    }
    fn id_mut(state: &mut DownloadClientState) -> &mut ValueNumber {
        &mut state.id
    }
    fn name(state: &DownloadClientState) -> &ValueString<'static> {
        &state.name
    }
    fn implementation(state: &DownloadClientState) -> &ValueString<'static> {
        &state.implementation
    }
    fn config_contract(state: &DownloadClientState) -> &ValueString<'static> {
        &state.config_contract
    }

    fn validate(diags: &mut Diagnostics, state: &DownloadClientState) {
        validate_common::<Self>(diags, state);
        validate_one_of(diags, "protocol", &state.protocol, PROTOCOLS);
    }

    fn plan(state: &mut DownloadClientState) {
        or_default(&mut state.priority, DEFAULT_PRIORITY);
        or_default(&mut state.enable, true);
        or_default(&mut state.remove_completed_downloads, true);
        or_default(&mut state.remove_failed_downloads, true);
        or_default(&mut state.tags, Default::default());
    }

    fn to_payload(state: &DownloadClientState, fields: Vec<Field>) -> DownloadClientPayload {
        DownloadClientPayload {
            id: known_or(&state.id, 0),
            name: string_of(&state.name),
            implementation: string_of(&state.implementation),
            config_contract: string_of(&state.config_contract),
            protocol: string_of(&state.protocol),
            priority: known_or(&state.priority, DEFAULT_PRIORITY),
            enable: known_or(&state.enable, true),
            remove_completed_downloads: known_or(&state.remove_completed_downloads, true),
            remove_failed_downloads: known_or(&state.remove_failed_downloads, true),
            tags: numbers_of(&state.tags),
            fields,
        }
    }

    fn apply_payload(
        state: &mut DownloadClientState,
        payload: &DownloadClientPayload,
    ) -> Result<(), FieldError> {
        state.id = payload.id.into();
        state.name = string_value(&payload.name);
        state.implementation = string_value(&payload.implementation);
        state.config_contract = string_value(&payload.config_contract);
        state.protocol = string_value(&payload.protocol);
        state.priority = payload.priority.into();
        state.enable = payload.enable.into();
        state.remove_completed_downloads = payload.remove_completed_downloads.into();
        state.remove_failed_downloads = payload.remove_failed_downloads.into();
        state.tags = set_of(&payload.tags);
        state.set_fields(&payload.fields)
    }
}
