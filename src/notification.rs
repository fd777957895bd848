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

//! Notifications (connections): Discord, Email, Webhook, Telegram, ...

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::Attribute;
use tf_provider::value::{ValueBool, ValueList, ValueNumber, ValueSet, ValueString};

use crate::client::ApiResource;
use crate::fields::{field_registry, Field, FieldError, HasFields, Nesting, Registry};
use crate::generic::{
    bool_attribute, common_attributes, known_or, numbers_of, or_default, set_of, string_of,
    string_value, FieldPayload, ResourceKind,
};

/// Events a notification can subscribe to, as `(attribute, description)`
const EVENTS: &[(&str, &str)] = &[
    ("on_grab", "Notify when a release is grabbed"),
    ("on_release_import", "Notify when a release is imported"),
    ("on_upgrade", "Notify when a release is upgraded"),
    ("on_rename", "Notify when files are renamed"),
    ("on_artist_delete", "Notify when an artist is deleted"),
    ("on_album_delete", "Notify when an album is deleted"),
    ("on_health_issue", "Notify on health check failures"),
    ("on_health_restored", "Notify when a health check failure is resolved"),
    ("on_download_failure", "Notify when a download fails"),
    ("on_import_failure", "Notify when an import fails"),
    ("on_track_retag", "Notify when track tags are updated"),
    ("on_application_update", "Notify when Lidarr is updated"),
    ("include_health_warnings", "Include health warnings, not only errors"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPayload {
    pub id: i64,
    pub name: String,
    pub implementation: String,
    pub config_contract: String,
    pub on_grab: bool,
    pub on_release_import: bool,
    pub on_upgrade: bool,
    pub on_rename: bool,
    pub on_artist_delete: bool,
    pub on_album_delete: bool,
    pub on_health_issue: bool,
    pub on_health_restored: bool,
    pub on_download_failure: bool,
    pub on_import_failure: bool,
    pub on_track_retag: bool,
    pub on_application_update: bool,
    pub include_health_warnings: bool,
    pub tags: Vec<i64>,
    pub fields: Vec<Field>,
}

impl ApiResource for NotificationPayload {
    const PATH: &'static str = "notification";
    const FORCE_SAVE: bool = true;
}

impl FieldPayload for NotificationPayload {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationState {
    pub id: ValueNumber,
    pub name: ValueString<'static>,
    pub implementation: ValueString<'static>,
    pub config_contract: ValueString<'static>,
    pub on_grab: ValueBool,
    pub on_release_import: ValueBool,
    pub on_upgrade: ValueBool,
    pub on_rename: ValueBool,
    pub on_artist_delete: ValueBool,
    pub on_album_delete: ValueBool,
    pub on_health_issue: ValueBool,
    pub on_health_restored: ValueBool,
    pub on_download_failure: ValueBool,
    pub on_import_failure: ValueBool,
    pub on_track_retag: ValueBool,
    pub on_application_update: ValueBool,
    pub include_health_warnings: ValueBool,
    pub tags: ValueSet<ValueNumber>,

    pub always_update: ValueBool,
    pub clean_library: ValueBool,
    pub notify: ValueBool,
    pub require_encryption: ValueBool,
    pub send_silently: ValueBool,
    pub update_library: ValueBool,
    pub use_ssl: ValueBool,
    pub port: ValueNumber,
    pub method: ValueNumber,
    pub priority: ValueNumber,
    pub display_time: ValueNumber,
    pub retry: ValueNumber,
    pub expire: ValueNumber,
    pub access_token: ValueString<'static>,
    pub api_key: ValueString<'static>,
    pub author: ValueString<'static>,
    pub avatar: ValueString<'static>,
    pub bot_token: ValueString<'static>,
    pub chat_id: ValueString<'static>,
    pub from: ValueString<'static>,
    pub host: ValueString<'static>,
    pub mention: ValueString<'static>,
    pub password: ValueString<'static>,
    pub path: ValueString<'static>,
    pub server: ValueString<'static>,
    pub sound: ValueString<'static>,
    pub token: ValueString<'static>,
    pub url: ValueString<'static>,
    pub user_key: ValueString<'static>,
    pub username: ValueString<'static>,
    pub web_hook_url: ValueString<'static>,
    pub grab_fields: ValueList<ValueNumber>,
    pub import_fields: ValueList<ValueNumber>,
    pub bcc: ValueList<ValueString<'static>>,
    pub cc: ValueList<ValueString<'static>>,
    pub devices: ValueList<ValueString<'static>>,
    pub to: ValueList<ValueString<'static>>,
}

field_registry! {
    static NOTIFICATION_FIELDS: Registry<NotificationState> = ("notification", Nesting::Flat) {
        Bool "alwaysUpdate" => always_update,
        Bool "cleanLibrary" => clean_library,
        Bool "notify" => notify,
        Bool "requireEncryption" => require_encryption,
        Bool "sendSilently" => send_silently,
        Bool "updateLibrary" => update_library,
        Bool "useSsl" => use_ssl,
        Int "port" => port,
        Int "method" => method,
        Int "priority" => priority,
        Int "displayTime" => display_time,
        Int "retry" => retry,
        Int "expire" => expire,
        String "accessToken" => access_token [sensitive],
        String "apiKey" => api_key [sensitive],
        String "author" => author,
        String "avatar" => avatar,
        String "botToken" => bot_token [sensitive],
        String "chatId" => chat_id,
        String "from" => from,
        String "host" => host,
        String "mention" => mention,
        String "password" => password [sensitive],
        String "path" => path,
        String "server" => server,
        String "sound" => sound,
        String "token" => token [sensitive],
        String "url" => url,
        String "userKey" => user_key [sensitive],
        String "username" => username,
        String "webHookUrl" => web_hook_url [sensitive],
        IntList "grabFields" => grab_fields,
        IntList "importFields" => import_fields,
        StringList "bcc" => bcc,
        StringList "cc" => cc,
        StringList "devices" => devices,
        StringList "to" => to,
    }
}

impl HasFields for NotificationState {
    fn registry() -> &'static Registry<Self> {
        &NOTIFICATION_FIELDS
    }
}

impl NotificationState {
    fn events_mut(&mut self) -> [&mut ValueBool; 13] {
        [
            &mut self.on_grab,
            &mut self.on_release_import,
            &mut self.on_upgrade,
            &mut self.on_rename,
            &mut self.on_artist_delete,
            &mut self.on_album_delete,
            &mut self.on_health_issue,
            &mut self.on_health_restored,
            &mut self.on_download_failure,
            &mut self.on_import_failure,
            &mut self.on_track_retag,
            &mut self.on_application_update,
            &mut self.include_health_warnings,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Notification;

impl ResourceKind for Notification {
    const NAME: &'static str = "notification";
    const DESCRIPTION: &'static str = "Lidarr notification";

    type Payload = NotificationPayload;
    type State = NotificationState;

    fn attributes() -> HashMap<String, Attribute> {
        let mut attributes = common_attributes(Self::NAME);
        attributes.extend(
            EVENTS
                .iter()
                .map(|&(name, description)| (name.to_owned(), bool_attribute(description))),
        );
        attributes
    }

    fn id(state: &NotificationState) -> &ValueNumber {
        &state.id
    }
    fn id_mut(state: &mut NotificationState) -> &mut ValueNumber {
        &mut state.id
    }
    fn name(state: &NotificationState) -> &ValueString<'static> {
        &state.name
    }
    fn implementation(state: &NotificationState) -> &ValueString<'static> {
        &state.implementation
    }
    fn config_contract(state: &NotificationState) -> &ValueString<'static> {
        &state.config_contract
    }

    fn plan(state: &mut NotificationState) {
        for event in state.events_mut() {
            or_default(event, false);
        }
        or_default(&mut state.tags, Default::default());
    }

    fn to_payload(state: &NotificationState, fields: Vec<Field>) -> NotificationPayload {
        NotificationPayload {
            id: known_or(&state.id, 0),
            name: string_of(&state.name),
            implementation: string_of(&state.implementation),
            config_contract: string_of(&state.config_contract),
            on_grab: known_or(&state.on_grab, false),
            on_release_import: known_or(&state.on_release_import, false),
            on_upgrade: known_or(&state.on_upgrade, false),
            on_rename: known_or(&state.on_rename, false),
            on_artist_delete: known_or(&state.on_artist_delete, false),
            on_album_delete: known_or(&state.on_album_delete, false),
            on_health_issue: known_or(&state.on_health_issue, false),
            on_health_restored: known_or(&state.on_health_restored, false),
            on_download_failure: known_or(&state.on_download_failure, false),
            on_import_failure: known_or(&state.on_import_failure, false),
            on_track_retag: known_or(&state.on_track_retag, false),
            on_application_update: known_or(&state.on_application_update, false),
            include_health_warnings: known_or(&state.include_health_warnings, false),
            tags: numbers_of(&state.tags),
            fields,
        }
    }

    fn apply_payload(
        state: &mut NotificationState,
        payload: &NotificationPayload,
    ) -> Result<(), FieldError> {
        state.id = payload.id.into();
        state.name = string_value(&payload.name);
        state.implementation = string_value(&payload.implementation);
        state.config_contract = string_value(&payload.config_contract);
        state.on_grab = payload.on_grab.into();
        state.on_release_import = payload.on_release_import.into();
        state.on_upgrade = payload.on_upgrade.into();
        state.on_rename = payload.on_rename.into();
        state.on_artist_delete = payload.on_artist_delete.into();
        state.on_album_delete = payload.on_album_delete.into();
        state.on_health_issue = payload.on_health_issue.into();
        state.on_health_restored = payload.on_health_restored.into();
        state.on_download_failure = payload.on_download_failure.into();
        state.on_import_failure = payload.on_import_failure.into();
        state.on_track_retag = payload.on_track_retag.into();
        state.on_application_update = payload.on_application_update.into();
        state.include_health_warnings = payload.include_health_warnings.into();
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

    #[test]
    fn consistent() {
        assert_consistent::<Notification>();
    }

    #[test]
    fn events_cover_the_payload() {
        let state = NotificationState::default();
        let serialized = serde_json::to_value(&state).unwrap();
        for (event, _) in EVENTS {
            assert!(serialized.get(*event).is_some(), "{event}");
        }
        let mut state = state;
        assert_eq!(state.events_mut().len(), EVENTS.len());
    }

    #[test]
    fn email_lists() {
        let payload: NotificationPayload = serde_json::from_value(json!({
            "id": 7,
            "name": "mail",
            "implementation": "Email",
            "configContract": "EmailSettings",
            "onGrab": true,
            "onHealthIssue": true,
            "supportsOnGrab": true,
            "fields": [
                {"name": "server", "value": "smtp.example.com"},
                {"name": "port", "value": 587},
                {"name": "requireEncryption", "value": true},
                {"name": "from", "value": "lidarr@example.com"},
                {"name": "to", "value": ["me@example.com", "you@example.com"]},
                {"name": "cc", "value": []}
            ]
        }))
        .unwrap();

        let mut state = NotificationState::default();
        Notification::apply_payload(&mut state, &payload).unwrap();
        assert_eq!(state.on_grab, Value::Value(true));
        assert_eq!(state.on_upgrade, Value::Value(false));
        assert_eq!(
            state.to,
            Value::Value(vec![
                Value::Value("me@example.com".into()),
                Value::Value("you@example.com".into())
            ])
        );
        assert_eq!(state.cc, Value::Value(vec![]));

        let body = serde_json::to_value(Notification::to_payload(&state, state.to_fields())).unwrap();
        assert_eq!(body["onGrab"], true);
        assert_eq!(body["onHealthIssue"], true);
        assert_eq!(
            body["fields"],
            json!([
                {"name": "requireEncryption", "value": true},
                {"name": "port", "value": 587},
                {"name": "from", "value": "lidarr@example.com"},
                {"name": "server", "value": "smtp.example.com"},
                {"name": "cc", "value": []},
                {"name": "to", "value": ["me@example.com", "you@example.com"]}
            ])
        );
    }

    #[test]
    fn plan_disables_unset_events() {
        let mut state = NotificationState {
            on_grab: Value::Value(true),
            ..Default::default()
        };
        Notification::plan(&mut state);
        assert_eq!(state.on_grab, Value::Value(true));
        assert_eq!(state.on_rename, Value::Value(false));
        assert_eq!(state.tags, Value::Value(Default::default()));
    }
}
