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
use std::env;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{
    Attribute, AttributeConstraint, AttributeType, Block, Description, Schema,
};
use tf_provider::value::{Value, ValueEmpty, ValueNumber, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Provider};

use crate::client::{Client, DEFAULT_TIMEOUT};
use crate::download_client::DownloadClient;
use crate::generic::{FieldDataSource, FieldResource};
use crate::import_list::ImportList;
use crate::indexer::Indexer;
use crate::notification::Notification;
use crate::tag::{TagDataSource, TagResource};

pub const URL_ENV: &str = "LIDARR_URL";
pub const API_KEY_ENV: &str = "LIDARR_API_KEY";

/// Client shared between the provider and its resources
///
/// Resources are built before the provider is configured, so they receive an empty handle that
/// [`LidarrProvider::configure`] fills later on.
#[derive(Debug, Clone, Default)]
pub struct ClientHandle(Arc<RwLock<Option<Client>>>);

impl ClientHandle {
    pub fn new(client: Client) -> Self {
        Self(Arc::new(RwLock::new(Some(client))))
    }

    pub fn set(&self, client: Client) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    /// Configured client, or an error diagnostic
    pub fn get(&self, diags: &mut Diagnostics) -> Option<Client> {
        let client = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if client.is_none() {
            diags.root_error(
                "Provider is not configured",
                "The lidarr provider must be configured before its resources are used",
            );
        }
        client
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub url: ValueString<'static>,
    pub api_key: ValueString<'static>,
    pub timeout: ValueNumber,
}

/// Configuration once the environment fallbacks are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    fn check(&self, diags: &mut Diagnostics) {
        if let Some(url) = self.url.as_deref_option() {
            if let Err(err) = url::Url::parse(url) {
                diags.error(
                    "Invalid Lidarr url",
                    format!("`{url}` is not a valid url: {err}"),
                    AttributePath::new("url"),
                );
            }
        }
        if let Value::Value(timeout) = self.timeout {
            if timeout <= 0 {
                diags.error(
                    "Invalid timeout",
                    format!("The timeout must be a positive number of seconds, got {timeout}"),
                    AttributePath::new("timeout"),
                );
            }
        }
        if self.api_key.as_deref_option() == Some("") {
            diags.error_short("`api_key` must not be empty", AttributePath::new("api_key"));
        }
    }

    /// Fill the unset values from the environment, as returned by `lookup`
    pub fn resolve<F>(&self, diags: &mut Diagnostics, lookup: F) -> Option<Settings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut setting = |value: &ValueString<'static>, attribute: &'static str, var: &str| {
            match value {
                Value::Value(value) => Some(value.to_string()),
                Value::Null => match lookup(var).filter(|value| !value.is_empty()) {
                    Some(value) => Some(value),
                    None => {
                        diags.error(
                            format!("Missing `{attribute}`"),
                            format!(
                                "Set `{attribute}` in the provider block, or the {var} environment variable"
                            ),
                            AttributePath::new(attribute),
                        );
                        None
                    }
                },
                Value::Unknown => {
                    diags.error(
                        format!("Unknown `{attribute}`"),
                        "The value must be known when the provider is configured",
                        AttributePath::new(attribute),
                    );
                    None
                }
            }
        };
        let url = setting(&self.url, "url", URL_ENV);
        let api_key = setting(&self.api_key, "api_key", API_KEY_ENV);

        let timeout = match self.timeout {
            Value::Value(seconds) => Duration::from_secs(seconds.max(1).unsigned_abs()),
            _ => DEFAULT_TIMEOUT,
        };
        Some(Settings {
            url: url?,
            api_key: api_key?,
            timeout,
        })
    }
}

#[derive(Debug, Default, Clone)]
pub struct LidarrProvider {
    client: ClientHandle,
}

impl LidarrProvider {
    pub fn client(&self) -> &ClientHandle {
        &self.client
    }
}

#[async_trait]
impl Provider for LidarrProvider {
    type Config<'a> = ProviderConfig;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(Schema {
            version: 1,
            block: Block {
                version: 1,
                attributes: map! {
                    "url" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::markdown(format!(
                            "Base url of the Lidarr server, for instance `http://localhost:8686`. Defaults to `{URL_ENV}`"
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "api_key" => Attribute {
                        attr_type: AttributeType::String,
                        description: Description::markdown(format!(
                            "API key of the Lidarr server. Defaults to `{API_KEY_ENV}`"
                        )),
                        constraint: AttributeConstraint::Optional,
                        sensitive: true,
                        ..Default::default()
                    },
                    "timeout" => Attribute {
                        attr_type: AttributeType::Number,
                        description: Description::plain(format!(
                            "Timeout of the requests, in seconds. Defaults to {}",
                            DEFAULT_TIMEOUT.as_secs()
                        )),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    }
                },
                description: Description::plain("lidarr"),
                ..Default::default()
            },
        })
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config.check(diags);

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let settings = config.resolve(diags, |var| env::var(var).ok())?;
        match Client::new(&settings.url, settings.api_key, settings.timeout) {
            Ok(client) => {
                tracing::info!(
                    url = client.base().as_str(),
                    terraform_version = terraform_version.as_str(),
                    "lidarr provider configured"
                );
                self.client.set(client);
                Some(())
            }
            Err(err) => {
                crate::utils::report_error(diags, "Failed to configure the Lidarr client", err);
                None
            }
        }
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::DynamicResource>>> {
        let client = &self.client;
        Some(map! {
            "indexer" => FieldResource::<Indexer>::new(client.clone()),
            "download_client" => FieldResource::<DownloadClient>::new(client.clone()),
            "notification" => FieldResource::<Notification>::new(client.clone()),
            "import_list" => FieldResource::<ImportList>::new(client.clone()),
            "tag" => TagResource::new(client.clone())
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<HashMap<String, Box<dyn tf_provider::DynamicDataSource>>> {
        let client = &self.client;
        Some(map! {
            "indexer" => FieldDataSource::<Indexer>::new(client.clone()),
            "download_client" => FieldDataSource::<DownloadClient>::new(client.clone()),
            "notification" => FieldDataSource::<Notification>::new(client.clone()),
            "import_list" => FieldDataSource::<ImportList>::new(client.clone()),
            "tag" => TagDataSource::new(client.clone())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            vars.iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn explicit_values_win() {
        let config = ProviderConfig {
            url: Value::Value("http://lidarr:8686".into()),
            api_key: Value::Value("abc".into()),
            timeout: Value::Value(5),
        };
        let mut diags = Diagnostics::default();
        let settings = config
            .resolve(&mut diags, env(&[(URL_ENV, "http://other"), (API_KEY_ENV, "def")]))
            .unwrap();
        assert_eq!(
            settings,
            Settings {
                url: String::from("http://lidarr:8686"),
                api_key: String::from("abc"),
                timeout: Duration::from_secs(5),
            }
        );
    }

    #[test]
    fn environment_fallback() {
        let mut diags = Diagnostics::default();
        let settings = ProviderConfig::default()
            .resolve(&mut diags, env(&[(URL_ENV, "http://other"), (API_KEY_ENV, "def")]))
            .unwrap();
        assert_eq!(settings.url, "http://other");
        assert_eq!(settings.api_key, "def");
        assert_eq!(settings.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_values_are_all_reported() {
        let mut diags = Diagnostics::default();
        let settings = ProviderConfig::default().resolve(&mut diags, env(&[(URL_ENV, "")]));
        assert!(settings.is_none());
        assert_eq!(diags.errors.len(), 2);
    }

    #[test]
    fn unknown_values_are_rejected() {
        let config = ProviderConfig {
            url: Value::Unknown,
            api_key: Value::Value("abc".into()),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        assert!(config.resolve(&mut diags, env(&[])).is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[test]
    fn check_known_values() {
        let config = ProviderConfig {
            url: Value::Value("not a url".into()),
            api_key: Value::Value("".into()),
            timeout: Value::Value(0),
        };
        let mut diags = Diagnostics::default();
        config.check(&mut diags);
        assert_eq!(diags.errors.len(), 3);

        let mut diags = Diagnostics::default();
        ProviderConfig::default().check(&mut diags);
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn unconfigured_handle() {
        let handle = ClientHandle::default();
        let mut diags = Diagnostics::default();
        assert!(handle.get(&mut diags).is_none());
        assert_eq!(diags.errors.len(), 1);

        let client = Client::new("http://localhost:8686", "abc", DEFAULT_TIMEOUT).unwrap();
        handle.set(client);
        let mut diags = Diagnostics::default();
        assert!(handle.clone().get(&mut diags).is_some());
        assert!(diags.errors.is_empty());
    }

    #[test]
    fn registers_every_kind() {
        let provider = LidarrProvider::default();
        let mut diags = Diagnostics::default();
        let mut resources: Vec<String> = provider
            .get_resources(&mut diags)
            .unwrap()
            .into_keys()
            .collect();
        resources.sort();
        assert_eq!(
            resources,
            ["download_client", "import_list", "indexer", "notification", "tag"]
        );
        assert_eq!(provider.get_data_sources(&mut diags).unwrap().len(), 5);
    }
}
