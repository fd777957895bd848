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

//! Minimal asynchronous client for the Lidarr `/api/v1` REST endpoints

use std::fmt::Debug;
use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

mod error;

pub use error::ClientError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-Api-Key";

/// Payload served by one collection endpoint of the API
pub trait ApiResource: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Endpoint name under `/api/v1`
    const PATH: &'static str;
    /// Ask the server to store the object without testing its connectivity first
    const FORCE_SAVE: bool = false;
}

#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.base.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Client {
    pub fn new<K: Into<String>>(
        base: &str,
        api_key: K,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let base = Url::parse(base).map_err(|err| ClientError::InvalidUrl {
            url: base.to_owned(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: base.to_string(),
                reason: String::from("expected an http(s) url"),
            });
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("terraform-provider-lidarr/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base,
            api_key: api_key.into(),
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub async fn list<R: ApiResource>(&self) -> Result<Vec<R>, ClientError> {
        let url = self.endpoint(R::PATH, None, false)?;
        let body = self.execute(self.request(Method::GET, url.clone())).await?;
        decode(url, &body)
    }

    pub async fn get<R: ApiResource>(&self, id: i64) -> Result<R, ClientError> {
        let url = self.endpoint(R::PATH, Some(id), false)?;
        let body = self.execute(self.request(Method::GET, url.clone())).await?;
        decode(url, &body)
    }

    pub async fn create<R: ApiResource>(&self, resource: &R) -> Result<R, ClientError> {
        let url = self.endpoint(R::PATH, None, R::FORCE_SAVE)?;
        let request = self.request(Method::POST, url.clone()).json(resource);
        let body = self.execute(request).await?;
        decode(url, &body)
    }

    pub async fn update<R: ApiResource>(&self, id: i64, resource: &R) -> Result<R, ClientError> {
        let url = self.endpoint(R::PATH, Some(id), R::FORCE_SAVE)?;
        let request = self.request(Method::PUT, url.clone()).json(resource);
        let body = self.execute(request).await?;
        decode(url, &body)
    }

    pub async fn delete<R: ApiResource>(&self, id: i64) -> Result<(), ClientError> {
        let url = self.endpoint(R::PATH, Some(id), false)?;
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str, id: Option<i64>, force_save: bool) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl {
                    url: self.base.to_string(),
                    reason: String::from("cannot be a base"),
                })?;
            segments.pop_if_empty().extend(["api", "v1", path]);
            if let Some(id) = id {
                segments.push(&id.to_string());
            }
        }
        if force_save {
            url.query_pairs_mut().append_pair("forceSave", "true");
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
    }

    /// Send the request, and return the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let request = request.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "sending request to Lidarr");

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%method, %url, %status, "received response from Lidarr");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { url });
        }
        if !status.is_success() {
            return Err(ClientError::Status { status, url, body });
        }
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(url: Url, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> Client {
        Client::new(base, "secret", DEFAULT_TIMEOUT).unwrap()
    }

    #[test]
    fn endpoint_appends_api_segments() {
        let client = client("http://localhost:8686");
        let url = client.endpoint("indexer", None, false).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8686/api/v1/indexer");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let client = client("https://example.com/lidarr/");
        let url = client.endpoint("indexer", Some(12), true).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/lidarr/api/v1/indexer/12?forceSave=true"
        );
    }

    #[test]
    fn invalid_urls_are_rejected() {
        for url in ["", "not a url", "mailto:someone@example.com", "ftp://example.com"] {
            let err = Client::new(url, "secret", DEFAULT_TIMEOUT).unwrap_err();
            assert!(matches!(err, ClientError::InvalidUrl { .. }), "{url}: {err}");
        }
    }

    #[test]
    fn debug_hides_the_api_key() {
        let client = client("http://localhost:8686");
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("localhost"));
    }

    #[test]
    fn decode_reports_the_url() {
        let url = Url::parse("http://localhost/api/v1/plain").unwrap();
        let err = decode::<Vec<i64>>(url, "{").unwrap_err();
        assert!(err.to_string().contains("/api/v1/plain"));
    }
}
