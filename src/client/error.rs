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

use reqwest::StatusCode;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid server url `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP error while talking to Lidarr")]
    Transport {
        #[from]
        source: reqwest::Error,
    },
    #[error("{url} does not exist")]
    NotFound { url: Url },
    #[error("Lidarr answered {status} to {url}: {body}")]
    Status {
        status: StatusCode,
        url: Url,
        body: String,
    },
    #[error("Could not decode the response of {url}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
