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


//! Terraform and OpenTofu provider for Lidarr
//!
//! Indexers, download clients, notifications and import lists are configured on the server with
//! a list of implementation specific fields. The [`fields`] module converts those lists from and
//! to typed Terraform states, and [`generic`] builds one resource and one data source per kind
//! on top of it.

pub mod client;
pub mod download_client;
pub mod fields;
pub mod generic;
pub mod import_list;
pub mod indexer;
pub mod notification;
pub mod provider;
pub mod tag;

mod utils;

pub use client::{Client, ClientError};
pub use provider::{ClientHandle, LidarrProvider, ProviderConfig};
