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

//! Conversion between the dynamic field lists of the server and typed resource states
//!
//! Lidarr describes the configuration of an implementation (the Newznab indexer, the
//! Transmission download client, ...) as a flat list of `{name, value}` pairs.
//! Each resource kind declares a static [`Registry`] binding every field name it knows to
//! one attribute of its state, and [`write_fields`] / [`read_fields`] convert in both directions.

use serde::{Deserialize, Serialize};
use tf_provider::value::Value;

mod error;
mod marshal;
mod registry;

pub use error::{FieldError, JsonKind};
pub use marshal::{
    mark_unknown_fields, read_fields, reset_fields, resolve_unknown_fields, write_fields,
};
pub(crate) use registry::field_registry;
pub use registry::{attribute_name, Accessor, FieldKind, FieldSpec, HasFields, Nesting, Registry};

pub type ValueFloat = Value<f64>;

/// Placeholder sent by the server instead of the value of a secret field
pub const SECRET_MASK: &str = "********";

/// A single named configuration value, as transmitted over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl Field {
    pub fn new<N: Into<String>, V: Into<serde_json::Value>>(name: N, value: V) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}
