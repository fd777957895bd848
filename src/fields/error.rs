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

use std::fmt::Display;

use super::FieldKind;

/// Shape of a json value as received from the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    Null,
    Bool,
    /// Number representable as an `i64`, integral floats included
    Integer,
    /// Number with a fractional part, or out of the `i64` range
    Float,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonKind::Null,
            serde_json::Value::Bool(_) => JsonKind::Bool,
            serde_json::Value::Number(number) => {
                let integral = number.is_i64()
                    || number.as_f64().is_some_and(|f| {
                        f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
                    });
                if integral {
                    JsonKind::Integer
                } else {
                    JsonKind::Float
                }
            }
            serde_json::Value::String(_) => JsonKind::String,
            serde_json::Value::Array(_) => JsonKind::Array,
            serde_json::Value::Object(_) => JsonKind::Object,
        }
    }
}

impl Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "a boolean",
            JsonKind::Integer => "an integer",
            JsonKind::Float => "a fractional or out of range number",
            JsonKind::String => "a string",
            JsonKind::Array => "an array",
            JsonKind::Object => "an object",
        })
    }
}

/// Errors raised while converting fields, or while checking a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("field `{name}` of {resource} expects {expected}, but received {actual}")]
    Coercion {
        resource: &'static str,
        name: String,
        expected: FieldKind,
        actual: JsonKind,
    },
    #[error("element {index} of field `{name}` of {resource} expects {expected}, but received {actual}")]
    ElementCoercion {
        resource: &'static str,
        name: String,
        index: usize,
        expected: FieldKind,
        actual: JsonKind,
    },
    #[error("field `{name}` of {resource} holds nested fields, but received {actual} instead of an object")]
    NotAnObject {
        resource: &'static str,
        name: String,
        actual: JsonKind,
    },
    #[error("{resource} declares field `{name}` more than once")]
    DuplicateName {
        resource: &'static str,
        name: &'static str,
    },
    #[error("{resource} binds attribute `{attribute}` more than once")]
    DuplicateAttribute {
        resource: &'static str,
        attribute: &'static str,
    },
    #[error("{resource} declares `{name}` both as a field and as a group of nested fields")]
    AmbiguousParent {
        resource: &'static str,
        name: &'static str,
    },
    #[error("{resource} binds field `{name}` to attribute `{attribute}` instead of `{expected}`")]
    AttributeName {
        resource: &'static str,
        name: &'static str,
        attribute: &'static str,
        expected: String,
    },
}
