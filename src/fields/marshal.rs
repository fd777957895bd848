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

use std::borrow::Cow;

use serde_json::{Map, Number, Value as Json};
use tf_provider::value::Value;

use super::error::JsonKind;
use super::{Accessor, Field, FieldError, FieldSpec, Nesting, Registry, SECRET_MASK};

/// Store the fields received from the server into `state`
///
/// Fields with a null value, and fields the registry does not know, are skipped.
/// Nested fields are accepted both flat (`seedCriteria.seedTime`) and grouped in an object
/// (`seedCriteria` holding `{"seedTime": ...}`).
pub fn write_fields<S: 'static>(
    registry: &Registry<S>,
    fields: &[Field],
    state: &mut S,
) -> Result<(), FieldError> {
    for field in fields {
        let value = match &field.value {
            Some(value) if !value.is_null() => value,
            _ => continue,
        };

        if let Some(spec) = registry.get(&field.name) {
            store(registry, spec, value, state)?;
        } else if registry.is_parent(&field.name) {
            let Json::Object(object) = value else {
                return Err(FieldError::NotAnObject {
                    resource: registry.resource(),
                    name: field.name.clone(),
                    actual: JsonKind::of(value),
                });
            };
            for spec in registry.nested(&field.name) {
                let Some((_, path)) = spec.parent() else {
                    continue;
                };
                match lookup(object, path) {
                    Some(leaf) if !leaf.is_null() => store(registry, spec, leaf, state)?,
                    _ => (),
                }
            }
        } else {
            tracing::trace!(
                resource = registry.resource(),
                field = field.name.as_str(),
                "ignoring unknown field"
            );
        }
    }
    Ok(())
}

/// Build the fields to send to the server from `state`
///
/// Only known values are emitted, in registry order. Null and unknown attributes are omitted.
pub fn read_fields<S: 'static>(registry: &Registry<S>, state: &S) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::with_capacity(registry.fields().len());
    let mut groups: Vec<(&'static str, usize)> = Vec::new();

    for spec in registry.fields() {
        let Some(value) = load(spec, state) else {
            continue;
        };

        match (registry.nesting(), spec.parent()) {
            (Nesting::Object, Some((parent, path))) => {
                let position = match groups.iter().find(|(name, _)| *name == parent) {
                    Some(&(_, position)) => position,
                    None => {
                        fields.push(Field {
                            name: parent.to_owned(),
                            value: Some(Json::Object(Map::new())),
                        });
                        groups.push((parent, fields.len() - 1));
                        fields.len() - 1
                    }
                };
                if let Some(Json::Object(object)) = &mut fields[position].value {
                    insert(object, path, value);
                }
            }
            _ => fields.push(Field {
                name: spec.name.to_owned(),
                value: Some(value),
            }),
        }
    }

    fields
}

/// Set every non sensitive attribute of the registry to null
///
/// Sensitive attributes keep their value: the server never sends them back.
pub fn reset_fields<S: 'static>(registry: &Registry<S>, state: &mut S) {
    for spec in registry.fields() {
        if !spec.sensitive {
            spec.accessor.set_null(state);
        }
    }
}

/// Mark every null attribute of the registry as unknown
pub fn mark_unknown_fields<S: 'static>(registry: &Registry<S>, state: &mut S) {
    for spec in registry.fields() {
        if spec.accessor.is_null(state) {
            spec.accessor.set_unknown(state);
        }
    }
}

/// Set every attribute of the registry that is still unknown to null
pub fn resolve_unknown_fields<S: 'static>(registry: &Registry<S>, state: &mut S) {
    for spec in registry.fields() {
        if spec.accessor.is_unknown(state) {
            spec.accessor.set_null(state);
        }
    }
}

fn lookup<'v>(object: &'v Map<String, Json>, path: &str) -> Option<&'v Json> {
    match path.split_once('.') {
        Some((head, rest)) => lookup(object.get(head)?.as_object()?, rest),
        None => object.get(path),
    }
}

fn insert(object: &mut Map<String, Json>, path: &str, value: Json) {
    match path.split_once('.') {
        Some((head, rest)) => {
            let child = object
                .entry(head)
                .or_insert_with(|| Json::Object(Map::new()));
            if !child.is_object() {
                *child = Json::Object(Map::new());
            }
            if let Json::Object(child) = child {
                insert(child, rest, value);
            }
        }
        None => {
            object.insert(path.to_owned(), value);
        }
    }
}

fn as_int(value: &Json) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn as_string(value: &Json) -> Option<Cow<'static, str>> {
    value.as_str().map(|s| Cow::Owned(s.to_owned()))
}

fn store<S: 'static>(
    registry: &Registry<S>,
    spec: &FieldSpec<S>,
    value: &Json,
    state: &mut S,
) -> Result<(), FieldError> {
    let mismatch = || FieldError::Coercion {
        resource: registry.resource(),
        name: spec.name.to_owned(),
        expected: spec.kind(),
        actual: JsonKind::of(value),
    };

    match spec.accessor {
        Accessor::Bool(_, set) => {
            *set(state) = Value::Value(value.as_bool().ok_or_else(mismatch)?);
        }
        Accessor::Int(_, set) => {
            *set(state) = Value::Value(as_int(value).ok_or_else(mismatch)?);
        }
        Accessor::Float(_, set) => {
            *set(state) = Value::Value(value.as_f64().ok_or_else(mismatch)?);
        }
        Accessor::String(_, set) => {
            let text = as_string(value).ok_or_else(mismatch)?;
            if spec.sensitive && text == SECRET_MASK {
                return Ok(());
            }
            *set(state) = Value::Value(text);
        }
        Accessor::IntList(_, set) => {
            *set(state) = Value::Value(store_list(registry, spec, value, as_int)?);
        }
        Accessor::StringList(_, set) => {
            *set(state) = Value::Value(store_list(registry, spec, value, as_string)?);
        }
    }
    Ok(())
}

fn store_list<S: 'static, T>(
    registry: &Registry<S>,
    spec: &FieldSpec<S>,
    value: &Json,
    convert: fn(&Json) -> Option<T>,
) -> Result<Vec<Value<T>>, FieldError> {
    let Json::Array(items) = value else {
        return Err(FieldError::Coercion {
            resource: registry.resource(),
            name: spec.name.to_owned(),
            expected: spec.kind(),
            actual: JsonKind::of(value),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            convert(item)
                .map(Value::Value)
                .ok_or_else(|| FieldError::ElementCoercion {
                    resource: registry.resource(),
                    name: spec.name.to_owned(),
                    index,
                    expected: spec.kind().element(),
                    actual: JsonKind::of(item),
                })
        })
        .collect()
}

fn load<S>(spec: &FieldSpec<S>, state: &S) -> Option<Json> {
    match spec.accessor {
        Accessor::Bool(get, _) => get(state).as_ref_option().map(|b| Json::Bool(*b)),
        Accessor::Int(get, _) => get(state).as_ref_option().map(|i| Json::from(*i)),
        Accessor::Float(get, _) => get(state)
            .as_ref_option()
            .and_then(|f| Number::from_f64(*f))
            .map(Json::Number),
        Accessor::String(get, _) => get(state)
            .as_ref_option()
            .map(|s| Json::String(s.to_string())),
        Accessor::IntList(get, _) => get(state).as_ref_option().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_ref_option())
                .map(|i| Json::from(*i))
                .collect()
        }),
        Accessor::StringList(get, _) => get(state).as_ref_option().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_ref_option())
                .map(|s| Json::String(s.to_string()))
                .collect()
        }),
    }
}
