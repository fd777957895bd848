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

//! Resources whose configuration is split between fixed attributes and a dynamic field list
//!
//! Indexers, download clients, notifications and import lists all share the same shape on the
//! server: a handful of core properties, plus the `fields` of the selected implementation.
//! [`FieldResource`] and [`FieldDataSource`] implement the Terraform side once for every
//! [`ResourceKind`].

use std::collections::HashMap;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Description};
use tf_provider::value::{Value, ValueNumber, ValueSet, ValueString};
use tf_provider::{map, AttributePath, Diagnostics};

use crate::client::ApiResource;
use crate::fields::{Field, FieldError, HasFields, Registry};

mod data_source;
mod resource;

pub use data_source::FieldDataSource;
pub use resource::FieldResource;

/// Server object holding a dynamic field list
pub trait FieldPayload: ApiResource + Debug + Clone {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
}

/// Binding between a Terraform state and one family of field-backed server objects
pub trait ResourceKind: Send + Sync + 'static {
    /// Name of the kind, used as the Terraform type name suffix and in diagnostics
    const NAME: &'static str;
    const DESCRIPTION: &'static str;

    type Payload: FieldPayload;
    type State: HasFields
        + Debug
        + Clone
        + Default
        + Serialize
        + DeserializeOwned
        + Send
        + Sync;

    /// Core attributes of the resource, the field attributes excluded
    fn attributes() -> HashMap<String, Attribute>;

    fn id(state: &Self::State) -> &ValueNumber;
    fn id_mut(state: &mut Self::State) -> &mut ValueNumber;
    fn name(state: &Self::State) -> &ValueString<'static>;
    fn implementation(state: &Self::State) -> &ValueString<'static>;
    fn config_contract(state: &Self::State) -> &ValueString<'static>;

    /// Report inconsistent configurations
    fn validate(diags: &mut Diagnostics, state: &Self::State) {
        validate_common::<Self>(diags, state);
    }

    /// Fill the core attributes left unset by the practitioner before a creation
    ///
    /// Attributes with a server side default must either receive it here, or become unknown.
    fn plan(state: &mut Self::State);

    /// Build the payload to send to the server
    fn to_payload(state: &Self::State, fields: Vec<Field>) -> Self::Payload;

    /// Store the payload received from the server into `state`
    fn apply_payload(state: &mut Self::State, payload: &Self::Payload) -> Result<(), FieldError>;
}

/// Checks shared by every kind: the identifying strings cannot be empty
pub fn validate_common<K: ResourceKind + ?Sized>(diags: &mut Diagnostics, state: &K::State) {
    for (attribute, value) in [
        ("name", K::name(state)),
        ("implementation", K::implementation(state)),
        ("config_contract", K::config_contract(state)),
    ] {
        if value.as_deref_option() == Some("") {
            diags.error_short(
                format!("`{attribute}` must not be empty"),
                AttributePath::new(attribute),
            );
        }
    }
}

/// Report a known string outside of `allowed`
pub(crate) fn validate_one_of(
    diags: &mut Diagnostics,
    attribute: &'static str,
    value: &ValueString<'static>,
    allowed: &[&str],
) {
    if let Some(value) = value.as_deref_option() {
        if !allowed.contains(&value) {
            diags.error(
                format!("Invalid `{attribute}`"),
                format!("`{value}` is not one of {}", allowed.join(", ")),
                AttributePath::new(attribute),
            );
        }
    }
}

/// One attribute per registry entry
pub fn field_attributes<S: 'static>(
    registry: &Registry<S>,
    constraint: AttributeConstraint,
) -> HashMap<String, Attribute> {
    registry
        .fields()
        .iter()
        .map(|spec| {
            (
                spec.attribute.to_owned(),
                Attribute {
                    attr_type: spec.kind().attribute_type(),
                    description: Description::markdown(format!(
                        "Value of the `{}` field of the implementation",
                        spec.name
                    )),
                    constraint: constraint.clone(),
                    sensitive: spec.sensitive,
                    ..Default::default()
                },
            )
        })
        .collect()
}

/// Same attributes, but turned into outputs, except for the lookup key `name`
pub fn data_source_attributes(
    attributes: HashMap<String, Attribute>,
) -> HashMap<String, Attribute> {
    attributes
        .into_iter()
        .map(|(name, mut attribute)| {
            attribute.constraint = if name == "name" {
                AttributeConstraint::Required
            } else {
                AttributeConstraint::Computed
            };
            (name, attribute)
        })
        .collect()
}

/// Core attributes shared by every kind
pub fn common_attributes(kind: &str) -> HashMap<String, Attribute> {
    map! {
        "id" => Attribute {
            attr_type: AttributeType::Number,
            description: Description::plain(format!("Identifier of the {kind} on the server")),
            constraint: AttributeConstraint::Computed,
            ..Default::default()
        },
        "name" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain(format!("Name of the {kind}")),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "implementation" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("Implementation name, for instance `Newznab`"),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "config_contract" => Attribute {
            attr_type: AttributeType::String,
            description: Description::plain("Settings contract, for instance `NewznabSettings`"),
            constraint: AttributeConstraint::Required,
            ..Default::default()
        },
        "tags" => Attribute {
            attr_type: AttributeType::Set(Box::new(AttributeType::Number)),
            description: Description::plain("Identifiers of the tags attached"),
            constraint: AttributeConstraint::OptionalComputed,
            ..Default::default()
        },
    }
}

pub(crate) fn bool_attribute(description: &str) -> Attribute {
    Attribute {
        attr_type: AttributeType::Bool,
        description: Description::plain(description),
        constraint: AttributeConstraint::OptionalComputed,
        ..Default::default()
    }
}

pub(crate) fn number_attribute(description: &str, constraint: AttributeConstraint) -> Attribute {
    Attribute {
        attr_type: AttributeType::Number,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

pub(crate) fn string_attribute(description: &str, constraint: AttributeConstraint) -> Attribute {
    Attribute {
        attr_type: AttributeType::String,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

/// Known value, or `default`
pub(crate) fn known_or<T: Clone>(value: &Value<T>, default: T) -> T {
    value.as_ref_option().cloned().unwrap_or(default)
}

/// Known value of a string attribute, empty otherwise
pub(crate) fn string_of(value: &ValueString<'static>) -> String {
    value.as_deref_option().unwrap_or_default().to_owned()
}

/// Known elements of a set of numbers
pub(crate) fn numbers_of(value: &ValueSet<ValueNumber>) -> Vec<i64> {
    value
        .iter()
        .flatten()
        .filter_map(|element| element.as_ref_option().copied())
        .collect()
}

pub(crate) fn set_of(values: &[i64]) -> ValueSet<ValueNumber> {
    Value::Value(values.iter().copied().map(Value::Value).collect())
}

pub(crate) fn string_value(value: &str) -> ValueString<'static> {
    Value::Value(value.to_owned().into())
}

/// Replace a null or unknown value with `default`
pub(crate) fn or_default<T>(value: &mut Value<T>, default: T) {
    if !value.is_value() {
        *value = Value::Value(default);
    }
}

/// Turn a null value into an unknown one, for attributes the server computes
pub(crate) fn or_unknown<T>(value: &mut Value<T>) {
    if value.is_null() {
        *value = Value::Unknown;
    }
}

/// Consistency checks every kind must pass
#[cfg(test)]
pub(crate) fn assert_consistent<K: ResourceKind>() {
    use std::collections::BTreeSet;

    K::State::registry().check().unwrap();

    let core = K::attributes();
    for spec in K::State::registry().fields() {
        assert!(
            !core.contains_key(spec.attribute),
            "{}: field `{}` shadows a core attribute",
            K::NAME,
            spec.name
        );
    }

    let serialized = serde_json::to_value(K::State::default()).unwrap();
    let keys: BTreeSet<String> = serialized.as_object().unwrap().keys().cloned().collect();
    for schema in [
        FieldResource::<K>::resource_schema(),
        FieldDataSource::<K>::data_source_schema(),
    ] {
        let attributes: BTreeSet<String> = schema.block.attributes.keys().cloned().collect();
        assert_eq!(keys, attributes, "{}", K::NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_source_requires_only_the_name() {
        let attributes = data_source_attributes(common_attributes("indexer"));
        for (name, attribute) in &attributes {
            let expected = if name == "name" {
                AttributeConstraint::Required
            } else {
                AttributeConstraint::Computed
            };
            assert_eq!(attribute.constraint, expected, "{name}");
        }
    }

    #[test]
    fn numbers_skip_unknown_elements() {
        let set: ValueSet<ValueNumber> =
            Value::Value([Value::Value(3), Value::Unknown, Value::Value(1)].into_iter().collect());
        let mut numbers = numbers_of(&set);
        numbers.sort();
        assert_eq!(numbers, vec![1, 3]);
        assert!(numbers_of(&Value::Null).is_empty());
    }

    #[test]
    fn defaults_only_fill_unset_values() {
        let mut set: Value<i64> = Value::Value(4);
        or_default(&mut set, 25);
        assert_eq!(set, Value::Value(4));

        let mut unset: Value<i64> = Value::Null;
        or_default(&mut unset, 25);
        assert_eq!(unset, Value::Value(25));

        let mut computed: Value<i64> = Value::Null;
        or_unknown(&mut computed);
        assert!(computed.is_unknown());
    }
}
