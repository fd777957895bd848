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

use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::sync::OnceLock;

use tf_provider::schema::AttributeType;
use tf_provider::value::{ValueBool, ValueList, ValueNumber, ValueString};

use super::{read_fields, write_fields, Field, FieldError, ValueFloat};

/// Kind of value a field holds on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Bool,
    Int,
    Float,
    String,
    IntList,
    StringList,
}

impl FieldKind {
    /// Terraform type of the attribute storing a field of this kind
    pub fn attribute_type(self) -> AttributeType {
        match self {
            FieldKind::Bool => AttributeType::Bool,
            FieldKind::Int | FieldKind::Float => AttributeType::Number,
            FieldKind::String => AttributeType::String,
            FieldKind::IntList => AttributeType::List(Box::new(AttributeType::Number)),
            FieldKind::StringList => AttributeType::List(Box::new(AttributeType::String)),
        }
    }

    /// Kind of the elements of a list, the kind itself otherwise
    pub fn element(self) -> FieldKind {
        match self {
            FieldKind::IntList => FieldKind::Int,
            FieldKind::StringList => FieldKind::String,
            kind => kind,
        }
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            FieldKind::Bool => "a boolean",
            FieldKind::Int => "an integer",
            FieldKind::Float => "a number",
            FieldKind::String => "a string",
            FieldKind::IntList => "a list of integers",
            FieldKind::StringList => "a list of strings",
        })
    }
}

/// Getter and setter pair bound to one attribute of a state `S`
///
/// The variant fixes the kind of the field, so a name can never be
/// registered under two kinds at once.
pub enum Accessor<S> {
    Bool(fn(&S) -> &ValueBool, fn(&mut S) -> &mut ValueBool),
    Int(fn(&S) -> &ValueNumber, fn(&mut S) -> &mut ValueNumber),
    Float(fn(&S) -> &ValueFloat, fn(&mut S) -> &mut ValueFloat),
    String(
        fn(&S) -> &ValueString<'static>,
        fn(&mut S) -> &mut ValueString<'static>,
    ),
    IntList(
        fn(&S) -> &ValueList<ValueNumber>,
        fn(&mut S) -> &mut ValueList<ValueNumber>,
    ),
    StringList(
        fn(&S) -> &ValueList<ValueString<'static>>,
        fn(&mut S) -> &mut ValueList<ValueString<'static>>,
    ),
}

impl<S> Clone for Accessor<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Accessor<S> {}

macro_rules! with_getter {
    ($accessor:expr, |$get:ident| $body:expr) => {
        match $accessor {
            Accessor::Bool($get, _) => $body,
            Accessor::Int($get, _) => $body,
            Accessor::Float($get, _) => $body,
            Accessor::String($get, _) => $body,
            Accessor::IntList($get, _) => $body,
            Accessor::StringList($get, _) => $body,
        }
    };
}

macro_rules! with_setter {
    ($accessor:expr, |$set:ident| $body:expr) => {
        match $accessor {
            Accessor::Bool(_, $set) => $body,
            Accessor::Int(_, $set) => $body,
            Accessor::Float(_, $set) => $body,
            Accessor::String(_, $set) => $body,
            Accessor::IntList(_, $set) => $body,
            Accessor::StringList(_, $set) => $body,
        }
    };
}

impl<S> Accessor<S> {
    pub fn kind(&self) -> FieldKind {
        match self {
            Accessor::Bool(..) => FieldKind::Bool,
            Accessor::Int(..) => FieldKind::Int,
            Accessor::Float(..) => FieldKind::Float,
            Accessor::String(..) => FieldKind::String,
            Accessor::IntList(..) => FieldKind::IntList,
            Accessor::StringList(..) => FieldKind::StringList,
        }
    }

    pub fn is_null(&self, state: &S) -> bool {
        with_getter!(*self, |get| get(state).is_null())
    }

    pub fn is_unknown(&self, state: &S) -> bool {
        with_getter!(*self, |get| get(state).is_unknown())
    }

    pub fn set_null(&self, state: &mut S) {
        with_setter!(*self, |set| *set(state) = tf_provider::value::Value::Null)
    }

    pub fn set_unknown(&self, state: &mut S) {
        with_setter!(*self, |set| *set(state) = tf_provider::value::Value::Unknown)
    }
}

/// One entry of a [`Registry`]
pub struct FieldSpec<S> {
    /// Name on the wire, dotted for fields nested in a sub-object
    pub name: &'static str,
    /// Name of the Terraform attribute
    pub attribute: &'static str,
    /// The server masks the value on reads
    pub sensitive: bool,
    pub accessor: Accessor<S>,
}

impl<S> FieldSpec<S> {
    pub fn kind(&self) -> FieldKind {
        self.accessor.kind()
    }

    /// Split a nested name into its parent segment and the remaining path
    pub fn parent(&self) -> Option<(&'static str, &'static str)> {
        self.name.split_once('.')
    }
}

/// Where nested fields go when written back to the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Nesting {
    /// `{"name": "seedCriteria.seedTime", "value": 1}`
    #[default]
    Flat,
    /// `{"name": "seedCriteria", "value": {"seedTime": 1}}`
    Object,
}

#[derive(Debug, Default)]
struct Index {
    by_name: HashMap<&'static str, usize>,
    by_parent: HashMap<&'static str, Vec<usize>>,
}

/// Static description of the fields a resource kind knows about
pub struct Registry<S: 'static> {
    resource: &'static str,
    nesting: Nesting,
    fields: &'static [FieldSpec<S>],
    index: OnceLock<Index>,
}

impl<S: 'static> Registry<S> {
    pub const fn new(
        resource: &'static str,
        nesting: Nesting,
        fields: &'static [FieldSpec<S>],
    ) -> Self {
        Self {
            resource,
            nesting,
            fields,
            index: OnceLock::new(),
        }
    }

    /// Name of the resource kind, used in diagnostics
    pub fn resource(&self) -> &'static str {
        self.resource
    }

    pub fn nesting(&self) -> Nesting {
        self.nesting
    }

    /// Entries in declaration order
    pub fn fields(&self) -> &'static [FieldSpec<S>] {
        self.fields
    }

    /// Entry with the exact wire name `name`
    pub fn get(&self, name: &str) -> Option<&'static FieldSpec<S>> {
        let fields = self.fields;
        self.index().by_name.get(name).map(|&i| &fields[i])
    }

    /// Entries nested under the parent segment `parent`
    pub fn nested<'r>(&'r self, parent: &str) -> impl Iterator<Item = &'static FieldSpec<S>> + 'r {
        let fields = self.fields;
        self.index()
            .by_parent
            .get(parent)
            .into_iter()
            .flatten()
            .map(move |&i| &fields[i])
    }

    pub fn is_parent(&self, name: &str) -> bool {
        self.index().by_parent.contains_key(name)
    }

    /// Verify the registry is consistent
    ///
    /// Names and attributes must be unique, a parent segment cannot be a field on its own,
    /// and attribute names follow [`attribute_name`].
    pub fn check(&self) -> Result<(), FieldError> {
        let mut names = HashSet::new();
        let mut attributes = HashSet::new();
        for spec in self.fields {
            if !names.insert(spec.name) {
                return Err(FieldError::DuplicateName {
                    resource: self.resource,
                    name: spec.name,
                });
            }
            if !attributes.insert(spec.attribute) {
                return Err(FieldError::DuplicateAttribute {
                    resource: self.resource,
                    attribute: spec.attribute,
                });
            }
            let expected = attribute_name(spec.name);
            if expected != spec.attribute {
                return Err(FieldError::AttributeName {
                    resource: self.resource,
                    name: spec.name,
                    attribute: spec.attribute,
                    expected,
                });
            }
        }
        for spec in self.fields {
            if let Some((parent, _)) = spec.parent() {
                if let Some(field) = self.fields.iter().find(|field| field.name == parent) {
                    return Err(FieldError::AmbiguousParent {
                        resource: self.resource,
                        name: field.name,
                    });
                }
            }
        }
        Ok(())
    }

    fn index(&self) -> &Index {
        self.index.get_or_init(|| {
            let mut index = Index::default();
            for (i, spec) in self.fields.iter().enumerate() {
                if index.by_name.contains_key(spec.name) {
                    tracing::warn!(
                        resource = self.resource,
                        field = spec.name,
                        "field declared twice, keeping the first declaration"
                    );
                    continue;
                }
                index.by_name.insert(spec.name, i);
                if let Some((parent, _)) = spec.parent() {
                    index.by_parent.entry(parent).or_default().push(i);
                }
            }
            index
        })
    }
}

/// Terraform attribute name of the wire name `name`
///
/// Only the last segment of a dotted name is kept, then converted from camelCase to snake_case:
/// `seedCriteria.seedTime` becomes `seed_time`.
pub fn attribute_name(name: &str) -> String {
    let leaf = name.rsplit('.').next().unwrap_or(name);
    let mut attribute = String::with_capacity(leaf.len() + 4);
    for c in leaf.chars() {
        if c.is_ascii_uppercase() {
            if !attribute.is_empty() {
                attribute.push('_');
            }
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}

/// Capability of a state whose extension attributes are described by a static [`Registry`]
pub trait HasFields: Sized + 'static {
    fn registry() -> &'static Registry<Self>;

    /// Fields to send to the server
    fn to_fields(&self) -> Vec<Field> {
        read_fields(Self::registry(), self)
    }

    /// Store the fields received from the server
    fn set_fields(&mut self, fields: &[Field]) -> Result<(), FieldError> {
        write_fields(Self::registry(), fields, self)
    }
}

/// Declare a static [`Registry`]
///
/// ```ignore
/// field_registry! {
///     static INDEXER_FIELDS: Registry<IndexerState> = ("indexer", Nesting::Flat) {
///         Bool "allowZeroSize" => allow_zero_size,
///         String "apiKey" => api_key [sensitive],
///         Float "seedCriteria.seedRatio" => seed_ratio,
///     }
/// }
/// ```
macro_rules! field_registry {
    (@sensitive) => { false };
    (@sensitive sensitive) => { true };
    (@accessor $state:ty, Bool, $attr:ident) => {{
        fn get(state: &$state) -> &::tf_provider::value::ValueBool {
            &state.$attr
        }
        fn set(state: &mut $state) -> &mut ::tf_provider::value::ValueBool {
            &mut state.$attr
        }
        $crate::fields::Accessor::Bool(get, set)
    }};
    (@accessor $state:ty, Int, $attr:ident) => {{
        fn get(state: &$state) -> &::tf_provider::value::ValueNumber {
            &state.$attr
        }
        fn set(state: &mut $state) -> &mut ::tf_provider::value::ValueNumber {
            &mut state.$attr
        }
        $crate::fields::Accessor::Int(get, set)
    }};
    (@accessor $state:ty, Float, $attr:ident) => {{
        fn get(state: &$state) -> &$crate::fields::ValueFloat {
            &state.$attr
        }
        fn set(state: &mut $state) -> &mut $crate::fields::ValueFloat {
            &mut state.$attr
        }
        $crate::fields::Accessor::Float(get, set)
    }};
    (@accessor $state:ty, String, $attr:ident) => {{
        fn get(state: &$state) -> &::tf_provider::value::ValueString<'static> {
            &state.$attr
        }
        fn set(state: &mut $state) -> &mut ::tf_provider::value::ValueString<'static> {
            &mut state.$attr
        }
        $crate::fields::Accessor::String(get, set)
    }};
    (@accessor $state:ty, IntList, $attr:ident) => {{
        fn get(
            state: &$state,
        ) -> &::tf_provider::value::ValueList<::tf_provider::value::ValueNumber> {
            &state.$attr
        }
        fn set(
            state: &mut $state,
        ) -> &mut ::tf_provider::value::ValueList<::tf_provider::value::ValueNumber> {
            &mut state.$attr
        }
        $crate::fields::Accessor::IntList(get, set)
    }};
    (@accessor $state:ty, StringList, $attr:ident) => {{
        fn get(
            state: &$state,
        ) -> &::tf_provider::value::ValueList<::tf_provider::value::ValueString<'static>> {
            &state.$attr
        }
        fn set(
            state: &mut $state,
        ) -> &mut ::tf_provider::value::ValueList<::tf_provider::value::ValueString<'static>>
        {
            &mut state.$attr
        }
        $crate::fields::Accessor::StringList(get, set)
    }};
    (
        $(#[$meta:meta])*
        $vis:vis static $registry:ident: Registry<$state:ty> = ($resource:literal, $nesting:expr) {
            $($kind:ident $name:literal => $attr:ident $([$flag:ident])?),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis static $registry: $crate::fields::Registry<$state> = {
            const FIELDS: &[$crate::fields::FieldSpec<$state>] = &[$(
                $crate::fields::FieldSpec {
                    name: $name,
                    attribute: stringify!($attr),
                    sensitive: $crate::fields::field_registry!(@sensitive $($flag)?),
                    accessor: $crate::fields::field_registry!(@accessor $state, $kind, $attr),
                }
            ),*];
            $crate::fields::Registry::new($resource, $nesting, FIELDS)
        };
    };
}

pub(crate) use field_registry;
