// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key classification and type descriptors.
//!
//! A flat key whose last segment is `type` declares that its prefix should be
//! bound to a converted value rather than a raw string. The sibling keys that
//! share the prefix become the descriptor's attributes. A bare `type` key
//! describes the whole record set, which then replaces the node it is loaded
//! into.

use crate::domain::name::{Delimiter, Name};
use crate::domain::records::{RecordValue, Records};
use crate::domain::value::Reference;
use indexmap::IndexMap;

/// The pseudo-segment naming a descriptor's type.
pub const TYPE_KEY: &str = "type";

/// The pseudo-segment naming an explicit converter.
pub const CONVERTER_KEY: &str = "converter";

/// A loader-internal bundle describing how to convert raw attributes.
///
/// Descriptors only live for the duration of one load pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    path: Name,
    type_name: String,
    converter: Option<String>,
    value: Option<RecordValue>,
    attributes: IndexMap<String, RecordValue>,
}

impl TypeDescriptor {
    /// Creates a descriptor for `path` with the given type name.
    pub fn new(path: Name, type_name: impl Into<String>) -> Self {
        Self {
            path,
            type_name: type_name.into(),
            converter: None,
            value: None,
            attributes: IndexMap::new(),
        }
    }

    /// Sets the raw value recorded at the descriptor's own path.
    pub fn with_value(mut self, value: RecordValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Sets the explicit converter identifier.
    pub fn with_converter(mut self, converter: impl Into<String>) -> Self {
        self.converter = Some(converter.into());
        self
    }

    /// Adds a named attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into(), RecordValue::Single(value.into()));
        self
    }

    /// The owning path. Empty for a descriptor covering a whole namespace.
    pub fn path(&self) -> &Name {
        &self.path
    }

    /// The requested type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The explicit converter identifier, if one was declared.
    pub fn converter(&self) -> Option<&str> {
        self.converter.as_deref()
    }

    /// The raw value recorded at the owning path.
    pub fn value(&self) -> Option<&RecordValue> {
        self.value.as_ref()
    }

    /// The sibling attributes in declaration order.
    pub fn attributes(&self) -> &IndexMap<String, RecordValue> {
        &self.attributes
    }

    /// Returns the first value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(RecordValue::first)
    }

    /// A printable label for errors and logs.
    pub fn label(&self) -> String {
        if self.path.is_empty() {
            "<namespace>".to_string()
        } else {
            self.path.to_string()
        }
    }

    /// Describes this descriptor as an unresolved reference.
    pub fn to_reference(&self) -> Reference {
        let mut reference = Reference::new(self.type_name.clone());
        for (name, value) in &self.attributes {
            reference = reference.with_property(name.clone(), value.first());
        }
        reference
    }

    fn absorb(&mut self, attribute: &str, value: &RecordValue) {
        if attribute == CONVERTER_KEY {
            self.converter = Some(value.first().to_string());
        } else {
            self.attributes.insert(attribute.to_string(), value.clone());
        }
    }
}

/// The result of classifying a record set.
#[derive(Debug, Default)]
pub struct Classification {
    /// Plain bindings, already segmented.
    pub leaves: Vec<(Name, RecordValue)>,
    /// Descriptors owned by a prefixed path.
    pub descriptors: Vec<TypeDescriptor>,
    /// A descriptor covering the whole record set.
    pub namespace: Option<TypeDescriptor>,
}

/// Splits a record set into plain leaves and type descriptors.
///
/// # Examples
///
/// ```
/// use nametree::domain::descriptor::classify;
/// use nametree::domain::name::Delimiter;
/// use nametree::domain::records::Records;
///
/// let records: Records = vec![
///     ("db.type", "datasource"),
///     ("db.url", "postgres://localhost/app"),
///     ("name", "app"),
/// ]
/// .into_iter()
/// .collect();
///
/// let classified = classify(&records, &Delimiter::default());
/// assert_eq!(classified.leaves.len(), 1);
/// assert_eq!(classified.descriptors[0].type_name(), "datasource");
/// assert_eq!(classified.descriptors[0].attribute("url"), Some("postgres://localhost/app"));
/// ```
pub fn classify(records: &Records, delimiter: &Delimiter) -> Classification {
    let mut namespace: Option<TypeDescriptor> = None;
    let mut descriptors: IndexMap<Name, TypeDescriptor> = IndexMap::new();

    for (key, value) in records.iter() {
        let name = Name::parse(key, delimiter);
        if name.last() != Some(TYPE_KEY) {
            continue;
        }
        if value.is_multi() {
            tracing::warn!(
                "Type key '{}' declared {} times, using '{}'",
                key,
                value.values().len(),
                value.first()
            );
        }
        if name.len() == 1 {
            namespace = Some(TypeDescriptor::new(Name::default(), value.first()));
        } else {
            let path = name.parent();
            descriptors.insert(path.clone(), TypeDescriptor::new(path, value.first()));
        }
    }

    if let Some(mut descriptor) = namespace {
        for (key, value) in records.iter() {
            if key != TYPE_KEY {
                descriptor.absorb(key, value);
            }
        }
        tracing::debug!(
            "Record set describes a '{}' namespace with {} attributes",
            descriptor.type_name(),
            descriptor.attributes().len()
        );
        return Classification {
            leaves: Vec::new(),
            descriptors: Vec::new(),
            namespace: Some(descriptor),
        };
    }

    let mut leaves = Vec::new();
    for (key, value) in records.iter() {
        let name = Name::parse(key, delimiter);
        if name.len() > 1 && name.last() == Some(TYPE_KEY) {
            continue;
        }
        if let Some(descriptor) = descriptors.get_mut(&name) {
            descriptor.value = Some(value.clone());
            continue;
        }
        if name.len() > 1 {
            if let Some(descriptor) = descriptors.get_mut(&name.parent()) {
                if let Some(attribute) = name.last() {
                    descriptor.absorb(attribute, value);
                }
                continue;
            }
        }
        leaves.push((name, value.clone()));
    }

    Classification {
        leaves,
        descriptors: descriptors.into_values().collect(),
        namespace: None,
    }
}
