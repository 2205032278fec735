// SPDX-License-Identifier: MIT OR Apache-2.0

//! Leaf values held by the naming tree.
//!
//! This module provides the `Value` type bound at leaf names, and the
//! `Reference` type describing a resource that a factory can materialize.

use crate::domain::errors::{NamingError, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A value bound at a leaf name.
///
/// Plain records bind as [`Value::String`] (or [`Value::List`] when a key was
/// repeated); typed records bind as whatever their converter produced.
///
/// # Examples
///
/// ```
/// use nametree::domain::value::Value;
///
/// let value = Value::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert_eq!(value.parse::<u16>("port").unwrap(), 42);
///
/// let flag = Value::Bool(true);
/// assert_eq!(flag.as_bool(), Some(true));
/// ```
#[derive(Clone)]
pub enum Value {
    /// An unconverted string.
    String(String),
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// A floating point number.
    Float(f64),
    /// A date and time.
    Date(NaiveDateTime),
    /// An ordered list, produced by repeated keys.
    List(Vec<Value>),
    /// Named properties, produced by multi-property conversion.
    Map(IndexMap<String, Value>),
    /// An unresolved resource description.
    Reference(Reference),
    /// An opaque application object.
    Object(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps an application object.
    pub fn object<T: Any + Send + Sync>(object: T) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer if this is an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the number if this is a float or integer value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Returns the date if this is a date value.
    pub fn as_date(&self) -> Option<&NaiveDateTime> {
        match self {
            Value::Date(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the elements if this is a list value.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the properties if this is a map value.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the reference if this is a reference value.
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Returns true for unresolved references.
    pub fn is_reference(&self) -> bool {
        matches!(self, Value::Reference(_))
    }

    /// Downcasts an opaque object to a concrete type.
    ///
    /// # Examples
    ///
    /// ```
    /// use nametree::domain::value::Value;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Pool { size: usize }
    ///
    /// let value = Value::object(Pool { size: 4 });
    /// assert_eq!(value.downcast_ref::<Pool>(), Some(&Pool { size: 4 }));
    /// assert!(value.downcast_ref::<String>().is_none());
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Object(object) => object.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Parses a string value into any type that implements `FromStr`.
    ///
    /// `name` is only used to label the error.
    pub fn parse<T>(&self, name: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let raw = self.as_str().ok_or_else(|| {
            NamingError::conversion(
                name,
                std::any::type_name::<T>(),
                format!("{} is not a string value", self.kind()),
            )
        })?;
        raw.parse::<T>()
            .map_err(|e| NamingError::ConversionFailure {
                name: name.to_string(),
                type_name: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    /// Returns a short label for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Date(_) => "date",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Reference(_) => "reference",
            Value::Object(_) => "object",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Integer(n) => f.debug_tuple("Integer").field(n).finish(),
            Value::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Value::Date(d) => f.debug_tuple("Date").field(d).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Reference(r) => f.debug_tuple("Reference").field(r).finish(),
            Value::Object(_) => f.write_str("Object(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Date(d) => write!(f, "{}", d),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}={}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Reference(r) => write!(f, "Reference({})", r.type_name()),
            Value::Object(_) => write!(f, "<object>"),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Reference> for Value {
    fn from(r: Reference) -> Self {
        Value::Reference(r)
    }
}

/// A description of a resource that an object factory can materialize.
///
/// References are what resource-factory conversions produce: the type name
/// plus the raw properties that were declared next to it.
///
/// # Examples
///
/// ```
/// use nametree::domain::value::Reference;
///
/// let reference = Reference::new("datasource")
///     .with_property("url", "postgres://localhost/app")
///     .with_property("user", "app");
/// assert_eq!(reference.get("user"), Some("app"));
/// assert_eq!(reference.properties().len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    type_name: String,
    properties: IndexMap<String, String>,
}

impl Reference {
    /// Creates an empty reference for the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns all properties in declaration order.
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}
