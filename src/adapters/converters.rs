// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in value converters.
//!
//! This module provides the converters registered by default, keyed by the
//! type name a record set declares with a trailing `type` segment, and the
//! [`ConverterRegistry`] that holds them.

use crate::domain::{NamingError, RecordValue, Result, TypeDescriptor, Value};
use crate::ports::Converter;
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Date formats tried when a `date` descriptor has no `format` attribute.
const DEFAULT_DATE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d"];

fn required<'a>(raw: Option<&'a str>, descriptor: &TypeDescriptor) -> Result<&'a str> {
    raw.ok_or_else(|| {
        NamingError::conversion(
            descriptor.label(),
            descriptor.type_name(),
            "no raw value to convert",
        )
    })
}

/// Passes the raw value through as a string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl Converter for StringConverter {
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        Ok(Value::from(required(raw, descriptor)?))
    }
}

/// Converts `true/yes/1/on` and `false/no/0/off`, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConverter;

impl Converter for BoolConverter {
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        let raw = required(raw, descriptor)?;
        match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
            _ => Err(NamingError::conversion(
                descriptor.label(),
                "boolean",
                format!("'{}' is not a boolean", raw),
            )),
        }
    }
}

/// Converts to a signed 64-bit integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerConverter;

impl Converter for IntegerConverter {
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        required(raw, descriptor)?
            .trim()
            .parse::<i64>()
            .map(Value::Integer)
            .map_err(|e| NamingError::from_parse_int_error(descriptor.label(), e))
    }
}

/// Converts to a 64-bit float.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatConverter;

impl Converter for FloatConverter {
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        required(raw, descriptor)?
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| NamingError::from_parse_float_error(descriptor.label(), e))
    }
}

/// Converts to a date-time.
///
/// A `format` attribute selects a strftime pattern. Date-only patterns
/// produce midnight.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateConverter;

impl DateConverter {
    fn parse_with(raw: &str, format: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, format).ok().or_else(|| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
    }
}

impl Converter for DateConverter {
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        let raw = required(raw, descriptor)?.trim();
        let parsed = match descriptor.attribute("format") {
            Some(format) => Self::parse_with(raw, format),
            None => DEFAULT_DATE_FORMATS
                .iter()
                .find_map(|format| Self::parse_with(raw, format)),
        };
        parsed.map(Value::Date).ok_or_else(|| {
            NamingError::conversion(
                descriptor.label(),
                "date",
                format!("'{}' does not match the date format", raw),
            )
        })
    }
}

/// Populates a property map from the descriptor's attributes.
///
/// Repeated attributes become lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeanConverter;

impl Converter for BeanConverter {
    fn convert(&self, _raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        let properties: IndexMap<String, Value> = descriptor
            .attributes()
            .iter()
            .map(|(name, value)| {
                let value = match value {
                    RecordValue::Single(s) => Value::from(s.as_str()),
                    RecordValue::Multi(values) => {
                        Value::List(values.iter().map(|v| Value::from(v.as_str())).collect())
                    }
                };
                (name.clone(), value)
            })
            .collect();
        Ok(Value::Map(properties))
    }
}

/// Resource factory for database connection descriptors.
///
/// Requires a `url` attribute and yields a reference carrying every
/// attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataSourceConverter;

impl Converter for DataSourceConverter {
    fn convert(&self, _raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        if descriptor.attribute("url").is_none() {
            return Err(NamingError::conversion(
                descriptor.label(),
                descriptor.type_name(),
                "missing required attribute 'url'",
            ));
        }
        Ok(Value::Reference(descriptor.to_reference()))
    }
}

/// Converters keyed by type name.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::ConverterRegistry;
/// use nametree::domain::{Name, TypeDescriptor, Value};
/// use nametree::ports::Converter;
///
/// let registry = ConverterRegistry::with_builtins();
/// let descriptor = TypeDescriptor::new(Name::from(vec!["debug"]), "boolean");
/// let converter = registry.get("boolean").unwrap();
/// assert_eq!(converter.convert(Some("yes"), &descriptor).unwrap(), Value::Bool(true));
/// ```
#[derive(Clone, Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, Arc<dyn Converter>>,
}

impl ConverterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in converters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("string", Arc::new(StringConverter));
        let boolean: Arc<dyn Converter> = Arc::new(BoolConverter);
        registry.register("bool", boolean.clone());
        registry.register("boolean", boolean);
        let integer: Arc<dyn Converter> = Arc::new(IntegerConverter);
        registry.register("int", integer.clone());
        registry.register("integer", integer.clone());
        registry.register("long", integer);
        let float: Arc<dyn Converter> = Arc::new(FloatConverter);
        registry.register("float", float.clone());
        registry.register("double", float);
        registry.register("date", Arc::new(DateConverter));
        registry.register("bean", Arc::new(BeanConverter));
        registry.register("datasource", Arc::new(DataSourceConverter));
        registry
    }

    /// Registers a converter, replacing any previous one for the type name.
    pub fn register(&mut self, type_name: impl Into<String>, converter: Arc<dyn Converter>) {
        self.converters.insert(type_name.into(), converter);
    }

    /// Returns the converter for a type name.
    pub fn get(&self, type_name: &str) -> Option<Arc<dyn Converter>> {
        self.converters.get(type_name).cloned()
    }

    /// Returns true if a converter is registered for the type name.
    pub fn contains(&self, type_name: &str) -> bool {
        self.converters.contains_key(type_name)
    }

    /// Returns the number of registered type names.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true if no converter is registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.converters.keys().collect();
        names.sort();
        f.debug_struct("ConverterRegistry")
            .field("types", &names)
            .finish()
    }
}
