// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type descriptor conversion.
//!
//! This module resolves which conversion capability applies to a descriptor
//! and applies it, once per raw value when the value was repeated.

use crate::adapters::ConverterRegistry;
use crate::domain::{NamingError, RecordValue, Result, TypeDescriptor, Value};
use crate::ports::{Converter, ObjectFactory};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts type descriptors into bound values.
///
/// Resolution order:
///
/// 1. An explicit `converter` attribute selects a plugin by identifier.
/// 2. The object factory, if configured, unless it declines or returns a
///    reference.
/// 3. The converter registered for the type name.
/// 4. The raw value, unchanged.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::{Name, RecordValue, TypeDescriptor, Value};
/// use nametree::service::ConversionService;
///
/// # fn main() -> nametree::domain::Result<()> {
/// let service = ConversionService::new();
/// let descriptor = TypeDescriptor::new(Name::from(vec!["ports"]), "integer")
///     .with_value(RecordValue::Multi(vec!["80".into(), "443".into()]));
///
/// let value = service.convert(&descriptor)?;
/// assert_eq!(value, Value::List(vec![Value::Integer(80), Value::Integer(443)]));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConversionService {
    registry: ConverterRegistry,
    plugins: HashMap<String, Arc<dyn Converter>>,
    object_factory: Option<Arc<dyn ObjectFactory>>,
}

impl ConversionService {
    /// Creates a service backed by the built-in converters.
    pub fn new() -> Self {
        Self::with_registry(ConverterRegistry::with_builtins())
    }

    /// Creates a service backed by the given registry.
    pub fn with_registry(registry: ConverterRegistry) -> Self {
        Self {
            registry,
            plugins: HashMap::new(),
            object_factory: None,
        }
    }

    /// Registers a converter for a type name.
    pub fn register_converter(&mut self, type_name: impl Into<String>, converter: Arc<dyn Converter>) {
        self.registry.register(type_name, converter);
    }

    /// Registers a converter selectable through a `converter` attribute.
    pub fn register_plugin(&mut self, id: impl Into<String>, converter: Arc<dyn Converter>) {
        self.plugins.insert(id.into(), converter);
    }

    /// Installs the object factory consulted before the registry.
    pub fn set_object_factory(&mut self, factory: Arc<dyn ObjectFactory>) {
        self.object_factory = Some(factory);
    }

    /// Returns the converter registry.
    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// Converts a descriptor into the value to bind.
    pub fn convert(&self, descriptor: &TypeDescriptor) -> Result<Value> {
        if let Some(id) = descriptor.converter() {
            let plugin = self.plugins.get(id).ok_or_else(|| {
                NamingError::conversion(
                    descriptor.label(),
                    descriptor.type_name(),
                    format!("unknown converter '{}'", id),
                )
            })?;
            tracing::debug!("Converting '{}' with plugin '{}'", descriptor.label(), id);
            return Self::apply(plugin.as_ref(), descriptor);
        }

        if let Some(factory) = &self.object_factory {
            if let Some(value) = factory.object_instance(descriptor)? {
                if !value.is_reference() {
                    tracing::debug!("Object factory produced '{}'", descriptor.label());
                    return Ok(value);
                }
            }
        }

        if let Some(converter) = self.registry.get(descriptor.type_name()) {
            tracing::debug!(
                "Converting '{}' as '{}'",
                descriptor.label(),
                descriptor.type_name()
            );
            return Self::apply(converter.as_ref(), descriptor);
        }

        tracing::debug!(
            "No converter for type '{}', binding '{}' unconverted",
            descriptor.type_name(),
            descriptor.label()
        );
        Ok(match descriptor.value() {
            Some(RecordValue::Single(raw)) => Value::from(raw.as_str()),
            Some(RecordValue::Multi(raws)) => {
                Value::List(raws.iter().map(|raw| Value::from(raw.as_str())).collect())
            }
            None => Value::Reference(descriptor.to_reference()),
        })
    }

    fn apply(converter: &dyn Converter, descriptor: &TypeDescriptor) -> Result<Value> {
        match descriptor.value() {
            None => converter.convert(None, descriptor),
            Some(RecordValue::Single(raw)) => converter.convert(Some(raw), descriptor),
            Some(RecordValue::Multi(raws)) => raws
                .iter()
                .map(|raw| converter.convert(Some(raw), descriptor))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
        }
    }
}

impl Default for ConversionService {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConversionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut plugins: Vec<&String> = self.plugins.keys().collect();
        plugins.sort();
        f.debug_struct("ConversionService")
            .field("registry", &self.registry)
            .field("plugins", &plugins)
            .field("object_factory", &self.object_factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Name, Reference};

    fn descriptor(type_name: &str, raw: &str) -> TypeDescriptor {
        TypeDescriptor::new(Name::from(vec!["x"]), type_name)
            .with_value(RecordValue::Single(raw.to_string()))
    }

    fn upper() -> Arc<dyn Converter> {
        Arc::new(|raw: Option<&str>, _d: &TypeDescriptor| -> Result<Value> {
            Ok(Value::from(raw.unwrap_or_default().to_uppercase()))
        })
    }

    struct Factory(Option<Value>);

    impl ObjectFactory for Factory {
        fn object_instance(&self, _descriptor: &TypeDescriptor) -> Result<Option<Value>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_registry_conversion() {
        let service = ConversionService::new();
        assert_eq!(
            service.convert(&descriptor("boolean", "true")).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let service = ConversionService::new();
        assert_eq!(
            service.convert(&descriptor("mystery", "raw")).unwrap(),
            Value::from("raw")
        );
    }

    #[test]
    fn test_unknown_type_without_value_is_reference() {
        let service = ConversionService::new();
        let d = TypeDescriptor::new(Name::from(vec!["x"]), "mystery").with_attribute("a", "1");
        let value = service.convert(&d).unwrap();
        assert_eq!(
            value.as_reference(),
            Some(&Reference::new("mystery").with_property("a", "1"))
        );
    }

    #[test]
    fn test_plugin_wins_over_registry() {
        let mut service = ConversionService::new();
        service.register_plugin("upper", upper());
        let d = descriptor("boolean", "true").with_converter("upper");
        assert_eq!(service.convert(&d).unwrap(), Value::from("TRUE"));
    }

    #[test]
    fn test_unknown_plugin_fails() {
        let service = ConversionService::new();
        let d = descriptor("string", "v").with_converter("missing");
        assert!(matches!(
            service.convert(&d),
            Err(NamingError::ConversionFailure { .. })
        ));
    }

    #[test]
    fn test_object_factory_wins_over_registry() {
        let mut service = ConversionService::new();
        service.set_object_factory(Arc::new(Factory(Some(Value::Integer(7)))));
        assert_eq!(
            service.convert(&descriptor("boolean", "true")).unwrap(),
            Value::Integer(7)
        );
    }

    #[test]
    fn test_object_factory_reference_falls_through() {
        let mut service = ConversionService::new();
        service.set_object_factory(Arc::new(Factory(Some(Value::Reference(Reference::new(
            "boolean",
        ))))));
        assert_eq!(
            service.convert(&descriptor("boolean", "true")).unwrap(),
            Value::Bool(true)
        );

        service.set_object_factory(Arc::new(Factory(None)));
        assert_eq!(
            service.convert(&descriptor("boolean", "no")).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_multi_value_converted_per_element() {
        let service = ConversionService::new();
        let d = TypeDescriptor::new(Name::from(vec!["x"]), "boolean")
            .with_value(RecordValue::Multi(vec!["yes".into(), "no".into()]));
        assert_eq!(
            service.convert(&d).unwrap(),
            Value::List(vec![Value::Bool(true), Value::Bool(false)])
        );
    }

    #[test]
    fn test_multi_value_failure_propagates() {
        let service = ConversionService::new();
        let d = TypeDescriptor::new(Name::from(vec!["x"]), "integer")
            .with_value(RecordValue::Multi(vec!["1".into(), "two".into()]));
        assert!(service.convert(&d).is_err());
    }

    #[test]
    fn test_register_converter_by_type() {
        let mut service = ConversionService::with_registry(ConverterRegistry::new());
        service.register_converter("shout", upper());
        assert_eq!(
            service.convert(&descriptor("shout", "hi")).unwrap(),
            Value::from("HI")
        );
        assert_eq!(
            service.convert(&descriptor("boolean", "true")).unwrap(),
            Value::from("true")
        );
    }
}
