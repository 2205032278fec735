// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion capability traits.
//!
//! A [`Converter`] turns the raw value of a type descriptor into a bound
//! value. An [`ObjectFactory`] gets the first chance at every descriptor and
//! may materialize it into an application object.

use crate::domain::{Result, TypeDescriptor, Value};

/// A trait for converting type descriptors into values.
///
/// `raw` is one raw value recorded at the descriptor's path, or `None` when
/// the descriptor only carries attributes. When a key was repeated the
/// converter is called once per element.
///
/// Closures with the matching signature are converters too.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::{Name, Result, TypeDescriptor, Value};
/// use nametree::ports::Converter;
///
/// let upper = |raw: Option<&str>, _d: &TypeDescriptor| -> Result<Value> {
///     Ok(Value::from(raw.unwrap_or_default().to_uppercase()))
/// };
///
/// let descriptor = TypeDescriptor::new(Name::from(vec!["greeting"]), "upper");
/// let value = upper.convert(Some("hi"), &descriptor).unwrap();
/// assert_eq!(value, Value::from("HI"));
/// ```
pub trait Converter: Send + Sync {
    /// Converts one raw value of the descriptor.
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value>;
}

impl<F> Converter for F
where
    F: Fn(Option<&str>, &TypeDescriptor) -> Result<Value> + Send + Sync,
{
    fn convert(&self, raw: Option<&str>, descriptor: &TypeDescriptor) -> Result<Value> {
        self(raw, descriptor)
    }
}

/// A pluggable factory consulted before the built-in converters.
///
/// Returning `Ok(None)`, or a [`Value::Reference`], declines the descriptor
/// and lets conversion fall through to the converter registry.
pub trait ObjectFactory: Send + Sync {
    /// Attempts to produce a value for the descriptor.
    fn object_instance(&self, descriptor: &TypeDescriptor) -> Result<Option<Value>>;
}
