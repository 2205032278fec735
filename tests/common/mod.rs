// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for integration tests.

use nametree::domain::{Delimiter, NamingError, Records, Result, TypeDescriptor, Value};
use nametree::ports::{Converter, ObjectFactory, RecordSource};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber once per test binary.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// A record source with fixed records.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    name: String,
    namespace: Option<String>,
    pairs: Vec<(String, String)>,
    fail: bool,
}

#[allow(dead_code)]
impl MockSource {
    /// Creates an empty mock source.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a record. Repeated keys coalesce.
    pub fn with_record(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Loads the records under a namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Makes `records()` fail.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn records(&self, _delimiter: &Delimiter) -> Result<Records> {
        if self.fail {
            return Err(NamingError::SourceError {
                source_name: self.name.clone(),
                message: "Mock source failure".to_string(),
                source: None,
            });
        }
        Ok(self.pairs.iter().cloned().collect())
    }
}

/// A converter that upper-cases its raw value and counts its calls.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct UpperConverter {
    pub calls: AtomicUsize,
}

impl Converter for UpperConverter {
    fn convert(&self, raw: Option<&str>, _descriptor: &TypeDescriptor) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Value::from(raw.unwrap_or_default().to_uppercase()))
    }
}

/// An application object produced by [`PoolFactory`].
#[allow(dead_code)]
#[derive(Debug, PartialEq)]
pub struct Pool {
    pub url: String,
    pub size: usize,
}

/// An object factory that builds [`Pool`]s for `pool` descriptors.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct PoolFactory;

impl ObjectFactory for PoolFactory {
    fn object_instance(&self, descriptor: &TypeDescriptor) -> Result<Option<Value>> {
        if descriptor.type_name() != "pool" {
            return Ok(None);
        }
        let url = descriptor
            .attribute("url")
            .ok_or_else(|| NamingError::conversion(descriptor.label(), "pool", "missing url"))?;
        let size = descriptor
            .attribute("size")
            .unwrap_or("1")
            .parse::<usize>()
            .map_err(|e| NamingError::ConversionFailure {
                name: descriptor.label(),
                type_name: "pool".to_string(),
                source: Box::new(e),
            })?;
        Ok(Some(Value::object(Pool {
            url: url.to_string(),
            size,
        })))
    }
}

/// Wraps the upper-casing converter for registration.
#[allow(dead_code)]
pub fn upper() -> Arc<UpperConverter> {
    Arc::new(UpperConverter::default())
}
