// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed records example for the nametree crate.
//!
//! This example demonstrates:
//! - Keys ending in `type` converted by the built-in converters
//! - A converter plugin selected with a `converter` attribute
//! - An object factory producing application objects
//! - A namespace replaced by a resource reference
//! - Two shared handles observing the same tree
//!
//! To run this example:
//! ```bash
//! cargo run --example typed_records
//! ```

use nametree::prelude::*;
use std::sync::Arc;

/// An application object built from a `pool` descriptor.
#[derive(Debug)]
struct Pool {
    url: String,
    size: usize,
}

struct PoolFactory;

impl ObjectFactory for PoolFactory {
    fn object_instance(&self, descriptor: &TypeDescriptor) -> Result<Option<Value>> {
        if descriptor.type_name() != "pool" {
            return Ok(None);
        }
        let url = descriptor.attribute("url").unwrap_or_default().to_string();
        let size = descriptor
            .attribute("size")
            .unwrap_or("1")
            .parse::<usize>()
            .map_err(|e| NamingError::ConversionFailure {
                name: descriptor.label(),
                type_name: "pool".to_string(),
                source: Box::new(e),
            })?;
        Ok(Some(Value::object(Pool { url, size })))
    }
}

const APP: &str = "\
app.name=demo
app.debug.type=boolean
app.debug=yes
app.workers.type=integer
app.workers=4
app.started.type=date
app.started=2024-05-01T08:30:00
app.motd.type=text
app.motd.converter=shout
app.motd=welcome
app.pool.type=pool
app.pool.url=postgres://localhost/app
app.pool.size=8
";

const DATASOURCE: &str = "\
type=datasource
url=postgres://localhost/reports
user=reporter
";

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== nametree: Typed Records ===\n");

    let registry = Arc::new(SharedRootRegistry::new());
    let shout = |raw: Option<&str>, _d: &TypeDescriptor| -> Result<Value> {
        Ok(Value::from(raw.unwrap_or_default().to_uppercase()))
    };

    let context = NamingContext::builder()
        .with_root("demo")
        .shared(true)
        .with_registry(registry.clone())
        .with_converter_plugin("shout", Arc::new(shout))
        .with_object_factory(Arc::new(PoolFactory))
        .with_source(Box::new(TextSource::new(RecordFormat::Properties, APP)))
        .with_source(Box::new(
            TextSource::new(RecordFormat::Properties, DATASOURCE).with_namespace("jdbc.reports"),
        ))
        .build()?;

    println!("--- Converted values ---");
    for name in ["app.name", "app.debug", "app.workers", "app.started", "app.motd"] {
        let value = context.lookup_value(name)?;
        println!("  {} = {} ({})", name, value, value.kind());
    }

    println!("\n--- Object factory ---");
    let pool = context.lookup_value("app.pool")?;
    if let Some(pool) = pool.downcast_ref::<Pool>() {
        println!("  app.pool -> {} with {} connections", pool.url, pool.size);
    }

    println!("\n--- Namespace replaced by a reference ---");
    let reports = context.lookup_value("jdbc.reports")?;
    if let Some(reference) = reports.as_reference() {
        println!("  jdbc.reports is a '{}' reference", reference.type_name());
        for (key, value) in reference.properties() {
            println!("    {} = {}", key, value);
        }
    }

    println!("\n--- Shared handles ---");
    let other = NamingContext::builder()
        .with_root("demo")
        .shared(true)
        .with_registry(registry.clone())
        .build()?;
    other.bind("app.owner", "ops")?;
    println!("  first handle sees app.owner = {}", context.lookup_value("app.owner")?);

    context.close()?;
    println!("  registry holds 'demo' after close: {}", registry.contains("demo"));

    Ok(())
}
