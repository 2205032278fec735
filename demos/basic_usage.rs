// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the nametree crate.
//!
//! This example demonstrates:
//! - Opening a naming context
//! - Creating sub-nodes and binding values
//! - Looking up, listing, renaming and unbinding names
//! - Loading a block (`.ini` style) source
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use nametree::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== nametree: Basic Usage ===\n");

    let context = NamingContext::open(NamingConfig::default().with_delimiter("/"))?;

    // Example 1: Build a tree by hand
    println!("--- Example 1: Binding ---");
    context.create_subnode("services")?;
    context.create_subnode("services/mail")?;
    context.bind("services/mail/host", "smtp.example.com")?;
    context.bind("services/mail/port", Value::Integer(587))?;
    println!(
        "✓ services/mail/host = {}",
        context.lookup_value("services/mail/host")?
    );

    match context.bind("services/mail/host", "other.example.com") {
        Ok(()) => println!("✗ second bind unexpectedly succeeded"),
        Err(e) => println!("✓ second bind refused: {}", e),
    }
    context.rebind("services/mail/host", "relay.example.com")?;
    println!(
        "✓ after rebind: {}",
        context.lookup_value("services/mail/host")?
    );

    // Example 2: Listing
    println!("\n--- Example 2: Listing ---");
    for binding in context.list_bindings("services/mail")? {
        match binding.value {
            Bound::Value(value) => println!("  {} = {}", binding.name, value),
            Bound::Node(node) => println!("  {}/ ({})", binding.name, node.name_in_namespace()),
        }
    }

    // Example 3: Rename and unbind
    println!("\n--- Example 3: Rename and Unbind ---");
    context.rename("services/mail/port", "services/mail/submission")?;
    println!("✓ names now: {:?}", context.list("services/mail")?);
    context.unbind("services/mail/submission")?;
    println!("✓ names now: {:?}", context.list("services/mail")?);

    // Example 4: Loading a block source
    println!("\n--- Example 4: Loading ---");
    context.load_text(
        RecordFormat::Ini,
        "[cache]\nsize=64 # entries\nnodes=a\nnodes=b\n",
    )?;
    println!("✓ cache/size = {}", context.lookup_value("cache/size")?);
    println!("✓ cache/nodes = {}", context.lookup_value("cache/nodes")?);

    // Example 5: Destroying and closing
    println!("\n--- Example 5: Teardown ---");
    context.destroy_subnode("services")?;
    println!("✓ top-level names: {:?}", context.list("")?);
    context.close()?;
    context.close()?;
    println!("✓ closed twice without error");

    Ok(())
}
