// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for shared roots.
//!
//! Each test injects its own registry so tests stay independent.

mod common;

use nametree::prelude::*;
use std::sync::Arc;

fn open(registry: &Arc<SharedRootRegistry>, root: &str, shared: bool) -> NamingContext {
    NamingContext::builder()
        .with_root(root)
        .shared(shared)
        .with_registry(registry.clone())
        .build()
        .unwrap()
}

#[test]
fn test_shared_handles_observe_each_other() {
    common::init_tracing();
    let registry = Arc::new(SharedRootRegistry::new());
    let first = open(&registry, "/etc/app", true);
    let second = open(&registry, "/etc/app", true);

    first.bind("k", "v").unwrap();
    assert_eq!(second.lookup_value("k").unwrap(), Value::from("v"));
    assert!(Node::ptr_eq(first.root(), second.root()));
}

#[test]
fn test_unshared_handles_are_private() {
    let registry = Arc::new(SharedRootRegistry::new());
    let first = open(&registry, "/etc/app", false);
    let second = open(&registry, "/etc/app", false);

    first.bind("k", "v").unwrap();
    assert!(matches!(second.lookup("k"), Err(NamingError::NotFound { .. })));
    assert!(registry.is_empty());
}

#[test]
fn test_different_roots_are_separate() {
    let registry = Arc::new(SharedRootRegistry::new());
    let first = open(&registry, "a", true);
    let second = open(&registry, "b", true);

    first.bind("k", "v").unwrap();
    assert!(second.lookup("k").is_err());
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_ignore_close_keeps_shared_tree() {
    let registry = Arc::new(SharedRootRegistry::new());
    let keeper = open(&registry, "r", true);
    keeper.bind("k", "v").unwrap();

    let transient = NamingContext::builder()
        .with_root("r")
        .shared(true)
        .ignore_close(true)
        .with_registry(registry.clone())
        .build()
        .unwrap();
    transient.close().unwrap();

    assert!(registry.contains("r"));
    assert_eq!(keeper.lookup_value("k").unwrap(), Value::from("v"));
}

#[test]
fn test_close_unpublishes_then_tears_down() {
    let registry = Arc::new(SharedRootRegistry::new());
    let first = open(&registry, "r", true);
    first.bind("k", "v").unwrap();
    let second = open(&registry, "r", true);

    first.close().unwrap();
    assert!(!registry.contains("r"));
    assert!(matches!(second.lookup("k"), Err(NamingError::Closed { .. })));

    let reopened = open(&registry, "r", true);
    assert!(reopened.lookup("k").is_err());
    assert!(!Node::ptr_eq(reopened.root(), second.root()));
}

#[test]
fn test_closing_stale_handle_keeps_new_tree() {
    let registry = Arc::new(SharedRootRegistry::new());
    let stale = open(&registry, "r", true);
    registry.remove("r");
    let fresh = open(&registry, "r", true);

    stale.close().unwrap();
    assert!(registry.contains("r"));
    fresh.bind("k", "v").unwrap();
}

#[test]
fn test_concurrent_opens_share_one_tree() {
    let registry = Arc::new(SharedRootRegistry::new());
    let handles: Vec<NamingContext> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|i| {
                let registry = &registry;
                scope.spawn(move || {
                    let context = open(registry, "r", true);
                    context.bind(format!("k{}", i).as_str(), Value::Integer(i)).unwrap();
                    context
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    assert_eq!(registry.len(), 1);
    assert_eq!(handles[0].list("").unwrap().len(), 8);
}

#[test]
fn test_shared_sources_load_into_shared_tree() {
    let registry = Arc::new(SharedRootRegistry::new());
    let _first = NamingContext::builder()
        .with_root("cfg")
        .shared(true)
        .with_registry(registry.clone())
        .with_source(Box::new(common::MockSource::new("a").with_record("x", "1")))
        .build()
        .unwrap();
    let second = open(&registry, "cfg", true);
    assert_eq!(second.lookup_value("x").unwrap(), Value::from("1"));
}

fn open_with_source(registry: &Arc<SharedRootRegistry>, content: &str) -> Result<NamingContext> {
    NamingContext::builder()
        .with_root("cfg")
        .shared(true)
        .with_registry(registry.clone())
        .with_source(Box::new(TextSource::new(RecordFormat::Properties, content)))
        .build()
}

#[test]
fn test_second_shared_open_with_same_source_reuses_tree() {
    common::init_tracing();
    let registry = Arc::new(SharedRootRegistry::new());
    let first = open_with_source(&registry, "db.host=h").unwrap();
    let second = open_with_source(&registry, "db.host=h").unwrap();

    assert!(Node::ptr_eq(first.root(), second.root()));
    assert_eq!(second.lookup_value("db.host").unwrap(), Value::from("h"));
    assert_eq!(second.list("db").unwrap(), vec!["host"]);
}

#[test]
fn test_shared_open_with_failing_source_publishes_nothing() {
    let registry = Arc::new(SharedRootRegistry::new());
    let result = open_with_source(&registry, "a=1\na.b=2");
    assert!(matches!(result, Err(NamingError::StructuralConflict { .. })));
    assert!(!registry.contains("cfg"));

    let retry = open_with_source(&registry, "a.b=2").unwrap();
    assert_eq!(retry.lookup_value("a.b").unwrap(), Value::from("2"));
}

#[test]
fn test_closing_handle_decides_even_if_builder_ignored_close() {
    let registry = Arc::new(SharedRootRegistry::new());
    let keeper = NamingContext::builder()
        .with_root("r")
        .shared(true)
        .ignore_close(true)
        .with_registry(registry.clone())
        .build()
        .unwrap();
    keeper.bind("k", "v").unwrap();

    let closer = open(&registry, "r", true);
    closer.close().unwrap();

    assert!(!registry.contains("r"));
    assert!(keeper.root().is_closed());
    assert!(matches!(keeper.lookup("k"), Err(NamingError::Closed { .. })));

    let reopened = open(&registry, "r", true);
    assert!(!Node::ptr_eq(reopened.root(), keeper.root()));
}

#[cfg(feature = "yaml")]
#[test]
fn test_config_from_yaml() {
    let config = NamingConfig::from_yaml("delimiter: /\nshared: true\nroot: yaml-root\n").unwrap();
    let registry = Arc::new(SharedRootRegistry::new());
    let context = NamingContext::builder()
        .with_config(config)
        .with_registry(registry.clone())
        .build()
        .unwrap();
    assert!(context.is_shared());
    assert!(registry.contains("yaml-root"));
}
