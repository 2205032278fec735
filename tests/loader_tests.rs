// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for loading typed records.
//!
//! These tests exercise type descriptors end to end: the built-in
//! converters, converter plugins, object factories and namespace
//! replacement.

mod common;

use common::{Pool, PoolFactory};
use nametree::prelude::*;
use std::sync::atomic::Ordering;
use std::sync::Arc;

fn records(pairs: &[(&str, &str)]) -> Records {
    pairs.iter().copied().collect()
}

#[test]
fn test_type_descriptor_end_to_end() {
    common::init_tracing();
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context
        .load(&records(&[("foo.type", "boolean"), ("foo", "true")]))
        .unwrap();
    assert_eq!(context.lookup_value("foo").unwrap(), Value::Bool(true));
}

#[test]
fn test_type_descriptor_with_other_delimiter_stays_raw() {
    let context = NamingContext::open(NamingConfig::default().with_delimiter("/")).unwrap();
    context
        .load(&records(&[("foo.type", "boolean"), ("foo", "true")]))
        .unwrap();
    assert_eq!(context.lookup_value("foo").unwrap(), Value::from("true"));
}

#[test]
fn test_repeated_typed_values_convert_per_element() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context
        .load(&records(&[
            ("ports.type", "integer"),
            ("ports", "80"),
            ("ports", "443"),
        ]))
        .unwrap();
    assert_eq!(
        context.lookup_value("ports").unwrap(),
        Value::List(vec![Value::Integer(80), Value::Integer(443)])
    );
}

#[test]
fn test_nested_typed_value() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context
        .load(&records(&[
            ("app.started.type", "date"),
            ("app.started.format", "%d/%m/%Y"),
            ("app.started", "02/01/2024"),
            ("app.name", "demo"),
        ]))
        .unwrap();
    let started = context.lookup_value("app.started").unwrap();
    assert_eq!(started.as_date().unwrap().to_string(), "2024-01-02 00:00:00");
    assert_eq!(context.list("app").unwrap(), vec!["name", "started"]);
}

#[test]
fn test_bean_descriptor() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context
        .load(&records(&[
            ("mail.type", "bean"),
            ("mail.host", "smtp.local"),
            ("mail.port", "25"),
        ]))
        .unwrap();
    let mail = context.lookup_value("mail").unwrap();
    let map = mail.as_map().unwrap();
    assert_eq!(map.get("host"), Some(&Value::from("smtp.local")));
    assert_eq!(map.get("port"), Some(&Value::from("25")));
}

#[test]
fn test_namespace_descriptor_replaces_namespace() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    let source = TextSource::new(
        RecordFormat::Properties,
        "type=datasource\nurl=postgres://localhost/app\nuser=app",
    )
    .with_namespace("jdbc.main");
    context.load_source(&source).unwrap();

    let value = context.lookup_value("jdbc.main").unwrap();
    let reference = value.as_reference().unwrap();
    assert_eq!(reference.type_name(), "datasource");
    assert_eq!(reference.get("url"), Some("postgres://localhost/app"));
    assert!(context.lookup("jdbc").unwrap().is_node());
}

#[test]
fn test_namespace_descriptor_missing_url_fails() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    let source = TextSource::new(RecordFormat::Properties, "type=datasource\nuser=app")
        .with_namespace("db");
    assert!(matches!(
        context.load_source(&source),
        Err(NamingError::ConversionFailure { .. })
    ));
}

#[test]
fn test_converter_plugin() {
    let upper = common::upper();
    let context = NamingContext::builder()
        .with_converter_plugin("upper", upper.clone())
        .build()
        .unwrap();
    context
        .load(&records(&[
            ("greeting.type", "string"),
            ("greeting.converter", "upper"),
            ("greeting", "hello"),
        ]))
        .unwrap();
    assert_eq!(context.lookup_value("greeting").unwrap(), Value::from("HELLO"));
    assert_eq!(upper.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_custom_converter_by_type() {
    let context = NamingContext::builder()
        .with_converter("shout", common::upper())
        .build()
        .unwrap();
    context
        .load(&records(&[("x.type", "shout"), ("x", "a"), ("x", "b")]))
        .unwrap();
    assert_eq!(
        context.lookup_value("x").unwrap(),
        Value::List(vec![Value::from("A"), Value::from("B")])
    );
}

#[test]
fn test_object_factory() {
    let context = NamingContext::builder()
        .with_object_factory(Arc::new(PoolFactory))
        .build()
        .unwrap();
    context
        .load(&records(&[
            ("db.type", "pool"),
            ("db.url", "postgres://h/db"),
            ("db.size", "8"),
            ("flag.type", "boolean"),
            ("flag", "no"),
        ]))
        .unwrap();

    let db = context.lookup_value("db").unwrap();
    assert_eq!(
        db.downcast_ref::<Pool>(),
        Some(&Pool {
            url: "postgres://h/db".to_string(),
            size: 8
        })
    );
    assert_eq!(context.lookup_value("flag").unwrap(), Value::Bool(false));
}

#[test]
fn test_unknown_type_binds_raw_value() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context
        .load(&records(&[("x.type", "com.example.Widget"), ("x", "raw")]))
        .unwrap();
    assert_eq!(context.lookup_value("x").unwrap(), Value::from("raw"));
}

#[test]
fn test_failures_reported_after_pass() {
    common::init_tracing();
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    let result = context.load(&records(&[
        ("bad.type", "integer"),
        ("bad", "x"),
        ("good", "1"),
        ("also.good", "2"),
    ]));
    assert!(matches!(result, Err(NamingError::ConversionFailure { .. })));
    assert_eq!(context.lookup_value("good").unwrap(), Value::from("1"));
    assert_eq!(context.lookup_value("also.good").unwrap(), Value::from("2"));
}

#[test]
fn test_structural_conflict() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    let result = context.load(&records(&[("a", "leaf"), ("a.b", "child")]));
    assert!(matches!(
        result,
        Err(NamingError::StructuralConflict { .. })
    ));
    assert_eq!(context.lookup_value("a").unwrap(), Value::from("leaf"));
}

#[test]
fn test_loading_twice_merges_nodes() {
    let context = NamingContext::open(NamingConfig::default()).unwrap();
    context.load(&records(&[("db.host", "h")])).unwrap();
    context.load(&records(&[("db.port", "1")])).unwrap();
    assert_eq!(context.list("db").unwrap(), vec!["host", "port"]);
}
