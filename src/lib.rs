// SPDX-License-Identifier: MIT OR Apache-2.0

//! A hierarchical, in-process naming tree populated from configuration text.
//!
//! This crate provides a tree of named bindings that can be filled
//! programmatically or by loading flat, block, markup or YAML configuration
//! sources, and then queried with path-style lookups such as `a/b/c` or
//! `a.b.c`, depending on the configured delimiter.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and tree logic (`Node`, `Name`, `Value`,
//!   `Records`, type descriptors, the shared-root registry, errors)
//! - **Ports**: Trait definitions that define interfaces (`RecordParser`,
//!   `RecordSource`, `Converter`, `ObjectFactory`)
//! - **Adapters**: Parsers for each source format, a text-backed source and
//!   the built-in converters
//! - **Service**: Conversion, the loader, and the `NamingContext` handle
//!
//! # Features
//!
//! - **Tree operations**: lookup, bind, rebind, unbind, rename, list and
//!   sub-node management on any node
//! - **Loading**: repeated keys coalesce into lists, and keys ending in a
//!   `type` segment are converted into typed values
//! - **Shared roots**: handles opened in shared mode with the same root
//!   identifier observe the same tree
//! - **Extensible**: converters, converter plugins and an object factory can
//!   be supplied by the application
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML sources and YAML configuration (default)
//! - `xml`: Enable element/attribute markup sources (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use nametree::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let context = NamingContext::open(NamingConfig::default().with_delimiter("/"))?;
//! context.load_text(
//!     RecordFormat::Properties,
//!     "jdbc/pool/size/type=integer\njdbc/pool/size=8\njdbc/hosts=a\njdbc/hosts=b",
//! )?;
//!
//! assert_eq!(context.lookup_value("jdbc/pool/size")?, Value::Integer(8));
//! assert_eq!(
//!     context.lookup_value("jdbc/hosts")?,
//!     Value::List(vec![Value::from("a"), Value::from("b")])
//! );
//! assert_eq!(context.list("jdbc")?, vec!["hosts", "pool"]);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{ConverterRegistry, IniParser, PropertiesParser, TextSource};
    pub use crate::domain::{
        Binding, Bound, Delimiter, Name, NamingConfig, NamingError, Node, NodeConfig, Records,
        Reference, Result, SharedRootRegistry, TypeDescriptor, Value,
    };
    pub use crate::ports::{Converter, ObjectFactory, RecordFormat, RecordParser, RecordSource};
    pub use crate::service::{ConversionService, Loader, NamingContext, NamingContextBuilder};

    #[cfg(feature = "xml")]
    pub use crate::adapters::XmlParser;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
