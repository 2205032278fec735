// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the namespace tree, the path segmenter, the flat
//! record mapping and the type-descriptor classifier. It is independent of
//! any source format and defines the fundamental concepts used throughout the
//! library.

pub mod config;
pub mod descriptor;
pub mod errors;
pub mod name;
pub mod node;
pub mod records;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use config::NamingConfig;
pub use descriptor::{classify, Classification, TypeDescriptor};
pub use errors::{NamingError, Result};
pub use name::{Delimiter, Name, ToName};
pub use node::{Binding, Bound, Node, NodeConfig};
pub use records::{RecordValue, Records};
pub use registry::SharedRootRegistry;
pub use value::{Reference, Value};
