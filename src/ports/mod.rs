// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! between the naming tree and its collaborators: record parsers, record
//! sources and value converters. These traits are implemented by adapters in
//! the adapters layer.

pub mod converter;
pub mod parser;
pub mod source;

// Re-export commonly used types
pub use converter::{Converter, ObjectFactory};
pub use parser::{RecordFormat, RecordParser};
pub use source::RecordSource;
