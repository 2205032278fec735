// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer orchestrating the tree, the parsers and the converters.
//!
//! This module contains the conversion service, the loader that writes
//! record sets into a tree, and the naming context handle.

pub mod context;
pub mod conversion;
pub mod loader;

// Re-export commonly used types
pub use context::{NamingContext, NamingContextBuilder};
pub use conversion::ConversionService;
pub use loader::Loader;
