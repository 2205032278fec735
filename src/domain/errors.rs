// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the naming tree.
//!
//! This module defines the classified failures that can occur when operating on
//! the namespace tree, parsing record sources, or converting typed values.
//! All errors use `thiserror` for proper error handling and conversion.

use std::num::{ParseFloatError, ParseIntError};
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for naming operations.
///
/// Every structural violation is reported with its own variant so callers can
/// tell a missing name from a name that is bound to a leaf where a node was
/// required. It is marked as `#[non_exhaustive]` to allow for future additions
/// without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use nametree::domain::errors::NamingError;
///
/// fn find_host() -> Result<String, NamingError> {
///     Err(NamingError::NotFound {
///         name: "database/host".to_string(),
///     })
/// }
///
/// assert!(matches!(find_host(), Err(NamingError::NotFound { .. })));
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NamingError {
    /// The name does not resolve to any binding.
    #[error("Name not found: {name}")]
    NotFound {
        /// The name that was not found
        name: String,
    },

    /// The target name already holds a value.
    #[error("Name already bound: {name}")]
    AlreadyBound {
        /// The name that is already bound
        name: String,
    },

    /// A leaf value was found where a child node was required.
    #[error("Name is bound to a value, not a node: {name}")]
    NotANode {
        /// The name bound to a leaf
        name: String,
    },

    /// The path is not acceptable for the requested operation.
    #[error("Invalid path: {message}")]
    InvalidPath {
        /// Why the path was rejected
        message: String,
    },

    /// A type descriptor could not be converted into a value.
    #[error("Failed to convert '{name}' to type {type_name}: {source}")]
    ConversionFailure {
        /// The name of the descriptor being converted
        name: String,
        /// The requested type name
        type_name: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The loader met a leaf value where an intermediate node was expected.
    #[error("Structural conflict: {name} is bound to a value but a node is required")]
    StructuralConflict {
        /// The name holding the conflicting leaf
        name: String,
    },

    /// The node has been destroyed or closed.
    #[error("Node has been closed: {name}")]
    Closed {
        /// The absolute name of the closed node
        name: String,
    },

    /// The absolute name of a node was already assigned.
    #[error("Node name is locked to '{current}', cannot rename to '{requested}'")]
    NameLocked {
        /// The name already assigned
        current: String,
        /// The name that was refused
        requested: String,
    },

    /// A record source could not be read.
    #[error("Record source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a record source.
    #[error("Failed to parse records: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The naming configuration is not usable.
    #[error("Invalid naming configuration: {message}")]
    InvalidConfig {
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading a record source.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl NamingError {
    /// Creates a ConversionFailure from a ParseIntError.
    pub fn from_parse_int_error(name: String, err: ParseIntError) -> Self {
        NamingError::ConversionFailure {
            name,
            type_name: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a ConversionFailure from a ParseFloatError.
    pub fn from_parse_float_error(name: String, err: ParseFloatError) -> Self {
        NamingError::ConversionFailure {
            name,
            type_name: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a ConversionFailure from a ParseBoolError.
    pub fn from_parse_bool_error(name: String, err: ParseBoolError) -> Self {
        NamingError::ConversionFailure {
            name,
            type_name: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a ConversionFailure carrying a plain message.
    pub fn conversion(
        name: impl Into<String>,
        type_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message: String = message.into();
        NamingError::ConversionFailure {
            name: name.into(),
            type_name: type_name.into(),
            source: message.into(),
        }
    }

    /// Creates an InvalidPath error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        NamingError::InvalidPath {
            message: message.into(),
        }
    }
}

/// A specialized Result type for naming operations.
pub type Result<T> = std::result::Result<T, NamingError>;
