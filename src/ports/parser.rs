// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record parser trait definition.
//!
//! This module defines the `RecordParser` trait, which provides an interface for
//! turning configuration text (flat, block or markup) into the flat key mapping
//! the loader consumes.

use crate::domain::{Delimiter, Records, Result};
use std::fmt;

/// The source formats understood by the bundled parsers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    /// Flat `key=value` lines.
    Properties,
    /// Bracketed `[block]` sections of `key=value` lines.
    Ini,
    /// Elements and attributes.
    Xml,
    /// Nested mappings and sequences.
    Yaml,
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordFormat::Properties => "properties",
            RecordFormat::Ini => "ini",
            RecordFormat::Xml => "xml",
            RecordFormat::Yaml => "yaml",
        };
        write!(f, "{}", name)
    }
}

/// A trait for parsing record sources.
///
/// Implementations flatten their source into [`Records`], joining nested
/// names with the delimiter's separator. A key seen twice must be inserted
/// twice so that [`Records`] coalesces it into a list.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::{Delimiter, Records, Result};
/// use nametree::ports::{RecordFormat, RecordParser};
///
/// struct CsvPairs;
///
/// impl RecordParser for CsvPairs {
///     fn parse(&self, content: &str, _delimiter: &Delimiter) -> Result<Records> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once(','))
///             .collect())
///     }
///
///     fn format(&self) -> RecordFormat {
///         RecordFormat::Properties
///     }
/// }
///
/// let records = CsvPairs.parse("a,1\nb,2", &Delimiter::default()).unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub trait RecordParser: Send + Sync {
    /// Parses source text into a flat key mapping.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw text of the source
    /// * `delimiter` - The delimiter used to join nested names
    fn parse(&self, content: &str, delimiter: &Delimiter) -> Result<Records>;

    /// Returns the format this parser reads.
    fn format(&self) -> RecordFormat;
}
