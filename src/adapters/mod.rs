// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing record parser and converter implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer: one `RecordParser` per source format, a text-backed
//! `RecordSource`, and the built-in `Converter`s.

pub mod converters;
pub mod ini;
pub mod properties;
pub mod text_source;
#[cfg(feature = "xml")]
pub mod xml;
#[cfg(feature = "yaml")]
pub mod yaml;

pub use converters::ConverterRegistry;
pub use ini::IniParser;
pub use properties::PropertiesParser;
pub use text_source::TextSource;
#[cfg(feature = "xml")]
pub use xml::XmlParser;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;

use crate::domain::{NamingError, Result};
use crate::ports::{RecordFormat, RecordParser};

/// Returns the parser for a format hint.
///
/// Formats whose feature is disabled yield [`NamingError::InvalidConfig`].
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::parser_for;
/// use nametree::ports::RecordFormat;
///
/// let parser = parser_for(RecordFormat::Ini, ';').unwrap();
/// assert_eq!(parser.format(), RecordFormat::Ini);
/// ```
pub fn parser_for(format: RecordFormat, comment_char: char) -> Result<Box<dyn RecordParser>> {
    match format {
        RecordFormat::Properties => Ok(Box::new(PropertiesParser::new())),
        RecordFormat::Ini => Ok(Box::new(IniParser::new(comment_char))),
        #[cfg(feature = "xml")]
        RecordFormat::Xml => Ok(Box::new(XmlParser::new())),
        #[cfg(feature = "yaml")]
        RecordFormat::Yaml => Ok(Box::new(YamlParser::new())),
        #[allow(unreachable_patterns)]
        other => Err(NamingError::InvalidConfig {
            message: format!("Support for {} sources is not enabled", other),
            source: None,
        }),
    }
}
