// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-backed record source adapter.
//!
//! This module provides a source that holds already-read configuration text
//! together with a format hint. The caller decides which files to read and
//! in which format; this adapter only reads and parses them.

use crate::adapters::parser_for;
use crate::domain::{Delimiter, NamingError, Records, Result};
use crate::ports::{RecordFormat, RecordSource};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Maximum allowed size for a record source (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_SOURCE_SIZE: u64 = 10 * 1024 * 1024;

/// A record source backed by in-memory text.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::TextSource;
/// use nametree::domain::Delimiter;
/// use nametree::ports::{RecordFormat, RecordSource};
///
/// let source = TextSource::new(RecordFormat::Ini, "[db]\nhost=localhost")
///     .with_namespace("app");
/// assert_eq!(source.namespace(), Some("app"));
///
/// let records = source.records(&Delimiter::default()).unwrap();
/// assert_eq!(records.get("db.host").unwrap().first(), "localhost");
/// ```
#[derive(Debug, Clone)]
pub struct TextSource {
    name: String,
    namespace: Option<String>,
    format: RecordFormat,
    content: String,
    comment_char: char,
}

impl TextSource {
    /// Creates a source from text in the given format.
    pub fn new(format: RecordFormat, content: impl Into<String>) -> Self {
        Self {
            name: format.to_string(),
            namespace: None,
            format,
            content: content.into(),
            comment_char: '#',
        }
    }

    /// Reads a source from an already-opened stream.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nametree::adapters::TextSource;
    /// use nametree::ports::RecordFormat;
    ///
    /// let source = TextSource::from_reader(RecordFormat::Properties, "a=1".as_bytes()).unwrap();
    /// assert_eq!(source.content(), "a=1");
    /// ```
    pub fn from_reader<R: Read>(format: RecordFormat, reader: R) -> Result<Self> {
        let mut content = String::new();
        reader
            .take(MAX_SOURCE_SIZE + 1)
            .read_to_string(&mut content)?;
        if content.len() as u64 > MAX_SOURCE_SIZE {
            return Err(NamingError::SourceError {
                source_name: format.to_string(),
                message: format!("Record source too large (max {} bytes)", MAX_SOURCE_SIZE),
                source: None,
            });
        }
        Ok(Self::new(format, content))
    }

    /// Reads a source from a file, parsed with the given format.
    ///
    /// The file name becomes the source name.
    pub fn from_file<P: AsRef<Path>>(path: P, format: RecordFormat) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<unknown>")
            .to_string();

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(path).map_err(|e| NamingError::SourceError {
            source_name: file_name.clone(),
            message: "Failed to read file metadata".to_string(),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_SOURCE_SIZE {
            return Err(NamingError::SourceError {
                source_name: file_name,
                message: format!(
                    "Record source too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_SOURCE_SIZE
                ),
                source: None,
            });
        }

        let content = fs::read_to_string(path).map_err(|e| NamingError::SourceError {
            source_name: file_name.clone(),
            message: "Failed to read record source".to_string(),
            source: Some(Box::new(e)),
        })?;

        Ok(Self::new(format, content).with_name(file_name))
    }

    /// Sets the source name used in logs and errors.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Loads the records under `namespace` instead of the target itself.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the comment character for block sources.
    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    /// Returns the format hint.
    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Returns the raw text.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl RecordSource for TextSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn records(&self, delimiter: &Delimiter) -> Result<Records> {
        let parser = parser_for(self.format, self.comment_char)?;
        parser.parse(&self.content, delimiter).map_err(|e| match e {
            NamingError::ParseError { message, source } => NamingError::ParseError {
                message: format!("{} ({})", message, self.name),
                source,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_text_source_properties() {
        let source = TextSource::new(RecordFormat::Properties, "a.b=1");
        let records = source.records(&Delimiter::default()).unwrap();
        assert_eq!(records.get("a.b").unwrap().first(), "1");
        assert_eq!(source.name(), "properties");
        assert_eq!(source.namespace(), None);
    }

    #[test]
    fn test_text_source_comment_char() {
        let source = TextSource::new(RecordFormat::Ini, "a=1 ; c").with_comment_char(';');
        let records = source.records(&Delimiter::default()).unwrap();
        assert_eq!(records.get("a").unwrap().first(), "1");
    }

    #[test]
    fn test_text_source_parse_error_names_source() {
        let source = TextSource::new(RecordFormat::Ini, "[broken").with_name("broken.ini");
        let err = source.records(&Delimiter::default()).unwrap_err();
        assert!(err.to_string().contains("broken.ini"));
    }

    #[test]
    fn test_text_source_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[db]\nhost=localhost").unwrap();

        let source = TextSource::from_file(temp_file.path(), RecordFormat::Ini).unwrap();
        let records = source.records(&Delimiter::default()).unwrap();
        assert_eq!(records.get("db.host").unwrap().first(), "localhost");
        assert_eq!(
            source.name(),
            temp_file.path().file_name().unwrap().to_str().unwrap()
        );
    }

    #[test]
    fn test_text_source_nonexistent_file() {
        let result = TextSource::from_file("/nonexistent/path/to/db.ini", RecordFormat::Ini);
        assert!(matches!(result, Err(NamingError::SourceError { .. })));
    }

    #[test]
    fn test_text_source_from_reader() {
        let source = TextSource::from_reader(RecordFormat::Properties, "k=v\n".as_bytes())
            .unwrap()
            .with_namespace("ns");
        assert_eq!(source.namespace(), Some("ns"));
        assert_eq!(source.format(), RecordFormat::Properties);
    }
}
