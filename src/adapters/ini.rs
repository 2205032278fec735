// SPDX-License-Identifier: MIT OR Apache-2.0

//! Block (`.ini` style) record parser.

use crate::domain::{Delimiter, NamingError, Records, Result};
use crate::ports::{RecordFormat, RecordParser};

/// Parser for bracketed block text.
///
/// `[block]` headers open a block whose name prefixes every following key,
/// joined with the delimiter's separator. Keys before the first header are
/// recorded without a prefix, and an empty header `[]` returns to that
/// prefix-free region. Everything from the comment character to the end of
/// a line is dropped.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::IniParser;
/// use nametree::domain::Delimiter;
/// use nametree::ports::RecordParser;
///
/// let parser = IniParser::new('#');
/// let content = "name=app\n[db]\nhost=localhost # primary\nport=5432\n";
/// let records = parser.parse(content, &Delimiter::parse("/").unwrap()).unwrap();
///
/// assert_eq!(records.get("name").unwrap().first(), "app");
/// assert_eq!(records.get("db/host").unwrap().first(), "localhost");
/// ```
#[derive(Debug, Clone)]
pub struct IniParser {
    comment_char: char,
}

impl IniParser {
    /// Creates a parser that strips comments starting at `comment_char`.
    pub fn new(comment_char: char) -> Self {
        Self { comment_char }
    }

    /// Returns the comment character.
    pub fn comment_char(&self) -> char {
        self.comment_char
    }

    fn strip_comment<'a>(&self, line: &'a str) -> &'a str {
        match line.find(self.comment_char) {
            Some(idx) => &line[..idx],
            None => line,
        }
    }
}

impl Default for IniParser {
    fn default() -> Self {
        Self::new('#')
    }
}

impl RecordParser for IniParser {
    fn parse(&self, content: &str, delimiter: &Delimiter) -> Result<Records> {
        let mut records = Records::new();
        let mut block: Option<String> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line = self.strip_comment(raw).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = header.strip_suffix(']').ok_or_else(|| NamingError::ParseError {
                    message: format!("Unterminated block header on line {}: {}", idx + 1, line),
                    source: None,
                })?;
                let name = name.trim();
                block = if name.is_empty() {
                    None
                } else {
                    Some(name.to_string())
                };
                continue;
            }

            let (key, value) = match line.split_once('=') {
                Some((key, value)) => (key.trim(), value.trim()),
                None => (line, ""),
            };
            if key.is_empty() {
                tracing::debug!("Skipping line {} with empty key", idx + 1);
                continue;
            }

            match &block {
                Some(block) => records.insert(delimiter.join(&[block.as_str(), key]), value),
                None => records.insert(key, value),
            }
        }

        tracing::debug!("Parsed {} block keys", records.len());
        Ok(records)
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::Ini
    }
}
