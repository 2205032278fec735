// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flat `key=value` record parser.

use crate::domain::{Delimiter, Records, Result};
use crate::ports::{RecordFormat, RecordParser};

/// Parser for flat delimited text.
///
/// Each logical line is `key=value` or `key: value`. Lines starting with `#`
/// or `!` are comments, a trailing backslash continues the value on the next
/// line, and a key without a separator records an empty value. Keys are kept
/// verbatim, so they must already use the tree's delimiter.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::PropertiesParser;
/// use nametree::domain::Delimiter;
/// use nametree::ports::RecordParser;
///
/// let parser = PropertiesParser::new();
/// let records = parser
///     .parse("# pool\npool.size=4\npool.host: db\npool.host=db2", &Delimiter::default())
///     .unwrap();
/// assert_eq!(records.get("pool.size").unwrap().first(), "4");
/// assert_eq!(records.get("pool.host").unwrap().values(), vec!["db", "db2"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }

    /// Joins continued physical lines into logical lines.
    fn logical_lines(content: &str) -> Vec<String> {
        let mut lines = Vec::new();
        let mut pending: Option<String> = None;

        for raw in content.lines() {
            let piece = match pending {
                Some(_) => raw.trim_start(),
                None => raw,
            };
            let trailing = piece.chars().rev().take_while(|c| *c == '\\').count();
            let continued = trailing % 2 == 1;
            let piece = if continued {
                &piece[..piece.len() - 1]
            } else {
                piece
            };

            let mut line = pending.take().unwrap_or_default();
            line.push_str(piece);
            if continued {
                pending = Some(line);
            } else {
                lines.push(line);
            }
        }
        if let Some(line) = pending {
            lines.push(line);
        }
        lines
    }
}

impl RecordParser for PropertiesParser {
    fn parse(&self, content: &str, _delimiter: &Delimiter) -> Result<Records> {
        let mut records = Records::new();

        for line in Self::logical_lines(content) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let (key, value) = match line.find(&['=', ':'][..]) {
                Some(idx) => (line[..idx].trim(), line[idx + 1..].trim()),
                None => (line, ""),
            };
            if key.is_empty() {
                tracing::debug!("Skipping properties line with empty key: {}", line);
                continue;
            }
            records.insert(key, value);
        }

        tracing::debug!("Parsed {} properties keys", records.len());
        Ok(records)
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::Properties
    }
}
