// SPDX-License-Identifier: MIT OR Apache-2.0

//! Element and attribute (XML) record parser.

use crate::domain::{Delimiter, NamingError, Records, Result};
use crate::ports::{RecordFormat, RecordParser};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parser for element/attribute markup.
///
/// The document element is a wrapper and contributes no segment. Every
/// nested element adds its name to the key, each attribute becomes its own
/// key suffixed by the attribute name, and non-blank text is recorded under
/// the element's key. Repeated elements coalesce.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::XmlParser;
/// use nametree::domain::Delimiter;
/// use nametree::ports::RecordParser;
///
/// let xml = r#"<config>
///   <db url="postgres://localhost/app">
///     <host>alpha</host>
///     <host>beta</host>
///   </db>
/// </config>"#;
///
/// let records = XmlParser::new().parse(xml, &Delimiter::default()).unwrap();
/// assert_eq!(records.get("db.url").unwrap().first(), "postgres://localhost/app");
/// assert_eq!(records.get("db.host").unwrap().values(), vec!["alpha", "beta"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct XmlParser;

impl XmlParser {
    /// Creates a new XML parser.
    pub fn new() -> Self {
        XmlParser
    }

    fn parse_error<E>(position: usize, err: E) -> NamingError
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        NamingError::ParseError {
            message: format!("Failed to parse XML at position {}: {}", position, err),
            source: Some(Box::new(err)),
        }
    }

    fn element_name(element: &BytesStart<'_>, position: usize) -> Result<String> {
        std::str::from_utf8(element.name().as_ref())
            .map(str::to_string)
            .map_err(|e| Self::parse_error(position, e))
    }

    /// Key for the element path, skipping the document element.
    fn key(stack: &[String], delimiter: &Delimiter) -> String {
        delimiter.join(stack.get(1..).unwrap_or_default())
    }

    fn record_attributes(
        element: &BytesStart<'_>,
        stack: &[String],
        delimiter: &Delimiter,
        position: usize,
        records: &mut Records,
    ) -> Result<()> {
        let base = Self::key(stack, delimiter);
        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| Self::parse_error(position, e))?;
            let name = std::str::from_utf8(attribute.key.as_ref())
                .map_err(|e| Self::parse_error(position, e))?;
            let value = attribute
                .unescape_value()
                .map_err(|e| Self::parse_error(position, e))?;
            let key = if base.is_empty() {
                name.to_string()
            } else {
                delimiter.join(&[base.as_str(), name])
            };
            records.insert(key, value.into_owned());
        }
        Ok(())
    }

    fn record_text(text: &str, stack: &[String], delimiter: &Delimiter, records: &mut Records) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let key = Self::key(stack, delimiter);
        if key.is_empty() {
            tracing::debug!("Ignoring text directly inside the document element");
            return;
        }
        records.insert(key, text);
    }
}

impl RecordParser for XmlParser {
    fn parse(&self, content: &str, delimiter: &Delimiter) -> Result<Records> {
        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        let mut records = Records::new();
        let mut stack: Vec<String> = Vec::new();

        loop {
            let position = reader.buffer_position();
            match reader.read_event() {
                Ok(Event::Start(element)) => {
                    stack.push(Self::element_name(&element, position)?);
                    Self::record_attributes(&element, &stack, delimiter, position, &mut records)?;
                }
                Ok(Event::Empty(element)) => {
                    stack.push(Self::element_name(&element, position)?);
                    Self::record_attributes(&element, &stack, delimiter, position, &mut records)?;
                    stack.pop();
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(text)) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Self::parse_error(position, e))?;
                    Self::record_text(&text, &stack, delimiter, &mut records);
                }
                Ok(Event::CData(data)) => {
                    let data = data.into_inner();
                    Self::record_text(&String::from_utf8_lossy(&data), &stack, delimiter, &mut records);
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(Self::parse_error(reader.buffer_position(), e)),
            }
        }

        if let Some(open) = stack.last() {
            return Err(NamingError::ParseError {
                message: format!("Unclosed element <{}> at end of document", open),
                source: None,
            });
        }

        tracing::debug!("Parsed {} markup keys", records.len());
        Ok(records)
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::Xml
    }
}
