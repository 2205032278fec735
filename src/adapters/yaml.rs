// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML record parser.
//!
//! This module provides a parser that flattens YAML documents into records.

use crate::domain::{Delimiter, NamingError, Records, Result};
use crate::ports::{RecordFormat, RecordParser};

/// YAML parser implementation.
///
/// Nested mappings are flattened by joining keys with the delimiter's
/// separator. Sequences record each element under the same key, so they
/// coalesce into a list exactly like a repeated key in a flat source.
///
/// # Examples
///
/// ```rust
/// use nametree::adapters::YamlParser;
/// use nametree::domain::Delimiter;
/// use nametree::ports::RecordParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  replicas: [a, b]";
/// let records = parser.parse(yaml_content, &Delimiter::default()).unwrap();
/// assert_eq!(records.get("database.host").unwrap().first(), "localhost");
/// assert_eq!(records.get("database.replicas").unwrap().values(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    /// Flattens a YAML value into records with delimiter-joined keys.
    fn flatten_yaml(
        value: &serde_yaml::Value,
        prefix: &str,
        delimiter: &Delimiter,
        records: &mut Records,
    ) {
        match value {
            serde_yaml::Value::Mapping(map) => {
                for (key, val) in map {
                    let key_str = match key {
                        serde_yaml::Value::String(s) => s.clone(),
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        _ => {
                            tracing::debug!("Skipping non-scalar YAML key under '{}'", prefix);
                            continue;
                        }
                    };
                    let new_prefix = if prefix.is_empty() {
                        key_str
                    } else {
                        delimiter.join(&[prefix, key_str.as_str()])
                    };
                    Self::flatten_yaml(val, &new_prefix, delimiter, records);
                }
            }
            serde_yaml::Value::Sequence(seq) => {
                for val in seq {
                    Self::flatten_yaml(val, prefix, delimiter, records);
                }
            }
            serde_yaml::Value::String(s) => {
                records.insert(prefix, s.clone());
            }
            serde_yaml::Value::Number(n) => {
                records.insert(prefix, n.to_string());
            }
            serde_yaml::Value::Bool(b) => {
                records.insert(prefix, b.to_string());
            }
            serde_yaml::Value::Null => {
                if !prefix.is_empty() {
                    records.insert(prefix, String::new());
                }
            }
            serde_yaml::Value::Tagged(tagged) => {
                Self::flatten_yaml(&tagged.value, prefix, delimiter, records);
            }
        }
    }
}

impl RecordParser for YamlParser {
    fn parse(&self, content: &str, delimiter: &Delimiter) -> Result<Records> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(content).map_err(|e| NamingError::ParseError {
                message: format!("Failed to parse YAML: {}", e),
                source: Some(Box::new(e)),
            })?;

        let mut records = Records::new();
        Self::flatten_yaml(&value, "", delimiter, &mut records);
        tracing::debug!("Parsed {} YAML keys", records.len());
        Ok(records)
    }

    fn format(&self) -> RecordFormat {
        RecordFormat::Yaml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Records {
        YamlParser::new().parse(yaml, &Delimiter::default()).unwrap()
    }

    #[test]
    fn test_yaml_parser_simple() {
        let records = parse("key: value");
        assert_eq!(records.get("key").unwrap().first(), "value");
    }

    #[test]
    fn test_yaml_parser_deeply_nested() {
        let yaml = r#"
app:
  database:
    connection:
      host: localhost
      port: 5432
"#;
        let records = parse(yaml);
        assert_eq!(
            records.get("app.database.connection.host").unwrap().first(),
            "localhost"
        );
        assert_eq!(
            records.get("app.database.connection.port").unwrap().first(),
            "5432"
        );
    }

    #[test]
    fn test_yaml_parser_sequence_coalesces() {
        let yaml = r#"
servers:
  - server1
  - server2
  - server3
"#;
        let records = parse(yaml);
        assert_eq!(
            records.get("servers").unwrap().values(),
            vec!["server1", "server2", "server3"]
        );
    }

    #[test]
    fn test_yaml_parser_sequence_of_mappings() {
        let yaml = r#"
hosts:
  - name: a
    port: 1
  - name: b
    port: 2
"#;
        let records = parse(yaml);
        assert_eq!(records.get("hosts.name").unwrap().values(), vec!["a", "b"]);
        assert_eq!(records.get("hosts.port").unwrap().values(), vec!["1", "2"]);
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let yaml = r#"
string_value: hello
number_value: 42
bool_value: true
null_value: null
"#;
        let records = parse(yaml);
        assert_eq!(records.get("string_value").unwrap().first(), "hello");
        assert_eq!(records.get("number_value").unwrap().first(), "42");
        assert_eq!(records.get("bool_value").unwrap().first(), "true");
        assert_eq!(records.get("null_value").unwrap().first(), "");
    }

    #[test]
    fn test_yaml_parser_custom_delimiter() {
        let records = YamlParser::new()
            .parse("a:\n  b: c", &Delimiter::parse("/").unwrap())
            .unwrap();
        assert!(records.contains_key("a/b"));
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let result = YamlParser::new().parse("invalid: yaml: content:", &Delimiter::default());
        assert!(matches!(result, Err(NamingError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_format() {
        assert_eq!(YamlParser::default().format(), RecordFormat::Yaml);
    }
}
