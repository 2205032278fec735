// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration inputs of a naming tree.
//!
//! `NamingConfig` carries the delimiter, the shared and ignore-close flags,
//! and the root identifier used as the shared-root registry key. It can be
//! built programmatically, read from a flat string map, or deserialized.

use crate::domain::errors::{NamingError, Result};
use crate::domain::name::Delimiter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Recognised key for the delimiter.
pub const DELIMITER: &str = "delimiter";
/// Recognised key for the shared flag.
pub const SHARED: &str = "shared";
/// Recognised key for the ignore-close flag.
pub const IGNORE_CLOSE: &str = "ignore_close";
/// Recognised key for the root identifier.
pub const ROOT: &str = "root";
/// Recognised key for the block-source comment character.
pub const COMMENT_CHAR: &str = "comment_char";

/// Settings for opening a naming tree.
///
/// # Examples
///
/// ```
/// use nametree::domain::config::NamingConfig;
///
/// let config = NamingConfig::default()
///     .with_delimiter("/")
///     .shared(true)
///     .with_root("/etc/app");
/// assert_eq!(config.delimiter, "/");
/// assert!(config.shared);
/// assert!(!config.ignore_close);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Segment delimiter: a literal, a small regular expression, or `flat`.
    pub delimiter: String,
    /// Publish the root in the shared-root registry.
    pub shared: bool,
    /// Make `close()` perform no destructive work.
    pub ignore_close: bool,
    /// Identifier of the root in the shared-root registry.
    pub root: String,
    /// Comment leader for block sources.
    pub comment_char: char,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            delimiter: ".".to_string(),
            shared: false,
            ignore_close: false,
            root: String::new(),
            comment_char: '#',
        }
    }
}

impl NamingConfig {
    /// Sets the delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Sets the shared flag.
    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }

    /// Sets the ignore-close flag.
    pub fn ignore_close(mut self, ignore_close: bool) -> Self {
        self.ignore_close = ignore_close;
        self
    }

    /// Sets the root identifier.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the comment character for block sources.
    pub fn with_comment_char(mut self, comment_char: char) -> Self {
        self.comment_char = comment_char;
        self
    }

    /// Reads settings from a flat string map.
    ///
    /// Unknown keys are ignored. Booleans accept `true/yes/1/on` and
    /// `false/no/0/off` in any case.
    ///
    /// # Examples
    ///
    /// ```
    /// use nametree::domain::config::NamingConfig;
    /// use std::collections::HashMap;
    ///
    /// let mut env = HashMap::new();
    /// env.insert("delimiter".to_string(), "/".to_string());
    /// env.insert("shared".to_string(), "yes".to_string());
    ///
    /// let config = NamingConfig::from_map(&env).unwrap();
    /// assert_eq!(config.delimiter, "/");
    /// assert!(config.shared);
    /// ```
    pub fn from_map(env: &HashMap<String, String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(delimiter) = env.get(DELIMITER) {
            config.delimiter = delimiter.clone();
        }
        if let Some(shared) = env.get(SHARED) {
            config.shared = parse_flag(SHARED, shared)?;
        }
        if let Some(ignore_close) = env.get(IGNORE_CLOSE) {
            config.ignore_close = parse_flag(IGNORE_CLOSE, ignore_close)?;
        }
        if let Some(root) = env.get(ROOT) {
            config.root = root.clone();
        }
        if let Some(comment) = env.get(COMMENT_CHAR) {
            let mut chars = comment.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => config.comment_char = c,
                _ => {
                    return Err(NamingError::InvalidConfig {
                        message: format!("{} must be a single character, got '{}'", COMMENT_CHAR, comment),
                        source: None,
                    })
                }
            }
        }
        Ok(config)
    }

    /// Reads settings from YAML text.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| NamingError::InvalidConfig {
            message: format!("Failed to parse YAML configuration: {}", e),
            source: Some(Box::new(e)),
        })
    }

    /// Compiles the delimiter specification.
    pub fn compile_delimiter(&self) -> Result<Delimiter> {
        Delimiter::parse(&self.delimiter)
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => raw
            .trim()
            .parse::<bool>()
            .map_err(|e| NamingError::from_parse_bool_error(key.to_string(), e)),
    }
}
