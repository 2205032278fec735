// SPDX-License-Identifier: MIT OR Apache-2.0

//! Segmented names and the delimiter that produces them.
//!
//! A flat key such as `database.pool.size` is split by a [`Delimiter`] into an
//! ordered [`Name`] of segments. The same delimiter joins segments back into a
//! flat key when the loader needs to materialize an owning path.

use crate::domain::errors::{NamingError, Result};
use regex::Regex;
use std::fmt;

/// Characters that make a delimiter string a regular expression.
const REGEX_META: &[char] = &[
    '\\', '|', '[', ']', '(', ')', '{', '}', '*', '+', '?', '^', '$',
];

/// The keyword that selects flat mode.
const FLAT: &str = "flat";

/// The separator flat mode joins block and element prefixes with.
const FLAT_JOIN: &str = "/";

/// Splits flat keys into segments.
///
/// # Examples
///
/// ```
/// use nametree::domain::name::Delimiter;
///
/// let dot = Delimiter::parse(".").unwrap();
/// assert_eq!(dot.split("a.b.c"), vec!["a", "b", "c"]);
///
/// let either = Delimiter::parse(r"\.|/").unwrap();
/// assert_eq!(either.split("a.b/c"), vec!["a", "b", "c"]);
/// assert_eq!(either.separator(), ".");
/// ```
#[derive(Clone, Debug)]
pub enum Delimiter {
    /// A literal, case-sensitive separator.
    Literal(String),
    /// A regular expression accepting several separators at once.
    Pattern {
        /// The compiled expression
        regex: Regex,
        /// The separator used when joining segments
        join: String,
    },
    /// Every key is a single atomic segment.
    Flat,
}

impl Delimiter {
    /// Parses a delimiter specification.
    ///
    /// `"flat"` selects flat mode, a string with no regex metacharacters is a
    /// literal separator, and anything else is compiled as a regular
    /// expression whose first alternative is used for joining.
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(NamingError::InvalidConfig {
                message: "delimiter must not be empty".to_string(),
                source: None,
            });
        }
        if text == FLAT {
            return Ok(Delimiter::Flat);
        }
        if !text.contains(REGEX_META) {
            return Ok(Delimiter::Literal(text.to_string()));
        }

        let regex = Regex::new(text).map_err(|e| NamingError::InvalidConfig {
            message: format!("invalid delimiter pattern '{}'", text),
            source: Some(Box::new(e)),
        })?;
        let join = primary_separator(text);
        if join.is_empty() || !splits_exactly(&regex, &join) {
            return Err(NamingError::InvalidConfig {
                message: format!("delimiter pattern '{}' has no literal separator", text),
                source: None,
            });
        }

        Ok(Delimiter::Pattern { regex, join })
    }

    /// Splits a flat key into segments. An empty key yields no segments.
    pub fn split<'a>(&self, key: &'a str) -> Vec<&'a str> {
        if key.is_empty() {
            return Vec::new();
        }
        match self {
            Delimiter::Literal(sep) => key.split(sep.as_str()).collect(),
            Delimiter::Pattern { regex, .. } => regex.split(key).collect(),
            Delimiter::Flat => vec![key],
        }
    }

    /// Returns the separator used to join segments.
    ///
    /// Flat mode joins with `/`, which it never splits on again.
    pub fn separator(&self) -> &str {
        match self {
            Delimiter::Literal(sep) => sep,
            Delimiter::Pattern { join, .. } => join,
            Delimiter::Flat => FLAT_JOIN,
        }
    }

    /// Joins segments back into a flat key.
    pub fn join<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let sep = self.separator();
        let mut out = String::new();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            out.push_str(segment.as_ref());
        }
        out
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Literal(".".to_string())
    }
}

/// Returns one literal separator matched by the first alternative of a
/// delimiter pattern.
///
/// Escapes are unescaped and a character class contributes its first member.
/// Quantifiers keep their minimum repetition. A negated class yields nothing.
fn primary_separator(pattern: &str) -> String {
    let mut out = String::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '|' => break,
            '[' => {
                let first = match chars.next() {
                    Some('^') | Some(']') | None => return String::new(),
                    Some('\\') => chars.next(),
                    other => other,
                };
                out.extend(first);
                let mut escaped = false;
                for c in chars.by_ref() {
                    match c {
                        _ if escaped => escaped = false,
                        '\\' => escaped = true,
                        ']' => break,
                        _ => {}
                    }
                }
            }
            '{' => {
                let bounds: String = chars.by_ref().take_while(|c| *c != '}').collect();
                let min = bounds
                    .split(',')
                    .next()
                    .and_then(|n| n.trim().parse::<usize>().ok())
                    .unwrap_or(1);
                match out.pop() {
                    Some(last) => out.extend(std::iter::repeat(last).take(min)),
                    None => return String::new(),
                }
            }
            '*' | '?' => {
                out.pop();
            }
            '(' | ')' | ']' | '^' | '$' | '+' => {}
            _ => out.push(c),
        }
    }
    out
}

/// True when `regex` consumes all of `join` as one separator.
fn splits_exactly(regex: &Regex, join: &str) -> bool {
    if regex.is_match("") {
        return false;
    }
    let parts: Vec<&str> = regex.split(join).collect();
    parts.len() == 2 && parts.iter().all(|part| part.is_empty())
}

/// An ordered sequence of name segments.
///
/// An empty `Name` denotes the node an operation is invoked on.
///
/// # Examples
///
/// ```
/// use nametree::domain::name::{Delimiter, Name};
///
/// let name = Name::parse("jdbc/pool/size", &Delimiter::parse("/").unwrap());
/// assert_eq!(name.len(), 3);
/// assert_eq!(name.first(), Some("jdbc"));
/// assert_eq!(name.last(), Some("size"));
/// assert!(Name::parse("", &Delimiter::default()).is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Name(Vec<String>);

impl Name {
    /// Creates a name from already separated segments.
    pub fn new(segments: Vec<String>) -> Self {
        Name(segments)
    }

    /// Splits a flat key with the given delimiter.
    pub fn parse(key: &str, delimiter: &Delimiter) -> Self {
        Name(
            delimiter
                .split(key)
                .into_iter()
                .map(str::to_string)
                .collect(),
        )
    }

    /// Returns true when the name has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the first segment.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns the last segment.
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns the name without its first segment.
    pub fn rest(&self) -> Name {
        Name(self.0.iter().skip(1).cloned().collect())
    }

    /// Returns the first `n` segments.
    pub fn prefix(&self, n: usize) -> Name {
        Name(self.0.iter().take(n).cloned().collect())
    }

    /// Returns the name without its last segment.
    pub fn parent(&self) -> Name {
        self.prefix(self.0.len().saturating_sub(1))
    }

    /// Returns a new name with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Name {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Name(segments)
    }

    /// Joins the segments with the given delimiter.
    pub fn join(&self, delimiter: &Delimiter) -> String {
        delimiter.join(&self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl From<Vec<String>> for Name {
    fn from(segments: Vec<String>) -> Self {
        Name(segments)
    }
}

impl From<Vec<&str>> for Name {
    fn from(segments: Vec<&str>) -> Self {
        Name(segments.into_iter().map(str::to_string).collect())
    }
}

/// Conversion of path arguments into a [`Name`].
///
/// Tree operations accept either a flat string, split with the node's own
/// delimiter, or an already segmented [`Name`].
pub trait ToName {
    /// Produces the segmented name.
    fn to_name(&self, delimiter: &Delimiter) -> Name;
}

impl ToName for str {
    fn to_name(&self, delimiter: &Delimiter) -> Name {
        Name::parse(self, delimiter)
    }
}

impl ToName for &str {
    fn to_name(&self, delimiter: &Delimiter) -> Name {
        Name::parse(self, delimiter)
    }
}

impl ToName for String {
    fn to_name(&self, delimiter: &Delimiter) -> Name {
        Name::parse(self, delimiter)
    }
}

impl ToName for Name {
    fn to_name(&self, _delimiter: &Delimiter) -> Name {
        self.clone()
    }
}

impl ToName for &Name {
    fn to_name(&self, _delimiter: &Delimiter) -> Name {
        (*self).clone()
    }
}
