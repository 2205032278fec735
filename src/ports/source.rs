// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record source trait definition.
//!
//! This module defines the `RecordSource` trait, the port through which
//! already-opened configuration input reaches the loader. Locating, traversing
//! and opening files is the caller's concern; a source only has to produce
//! its records.

use crate::domain::{Delimiter, Records, Result};

/// A trait for record sources.
///
/// A source yields one record set and optionally names the namespace it
/// should be loaded under. When a namespace is given the loader creates it
/// below the target node, and a bare `type` record replaces that namespace
/// with a converted value.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so sources can be handed to a shared
/// tree from any thread.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::{Delimiter, Records, Result};
/// use nametree::ports::RecordSource;
///
/// struct Fixed;
///
/// impl RecordSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn namespace(&self) -> Option<&str> {
///         Some("app")
///     }
///
///     fn records(&self, _delimiter: &Delimiter) -> Result<Records> {
///         Ok(vec![("name", "demo")].into_iter().collect())
///     }
/// }
///
/// let source = Fixed;
/// assert_eq!(source.records(&Delimiter::default()).unwrap().len(), 1);
/// ```
pub trait RecordSource: Send + Sync {
    /// Returns the name of this source, used for logging and error messages.
    fn name(&self) -> &str;

    /// Returns the namespace the records belong under, relative to the
    /// target node. `None` loads them into the target itself.
    fn namespace(&self) -> Option<&str>;

    /// Produces the records of this source.
    ///
    /// # Arguments
    ///
    /// * `delimiter` - The delimiter used to join nested names
    fn records(&self, delimiter: &Delimiter) -> Result<Records>;
}
