// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loads flat records into a namespace tree.
//!
//! The loader classifies a record set, creates the intermediate nodes every
//! key needs, converts type descriptors and binds the results. A pass is best
//! effort: a failing key does not stop the keys after it.

use crate::domain::{
    classify, Name, NamingError, Node, RecordValue, Records, Result, TypeDescriptor, Value,
};
use crate::ports::RecordSource;
use crate::service::conversion::ConversionService;
use std::sync::Arc;

/// Drives record sets into a tree.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::{Node, NodeConfig, Records, Value};
/// use nametree::service::Loader;
///
/// # fn main() -> nametree::domain::Result<()> {
/// let root = Node::root(NodeConfig::default());
/// let records: Records = vec![
///     ("db.host", "localhost"),
///     ("db.port.type", "integer"),
///     ("db.port", "5432"),
/// ]
/// .into_iter()
/// .collect();
///
/// Loader::default().load(&records, &root)?;
/// assert_eq!(root.lookup_value("db.host")?, Value::from("localhost"));
/// assert_eq!(root.lookup_value("db.port")?, Value::Integer(5432));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct Loader {
    conversion: Arc<ConversionService>,
}

impl Loader {
    /// Creates a loader using the given conversion service.
    pub fn new(conversion: Arc<ConversionService>) -> Self {
        Self { conversion }
    }

    /// Returns the conversion service.
    pub fn conversion(&self) -> &ConversionService {
        &self.conversion
    }

    /// Loads a record set into `target`.
    ///
    /// A record set with a bare `type` key is converted as a whole and
    /// replaces `target` in its parent. Otherwise plain keys are bound as
    /// leaves and typed prefixes as converted values, creating missing
    /// intermediate nodes. Every key is attempted; the first failure is
    /// returned once the pass is complete.
    ///
    /// Leaves are bound before typed values. A typed prefix that also has
    /// deeper plain keys (`a.type` next to `a.b.c`) therefore finds a node
    /// already bound at its name and fails with `AlreadyBound`, while the
    /// deeper leaves stay bound.
    pub fn load(&self, records: &Records, target: &Node) -> Result<()> {
        let classified = classify(records, target.delimiter());

        if let Some(descriptor) = classified.namespace {
            return self.replace_namespace(&descriptor, target);
        }

        let mut failures = Vec::new();
        for (name, value) in &classified.leaves {
            if let Err(e) = Self::bind_leaf(target, name, value) {
                tracing::warn!("Failed to bind '{}': {}", name, e);
                failures.push(e);
            }
        }
        for descriptor in &classified.descriptors {
            if let Err(e) = self.bind_descriptor(target, descriptor) {
                tracing::warn!("Failed to bind typed '{}': {}", descriptor.label(), e);
                failures.push(e);
            }
        }

        tracing::debug!(
            "Loaded {} leaves and {} typed values into '{}' with {} failures",
            classified.leaves.len(),
            classified.descriptors.len(),
            target.name_in_namespace(),
            failures.len()
        );
        match failures.into_iter().next() {
            Some(first) => Err(first),
            None => Ok(()),
        }
    }

    /// Loads a source's records, under its namespace if it names one.
    pub fn load_source(&self, source: &dyn RecordSource, target: &Node) -> Result<()> {
        let records = source.records(target.delimiter())?;
        let node = match source.namespace() {
            Some(namespace) if !namespace.is_empty() => target.ensure_subnode(namespace)?,
            _ => target.clone(),
        };
        tracing::debug!(
            "Loading {} records from '{}' into '{}'",
            records.len(),
            source.name(),
            node.name_in_namespace()
        );
        self.load(&records, &node)
    }

    fn bind_leaf(target: &Node, name: &Name, value: &RecordValue) -> Result<()> {
        let last = Self::last_segment(name)?;
        let parent = target.ensure_subnode(name.parent())?;
        let value = match value {
            RecordValue::Single(raw) => Value::from(raw.as_str()),
            RecordValue::Multi(raws) => {
                Value::List(raws.iter().map(|raw| Value::from(raw.as_str())).collect())
            }
        };
        parent.bind(last, value)
    }

    fn bind_descriptor(&self, target: &Node, descriptor: &TypeDescriptor) -> Result<()> {
        let last = Self::last_segment(descriptor.path())?;
        let value = self.conversion.convert(descriptor)?;
        let parent = target.ensure_subnode(descriptor.path().parent())?;
        parent.bind(last, value)
    }

    fn replace_namespace(&self, descriptor: &TypeDescriptor, target: &Node) -> Result<()> {
        let parent = target.parent().ok_or_else(|| {
            NamingError::invalid_path(format!(
                "cannot replace the root with a '{}' value",
                descriptor.type_name()
            ))
        })?;
        let value = self.conversion.convert(descriptor)?;
        tracing::debug!(
            "Replacing namespace '{}' with a '{}' value",
            target.name_in_namespace(),
            descriptor.type_name()
        );
        parent.rebind(Name::from(vec![target.local_name()]), value)
    }

    /// The final segment as a one-segment name, so it is never re-split.
    fn last_segment(name: &Name) -> Result<Name> {
        name.last()
            .map(|last| Name::from(vec![last]))
            .ok_or_else(|| NamingError::invalid_path("cannot bind an empty key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bound, Delimiter, NodeConfig};

    fn records(pairs: &[(&str, &str)]) -> Records {
        pairs.iter().copied().collect()
    }

    fn root() -> Node {
        Node::root(NodeConfig::default())
    }

    #[test]
    fn test_load_creates_intermediate_nodes() {
        let root = root();
        Loader::default()
            .load(&records(&[("a.b.c", "1"), ("a.d", "2")]), &root)
            .unwrap();
        assert!(root.lookup("a.b").unwrap().is_node());
        assert_eq!(root.lookup_value("a.b.c").unwrap(), Value::from("1"));
        assert_eq!(root.list("a").unwrap(), vec!["b", "d"]);
    }

    #[test]
    fn test_load_coalesced_values_become_lists() {
        let root = root();
        Loader::default()
            .load(&records(&[("k", "a"), ("k", "b")]), &root)
            .unwrap();
        assert_eq!(
            root.lookup_value("k").unwrap(),
            Value::List(vec![Value::from("a"), Value::from("b")])
        );
    }

    #[test]
    fn test_load_converts_typed_prefix() {
        let root = root();
        Loader::default()
            .load(&records(&[("foo.type", "boolean"), ("foo", "true")]), &root)
            .unwrap();
        assert_eq!(root.lookup_value("foo").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_load_non_matching_delimiter_skips_conversion() {
        let root = Node::root(NodeConfig::new(Delimiter::parse("/").unwrap(), false));
        Loader::default()
            .load(&records(&[("foo.type", "boolean"), ("foo", "true")]), &root)
            .unwrap();
        assert_eq!(root.lookup_value("foo").unwrap(), Value::from("true"));
        assert_eq!(root.lookup_value("foo.type").unwrap(), Value::from("boolean"));
    }

    #[test]
    fn test_load_namespace_descriptor_replaces_node() {
        let root = root();
        let namespace = root.create_subnode("db").unwrap();
        Loader::default()
            .load(
                &records(&[("type", "datasource"), ("url", "postgres://h/db")]),
                &namespace,
            )
            .unwrap();
        let value = root.lookup_value("db").unwrap();
        assert_eq!(value.as_reference().unwrap().get("url"), Some("postgres://h/db"));
    }

    #[test]
    fn test_load_namespace_descriptor_on_root_fails() {
        let result = Loader::default().load(&records(&[("type", "bean")]), &root());
        assert!(matches!(result, Err(NamingError::InvalidPath { .. })));
    }

    #[test]
    fn test_load_is_best_effort() {
        let root = root();
        root.bind("taken", "x").unwrap();
        let result = Loader::default().load(
            &records(&[("taken.child", "1"), ("n.type", "integer"), ("n", "nan"), ("ok", "2")]),
            &root,
        );
        assert!(matches!(result, Err(NamingError::StructuralConflict { .. })));
        assert_eq!(root.lookup_value("ok").unwrap(), Value::from("2"));
        assert!(matches!(root.lookup("n"), Err(NamingError::NotFound { .. })));
    }

    #[test]
    fn test_typed_prefix_with_deeper_keys_conflicts() {
        let root = root();
        let result = Loader::default().load(
            &records(&[("a.type", "bean"), ("a.x", "1"), ("a.b.c", "2")]),
            &root,
        );
        assert!(matches!(result, Err(NamingError::AlreadyBound { .. })));
        assert!(root.lookup("a").unwrap().is_node());
        assert_eq!(root.lookup_value("a.b.c").unwrap(), Value::from("2"));
        assert!(matches!(root.lookup("a.x"), Err(NamingError::NotFound { .. })));
    }

    #[test]
    fn test_load_into_existing_leaf_fails() {
        let root = root();
        root.bind("k", "old").unwrap();
        let result = Loader::default().load(&records(&[("k", "new")]), &root);
        assert!(matches!(result, Err(NamingError::AlreadyBound { .. })));
        assert_eq!(root.lookup("k").unwrap(), Bound::from("old"));
    }

    #[test]
    fn test_load_flat_delimiter() {
        let root = Node::root(NodeConfig::new(Delimiter::Flat, false));
        Loader::default()
            .load(&records(&[("a.b", "1")]), &root)
            .unwrap();
        assert_eq!(root.list("").unwrap(), vec!["a.b"]);
    }
}
