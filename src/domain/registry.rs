// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of shared roots.
//!
//! Handles opened in shared mode with the same root identifier must observe
//! the same tree. The registry maps root identifiers to live root nodes and
//! guarantees that only one caller ever builds the tree for an identifier.

use crate::domain::errors::Result;
use crate::domain::node::Node;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

static GLOBAL: Lazy<Arc<SharedRootRegistry>> = Lazy::new(|| Arc::new(SharedRootRegistry::new()));

/// A concurrent map from root identifier to root node.
///
/// # Examples
///
/// ```
/// use nametree::domain::node::{Node, NodeConfig};
/// use nametree::domain::registry::SharedRootRegistry;
///
/// # fn main() -> nametree::domain::Result<()> {
/// let registry = SharedRootRegistry::new();
/// let first = registry.get_or_create("/etc/app", || Ok(Node::root(NodeConfig::default())))?;
/// let second = registry.get_or_create("/etc/app", || unreachable!())?;
/// assert!(Node::ptr_eq(&first, &second));
///
/// registry.remove("/etc/app");
/// assert!(!registry.contains("/etc/app"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SharedRootRegistry {
    roots: Mutex<HashMap<String, Node>>,
}

impl SharedRootRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> Arc<SharedRootRegistry> {
        GLOBAL.clone()
    }

    /// Returns the root published under `root_id`, building and publishing it
    /// with `factory` if there is none.
    ///
    /// The registry stays locked while `factory` runs, so concurrent callers
    /// never build two trees for one identifier. A failing factory publishes
    /// nothing.
    pub fn get_or_create<F>(&self, root_id: &str, factory: F) -> Result<Node>
    where
        F: FnOnce() -> Result<Node>,
    {
        let mut roots = self.roots.lock();
        if let Some(root) = roots.get(root_id) {
            tracing::debug!("Reusing shared root '{}'", root_id);
            return Ok(root.clone());
        }
        let root = factory()?;
        roots.insert(root_id.to_string(), root.clone());
        tracing::debug!("Published shared root '{}'", root_id);
        Ok(root)
    }

    /// Returns the root published under `root_id`.
    pub fn get(&self, root_id: &str) -> Option<Node> {
        self.roots.lock().get(root_id).cloned()
    }

    /// Returns true if a root is published under `root_id`.
    pub fn contains(&self, root_id: &str) -> bool {
        self.roots.lock().contains_key(root_id)
    }

    /// Removes the root published under `root_id`, returning it.
    pub fn remove(&self, root_id: &str) -> Option<Node> {
        let removed = self.roots.lock().remove(root_id);
        if removed.is_some() {
            tracing::debug!("Removed shared root '{}'", root_id);
        }
        removed
    }

    /// Removes the entry for `root_id` only if it still publishes `root`.
    ///
    /// Returns true if the entry was removed.
    pub fn remove_root(&self, root_id: &str, root: &Node) -> bool {
        let mut roots = self.roots.lock();
        match roots.get(root_id) {
            Some(published) if Node::ptr_eq(published, root) => {
                roots.remove(root_id);
                tracing::debug!("Removed shared root '{}'", root_id);
                true
            }
            _ => false,
        }
    }

    /// Returns the number of published roots.
    pub fn len(&self) -> usize {
        self.roots.lock().len()
    }

    /// Returns true if nothing is published.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
