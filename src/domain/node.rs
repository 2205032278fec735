// SPDX-License-Identifier: MIT OR Apache-2.0

//! The namespace tree.
//!
//! A [`Node`] owns a map from local segment names to either a leaf [`Value`]
//! or a child `Node`. Every operation takes a path relative to the node it is
//! invoked on and walks exactly one child node per non-final segment.
//!
//! `Node` is a cheap handle: clones refer to the same underlying storage.
//! Each node's map is guarded by its own lock, so operations that cross
//! several nodes (a multi-hop bind, a rename) are not atomic as a whole.

use crate::domain::config::NamingConfig;
use crate::domain::errors::{NamingError, Result};
use crate::domain::name::{Delimiter, Name, ToName};
use crate::domain::value::Value;
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

/// Settings inherited by every node of one tree.
#[derive(Clone, Debug, Default)]
pub struct NodeConfig {
    delimiter: Delimiter,
    ignore_close: bool,
}

impl NodeConfig {
    /// Creates node settings.
    pub fn new(delimiter: Delimiter, ignore_close: bool) -> Self {
        Self {
            delimiter,
            ignore_close,
        }
    }

    /// Compiles node settings from a naming configuration.
    pub fn from_config(config: &NamingConfig) -> Result<Self> {
        Ok(Self::new(config.compile_delimiter()?, config.ignore_close))
    }

    /// The delimiter used to split string paths.
    pub fn delimiter(&self) -> &Delimiter {
        &self.delimiter
    }

    /// Whether `close()` is suppressed.
    pub fn ignore_close(&self) -> bool {
        self.ignore_close
    }
}

/// What a name resolves to: a leaf value or a child node.
#[derive(Clone, Debug)]
pub enum Bound {
    /// A leaf value.
    Value(Value),
    /// A child node.
    Node(Node),
}

impl Bound {
    /// Returns the leaf value, if any.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Bound::Value(v) => Some(v),
            Bound::Node(_) => None,
        }
    }

    /// Returns the child node, if any.
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Bound::Node(n) => Some(n),
            Bound::Value(_) => None,
        }
    }

    /// Converts into the leaf value, if any.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Bound::Value(v) => Some(v),
            Bound::Node(_) => None,
        }
    }

    /// Converts into the child node, if any.
    pub fn into_node(self) -> Option<Node> {
        match self {
            Bound::Node(n) => Some(n),
            Bound::Value(_) => None,
        }
    }

    /// Returns true for child nodes.
    pub fn is_node(&self) -> bool {
        matches!(self, Bound::Node(_))
    }
}

impl PartialEq for Bound {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Bound::Value(a), Bound::Value(b)) => a == b,
            (Bound::Node(a), Bound::Node(b)) => Node::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for Bound {
    fn from(value: Value) -> Self {
        Bound::Value(value)
    }
}

impl From<Node> for Bound {
    fn from(node: Node) -> Self {
        Bound::Node(node)
    }
}

impl From<&str> for Bound {
    fn from(s: &str) -> Self {
        Bound::Value(Value::from(s))
    }
}

impl From<String> for Bound {
    fn from(s: String) -> Self {
        Bound::Value(Value::from(s))
    }
}

/// A name together with what it is bound to.
#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    /// The local name
    pub name: String,
    /// The bound value or node
    pub value: Bound,
}

#[derive(Default)]
struct NodeState {
    bindings: IndexMap<String, Bound>,
    closed: bool,
}

struct NodeInner {
    name: OnceCell<String>,
    config: Arc<NodeConfig>,
    parent: Option<Weak<NodeInner>>,
    local_name: String,
    state: RwLock<NodeState>,
}

/// A node of the namespace tree.
///
/// # Examples
///
/// ```
/// use nametree::domain::node::{Node, NodeConfig};
/// use nametree::domain::value::Value;
/// use nametree::domain::errors::NamingError;
///
/// # fn main() -> nametree::domain::Result<()> {
/// let root = Node::root(NodeConfig::default());
/// root.create_subnode("db")?;
/// root.bind("db.host", "localhost")?;
///
/// let host = root.lookup("db.host")?;
/// assert_eq!(host.as_value(), Some(&Value::from("localhost")));
///
/// let again = root.bind("db.host", "elsewhere");
/// assert!(matches!(again, Err(NamingError::AlreadyBound { .. })));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Node {
    inner: Arc<NodeInner>,
}

impl Node {
    /// Creates a detached root node.
    pub fn root(config: NodeConfig) -> Self {
        Self::with_config(Arc::new(config), None, String::new())
    }

    fn with_config(config: Arc<NodeConfig>, parent: Option<Weak<NodeInner>>, local_name: String) -> Self {
        Self {
            inner: Arc::new(NodeInner {
                name: OnceCell::new(),
                config,
                parent,
                local_name,
                state: RwLock::new(NodeState::default()),
            }),
        }
    }

    fn new_child(&self, segment: &str) -> Result<Node> {
        let child = Self::with_config(
            self.inner.config.clone(),
            Some(Arc::downgrade(&self.inner)),
            segment.to_string(),
        );
        child.set_name_in_namespace(self.compose(segment))?;
        Ok(child)
    }

    /// Returns true if both handles refer to the same node.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// The settings this node inherited.
    pub fn config(&self) -> &NodeConfig {
        &self.inner.config
    }

    /// The delimiter used to split string paths.
    pub fn delimiter(&self) -> &Delimiter {
        self.inner.config.delimiter()
    }

    /// The absolute name of this node, empty until assigned.
    pub fn name_in_namespace(&self) -> &str {
        self.inner.name.get().map(String::as_str).unwrap_or("")
    }

    /// Assigns the absolute name. Only the first assignment succeeds.
    pub fn set_name_in_namespace(&self, name: impl Into<String>) -> Result<()> {
        let requested: String = name.into();
        self.inner.name.set(requested).map_err(|requested| NamingError::NameLocked {
            current: self.name_in_namespace().to_string(),
            requested,
        })
    }

    /// The name of this node inside its parent, empty for a root.
    pub fn local_name(&self) -> &str {
        &self.inner.local_name
    }

    /// The parent node, if this node was created as a child and the parent is alive.
    pub fn parent(&self) -> Option<Node> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| Node { inner })
    }

    /// Returns true once the node has been destroyed or closed.
    pub fn is_closed(&self) -> bool {
        self.inner.state.read().closed
    }

    /// Returns the number of local bindings.
    pub fn len(&self) -> usize {
        self.inner.state.read().bindings.len()
    }

    /// Returns true if the node has no local bindings.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_child_of(&self, parent: &Node) -> bool {
        self.inner
            .parent
            .as_ref()
            .map(|weak| Weak::as_ptr(weak) == Arc::as_ptr(&parent.inner))
            .unwrap_or(false)
    }

    fn compose(&self, segment: &str) -> String {
        let base = self.name_in_namespace();
        if base.is_empty() {
            return segment.to_string();
        }
        format!("{}{}{}", base, self.delimiter().separator(), segment)
    }

    fn closed_error(&self) -> NamingError {
        NamingError::Closed {
            name: self.name_in_namespace().to_string(),
        }
    }

    /// Resolves every segment of `name` as a child node.
    fn walk(&self, name: &Name) -> Result<Node> {
        let mut current = self.clone();
        for segment in name.segments() {
            let next = {
                let state = current.inner.state.read();
                if state.closed {
                    return Err(current.closed_error());
                }
                match state.bindings.get(segment) {
                    Some(Bound::Node(child)) => child.clone(),
                    Some(Bound::Value(_)) => {
                        return Err(NamingError::NotANode {
                            name: current.compose(segment),
                        })
                    }
                    None => {
                        return Err(NamingError::NotFound {
                            name: current.compose(segment),
                        })
                    }
                }
            };
            current = next;
        }
        Ok(current)
    }

    /// Splits `name` into its owning node and final segment.
    fn owner<'a>(&self, name: &'a Name, operation: &str) -> Result<(Node, &'a str)> {
        let last = name
            .last()
            .ok_or_else(|| NamingError::invalid_path(format!("cannot {} an empty name", operation)))?;
        Ok((self.walk(&name.parent())?, last))
    }

    /// Looks up a name.
    ///
    /// An empty path returns a handle to this same node, sharing its storage.
    pub fn lookup(&self, path: impl ToName) -> Result<Bound> {
        let name = path.to_name(self.delimiter());
        let Some(last) = name.last() else {
            if self.is_closed() {
                return Err(self.closed_error());
            }
            return Ok(Bound::Node(self.clone()));
        };
        let owner = self.walk(&name.parent())?;
        let state = owner.inner.state.read();
        if state.closed {
            return Err(owner.closed_error());
        }
        state
            .bindings
            .get(last)
            .cloned()
            .ok_or_else(|| NamingError::NotFound {
                name: owner.compose(last),
            })
    }

    /// Looks up a name that must be bound to a leaf value.
    pub fn lookup_value(&self, path: impl ToName) -> Result<Value> {
        let name = path.to_name(self.delimiter());
        match self.lookup(&name)? {
            Bound::Value(value) => Ok(value),
            Bound::Node(node) => Err(NamingError::InvalidPath {
                message: format!("'{}' is a node, not a value", node.name_in_namespace()),
            }),
        }
    }

    /// Binds a value or node. Fails if the final name is already bound.
    pub fn bind(&self, path: impl ToName, value: impl Into<Bound>) -> Result<()> {
        let name = path.to_name(self.delimiter());
        let (owner, last) = self.owner(&name, "bind")?;
        owner.bind_local(last, value.into())
    }

    fn bind_local(&self, segment: &str, value: Bound) -> Result<()> {
        let mut state = self.inner.state.write();
        if state.closed {
            return Err(self.closed_error());
        }
        if state.bindings.contains_key(segment) {
            return Err(NamingError::AlreadyBound {
                name: self.compose(segment),
            });
        }
        tracing::trace!("Binding '{}'", self.compose(segment));
        state.bindings.insert(segment.to_string(), value);
        Ok(())
    }

    /// Binds a value or node, replacing any existing binding.
    ///
    /// A replaced child node is unlinked, not destroyed.
    pub fn rebind(&self, path: impl ToName, value: impl Into<Bound>) -> Result<()> {
        let name = path.to_name(self.delimiter());
        let (owner, last) = self.owner(&name, "rebind")?;
        let mut state = owner.inner.state.write();
        if state.closed {
            return Err(owner.closed_error());
        }
        tracing::trace!("Rebinding '{}'", owner.compose(last));
        state.bindings.insert(last.to_string(), value.into());
        Ok(())
    }

    /// Removes a binding. Fails if the final name is not bound.
    ///
    /// An unbound child node is unlinked, not destroyed.
    pub fn unbind(&self, path: impl ToName) -> Result<()> {
        let name = path.to_name(self.delimiter());
        let (owner, last) = self.owner(&name, "unbind")?;
        let mut state = owner.inner.state.write();
        if state.closed {
            return Err(owner.closed_error());
        }
        match state.bindings.shift_remove(last) {
            Some(_) => {
                tracing::trace!("Unbound '{}'", owner.compose(last));
                Ok(())
            }
            None => Err(NamingError::NotFound {
                name: owner.compose(last),
            }),
        }
    }

    /// Moves the binding at `old` to `new`.
    ///
    /// Fails with `NotFound` if `old` is unbound and with `AlreadyBound` if
    /// `new` already resolves to something.
    pub fn rename(&self, old: impl ToName, new: impl ToName) -> Result<()> {
        let old = old.to_name(self.delimiter());
        let new = new.to_name(self.delimiter());
        if old.is_empty() || new.is_empty() {
            return Err(NamingError::invalid_path("cannot rename an empty name"));
        }
        let value = self.lookup(&old)?;
        if self.lookup(&new).is_ok() {
            return Err(NamingError::AlreadyBound {
                name: new.join(self.delimiter()),
            });
        }
        self.unbind(&old)?;
        self.bind(&new, value)
    }

    /// Lists the names bound in the node at `path`.
    pub fn list(&self, path: impl ToName) -> Result<Vec<String>> {
        let name = path.to_name(self.delimiter());
        let node = self.walk(&name)?;
        let state = node.inner.state.read();
        if state.closed {
            return Err(node.closed_error());
        }
        Ok(state.bindings.keys().cloned().collect())
    }

    /// Lists the bindings of the node at `path`.
    pub fn list_bindings(&self, path: impl ToName) -> Result<Vec<Binding>> {
        let name = path.to_name(self.delimiter());
        let node = self.walk(&name)?;
        let state = node.inner.state.read();
        if state.closed {
            return Err(node.closed_error());
        }
        Ok(state
            .bindings
            .iter()
            .map(|(name, value)| Binding {
                name: name.clone(),
                value: value.clone(),
            })
            .collect())
    }

    /// Creates a child node at `path`.
    ///
    /// Every segment but the last must already name a node; the last segment
    /// must be unbound.
    pub fn create_subnode(&self, path: impl ToName) -> Result<Node> {
        let name = path.to_name(self.delimiter());
        let (owner, last) = self.owner(&name, "create")?;
        let mut state = owner.inner.state.write();
        if state.closed {
            return Err(owner.closed_error());
        }
        if state.bindings.contains_key(last) {
            return Err(NamingError::AlreadyBound {
                name: owner.compose(last),
            });
        }
        let child = owner.new_child(last)?;
        state
            .bindings
            .insert(last.to_string(), Bound::Node(child.clone()));
        tracing::debug!("Created sub-node '{}'", child.name_in_namespace());
        Ok(child)
    }

    /// Resolves `path` as nodes, creating any missing segment.
    ///
    /// Fails with `StructuralConflict` if a segment is bound to a leaf.
    pub fn ensure_subnode(&self, path: impl ToName) -> Result<Node> {
        let name = path.to_name(self.delimiter());
        let mut current = self.clone();
        for segment in name.segments() {
            let next = {
                let mut state = current.inner.state.write();
                if state.closed {
                    return Err(current.closed_error());
                }
                match state.bindings.get(segment.as_str()) {
                    Some(Bound::Node(child)) => child.clone(),
                    Some(Bound::Value(_)) => {
                        return Err(NamingError::StructuralConflict {
                            name: current.compose(segment),
                        })
                    }
                    None => {
                        let child = current.new_child(segment)?;
                        state
                            .bindings
                            .insert(segment.clone(), Bound::Node(child.clone()));
                        tracing::debug!("Created sub-node '{}'", child.name_in_namespace());
                        child
                    }
                }
            };
            current = next;
        }
        Ok(current)
    }

    /// Destroys the child node at `path` and everything below it.
    pub fn destroy_subnode(&self, path: impl ToName) -> Result<()> {
        let name = path.to_name(self.delimiter());
        let (owner, last) = self.owner(&name, "destroy")?;
        let child = {
            let state = owner.inner.state.read();
            if state.closed {
                return Err(owner.closed_error());
            }
            match state.bindings.get(last) {
                Some(Bound::Node(child)) => child.clone(),
                Some(Bound::Value(_)) => {
                    return Err(NamingError::NotANode {
                        name: owner.compose(last),
                    })
                }
                None => {
                    return Err(NamingError::NotFound {
                        name: owner.compose(last),
                    })
                }
            }
        };

        child.release();

        let mut state = owner.inner.state.write();
        if let Some(Bound::Node(current)) = state.bindings.get(last) {
            if Node::ptr_eq(current, &child) {
                state.bindings.shift_remove(last);
            }
        }
        tracing::debug!("Destroyed sub-node '{}'", owner.compose(last));
        Ok(())
    }

    /// Empties this node and every node it owns, depth first.
    ///
    /// Unlike [`Node::close`] this ignores the node's `ignore_close` setting.
    pub(crate) fn release(&self) {
        let bindings = {
            let mut state = self.inner.state.write();
            if state.closed {
                return;
            }
            state.closed = true;
            std::mem::take(&mut state.bindings)
        };
        for (_, bound) in bindings {
            if let Bound::Node(child) = bound {
                if child.is_child_of(self) {
                    child.release();
                }
            }
        }
    }

    /// Destroys every descendant and closes this node.
    ///
    /// Calling it again is a no-op. When the node's settings ask to ignore
    /// close, nothing is destroyed.
    pub fn close(&self) -> Result<()> {
        if self.inner.config.ignore_close() {
            tracing::debug!(
                "Ignoring close of '{}'",
                self.name_in_namespace()
            );
            return Ok(());
        }
        self.release();
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("Node")
            .field("name", &self.name_in_namespace())
            .field("bindings", &state.bindings.len())
            .field("closed", &state.closed)
            .finish()
    }
}
