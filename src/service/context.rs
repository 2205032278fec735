// SPDX-License-Identifier: MIT OR Apache-2.0

//! Naming context handles.
//!
//! A [`NamingContext`] is an open handle onto a tree: either a private root,
//! or in shared mode the root published under the configured root
//! identifier. It exposes the tree operations of its root node plus loading
//! and closing.

use crate::adapters::TextSource;
use crate::domain::{
    Binding, Bound, NamingConfig, Node, NodeConfig, Records, Result, SharedRootRegistry, ToName,
    Value,
};
use crate::ports::{Converter, ObjectFactory, RecordFormat, RecordSource};
use crate::service::conversion::ConversionService;
use crate::service::loader::Loader;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// An open handle onto a namespace tree.
///
/// # Examples
///
/// ```rust
/// use nametree::prelude::*;
///
/// # fn main() -> Result<()> {
/// let context = NamingContext::builder()
///     .with_source(Box::new(TextSource::new(
///         RecordFormat::Properties,
///         "db.host=localhost\ndb.port.type=integer\ndb.port=5432",
///     )))
///     .build()?;
///
/// assert_eq!(context.lookup_value("db.host")?, Value::from("localhost"));
/// assert_eq!(context.lookup_value("db.port")?, Value::Integer(5432));
///
/// context.close()?;
/// context.close()?;
/// # Ok(())
/// # }
/// ```
pub struct NamingContext {
    root: Node,
    config: NamingConfig,
    registry: Option<Arc<SharedRootRegistry>>,
    loader: Loader,
    closed: AtomicBool,
}

impl NamingContext {
    /// Opens a handle with the given configuration and built-in converters.
    pub fn open(config: NamingConfig) -> Result<Self> {
        Self::builder().with_config(config).build()
    }

    /// Creates a new handle builder.
    pub fn builder() -> NamingContextBuilder {
        NamingContextBuilder::new()
    }

    /// The root node of the tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The configuration the handle was opened with.
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    /// The root identifier.
    pub fn root_id(&self) -> &str {
        &self.config.root
    }

    /// Returns true if the tree is published in a shared-root registry.
    pub fn is_shared(&self) -> bool {
        self.registry.is_some()
    }

    /// Returns true once this handle has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Loads a record set into the root.
    pub fn load(&self, records: &Records) -> Result<()> {
        self.loader.load(records, &self.root)
    }

    /// Loads a record set into the node at `path`, creating it if needed.
    pub fn load_into(&self, records: &Records, path: impl ToName) -> Result<()> {
        let target = self.root.ensure_subnode(path)?;
        self.loader.load(records, &target)
    }

    /// Loads a record source into the root.
    pub fn load_source(&self, source: &dyn RecordSource) -> Result<()> {
        self.loader.load_source(source, &self.root)
    }

    /// Parses text in the given format and loads it into the root.
    ///
    /// Block sources use the configured comment character.
    pub fn load_text(&self, format: RecordFormat, content: &str) -> Result<()> {
        let source = TextSource::new(format, content).with_comment_char(self.config.comment_char);
        self.load_source(&source)
    }

    /// Looks up a name. An empty path returns the root itself.
    pub fn lookup(&self, path: impl ToName) -> Result<Bound> {
        self.root.lookup(path)
    }

    /// Looks up a name that must be bound to a leaf value.
    pub fn lookup_value(&self, path: impl ToName) -> Result<Value> {
        self.root.lookup_value(path)
    }

    /// Binds a value or node.
    pub fn bind(&self, path: impl ToName, value: impl Into<Bound>) -> Result<()> {
        self.root.bind(path, value)
    }

    /// Binds a value or node, replacing any existing binding.
    pub fn rebind(&self, path: impl ToName, value: impl Into<Bound>) -> Result<()> {
        self.root.rebind(path, value)
    }

    /// Removes a binding.
    pub fn unbind(&self, path: impl ToName) -> Result<()> {
        self.root.unbind(path)
    }

    /// Moves a binding.
    pub fn rename(&self, old: impl ToName, new: impl ToName) -> Result<()> {
        self.root.rename(old, new)
    }

    /// Lists the names bound in the node at `path`.
    pub fn list(&self, path: impl ToName) -> Result<Vec<String>> {
        self.root.list(path)
    }

    /// Lists the bindings of the node at `path`.
    pub fn list_bindings(&self, path: impl ToName) -> Result<Vec<Binding>> {
        self.root.list_bindings(path)
    }

    /// Creates a child node.
    pub fn create_subnode(&self, path: impl ToName) -> Result<Node> {
        self.root.create_subnode(path)
    }

    /// Destroys a child node and everything below it.
    pub fn destroy_subnode(&self, path: impl ToName) -> Result<()> {
        self.root.destroy_subnode(path)
    }

    /// Closes the handle.
    ///
    /// Closing again is a no-op, and so is closing with `ignore_close` set.
    /// Only this handle's setting counts: a shared root is removed from its
    /// registry and torn down even if the handle that built it ignores close.
    pub fn close(&self) -> Result<()> {
        if self.config.ignore_close {
            tracing::debug!("Ignoring close of root '{}'", self.config.root);
            return Ok(());
        }
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(registry) = &self.registry {
            registry.remove_root(&self.config.root, &self.root);
        }
        tracing::debug!("Closing root '{}'", self.config.root);
        self.root.release();
        Ok(())
    }
}

impl fmt::Debug for NamingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamingContext")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("shared", &self.is_shared())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Builder for constructing a `NamingContext`.
///
/// # Examples
///
/// ```rust
/// use nametree::domain::SharedRootRegistry;
/// use nametree::service::NamingContextBuilder;
/// use std::sync::Arc;
///
/// # fn main() -> nametree::domain::Result<()> {
/// let registry = Arc::new(SharedRootRegistry::new());
/// let first = NamingContextBuilder::new()
///     .with_root("app")
///     .shared(true)
///     .with_registry(registry.clone())
///     .build()?;
/// let second = NamingContextBuilder::new()
///     .with_root("app")
///     .shared(true)
///     .with_registry(registry)
///     .build()?;
///
/// first.bind("answer", "42")?;
/// assert!(second.lookup("answer").is_ok());
/// # Ok(())
/// # }
/// ```
pub struct NamingContextBuilder {
    config: NamingConfig,
    registry: Option<Arc<SharedRootRegistry>>,
    conversion: ConversionService,
    sources: Vec<Box<dyn RecordSource>>,
}

impl NamingContextBuilder {
    /// Creates a new builder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: NamingConfig::default(),
            registry: None,
            conversion: ConversionService::new(),
            sources: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, config: NamingConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the delimiter specification.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.config = self.config.with_delimiter(delimiter);
        self
    }

    /// Sets the root identifier.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.config = self.config.with_root(root);
        self
    }

    /// Enables or disables shared mode.
    pub fn shared(mut self, shared: bool) -> Self {
        self.config = self.config.shared(shared);
        self
    }

    /// Enables or disables close suppression.
    pub fn ignore_close(mut self, ignore_close: bool) -> Self {
        self.config = self.config.ignore_close(ignore_close);
        self
    }

    /// Uses the given registry for shared roots instead of the process-wide one.
    pub fn with_registry(mut self, registry: Arc<SharedRootRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Registers a converter for a type name.
    pub fn with_converter(mut self, type_name: impl Into<String>, converter: Arc<dyn Converter>) -> Self {
        self.conversion.register_converter(type_name, converter);
        self
    }

    /// Registers a converter selectable through a `converter` attribute.
    pub fn with_converter_plugin(mut self, id: impl Into<String>, converter: Arc<dyn Converter>) -> Self {
        self.conversion.register_plugin(id, converter);
        self
    }

    /// Installs the object factory consulted before the built-in converters.
    pub fn with_object_factory(mut self, factory: Arc<dyn ObjectFactory>) -> Self {
        self.conversion.set_object_factory(factory);
        self
    }

    /// Adds a record source loaded when the handle is opened.
    pub fn with_source(mut self, source: Box<dyn RecordSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Opens the handle and loads every source into a newly built tree.
    ///
    /// Every source is attempted; the first failure is returned. In shared
    /// mode the sources are loaded while the tree is built for its registry
    /// entry, so a root that is already published is reused as is and a
    /// root whose sources fail is never published.
    pub fn build(self) -> Result<NamingContext> {
        let node_config = NodeConfig::from_config(&self.config)?;
        let loader = Loader::new(Arc::new(self.conversion));
        let sources = self.sources;

        let (root, registry) = if self.config.shared {
            let registry = self.registry.unwrap_or_else(SharedRootRegistry::global);
            let root = registry.get_or_create(&self.config.root, || {
                let root = Node::root(node_config);
                Self::load_sources(&loader, &sources, &root)?;
                Ok(root)
            })?;
            (root, Some(registry))
        } else {
            let root = Node::root(node_config);
            Self::load_sources(&loader, &sources, &root)?;
            (root, None)
        };

        let context = NamingContext {
            root,
            config: self.config,
            registry,
            loader,
            closed: AtomicBool::new(false),
        };
        tracing::debug!(
            "Opened {} root '{}'",
            if context.is_shared() { "shared" } else { "private" },
            context.root_id()
        );
        Ok(context)
    }

    fn load_sources(loader: &Loader, sources: &[Box<dyn RecordSource>], root: &Node) -> Result<()> {
        let mut first_failure = None;
        for source in sources {
            if let Err(e) = loader.load_source(source.as_ref(), root) {
                tracing::warn!("Failed to load source '{}': {}", source.name(), e);
                first_failure.get_or_insert(e);
            }
        }
        tracing::debug!("Loaded {} sources", sources.len());
        match first_failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for NamingContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NamingError;

    fn private() -> NamingContext {
        NamingContext::open(NamingConfig::default()).unwrap()
    }

    #[test]
    fn test_open_private() {
        let context = private();
        assert!(!context.is_shared());
        assert_eq!(context.root_id(), "");
        assert!(context.list("").unwrap().is_empty());
    }

    #[test]
    fn test_delegated_operations() {
        let context = private();
        context.create_subnode("a").unwrap();
        context.bind("a.b", "1").unwrap();
        context.rename("a.b", "a.c").unwrap();
        assert_eq!(context.list("a").unwrap(), vec!["c"]);
        context.rebind("a.c", "2").unwrap();
        assert_eq!(context.lookup_value("a.c").unwrap(), Value::from("2"));
        assert_eq!(context.list_bindings("a").unwrap().len(), 1);
        context.unbind("a.c").unwrap();
        context.destroy_subnode("a").unwrap();
        assert!(matches!(context.lookup("a"), Err(NamingError::NotFound { .. })));
    }

    #[test]
    fn test_close_is_idempotent() {
        let context = private();
        context.bind("k", "v").unwrap();
        context.close().unwrap();
        context.close().unwrap();
        assert!(context.is_closed());
        assert!(matches!(context.lookup("k"), Err(NamingError::Closed { .. })));
    }

    #[test]
    fn test_ignore_close() {
        let context = NamingContext::open(NamingConfig::default().ignore_close(true)).unwrap();
        context.bind("k", "v").unwrap();
        context.close().unwrap();
        assert!(!context.is_closed());
        assert!(context.lookup("k").is_ok());
    }

    #[test]
    fn test_shared_close_removes_registry_entry() {
        let registry = Arc::new(SharedRootRegistry::new());
        let context = NamingContext::builder()
            .with_root("r")
            .shared(true)
            .with_registry(registry.clone())
            .build()
            .unwrap();
        assert!(registry.contains("r"));
        context.close().unwrap();
        assert!(!registry.contains("r"));
    }

    #[test]
    fn test_load_into() {
        let context = private();
        let records: Records = vec![("host", "h")].into_iter().collect();
        context.load_into(&records, "db").unwrap();
        assert_eq!(context.lookup_value("db.host").unwrap(), Value::from("h"));
    }

    #[test]
    fn test_load_text_uses_comment_char() {
        let context =
            NamingContext::open(NamingConfig::default().with_comment_char(';')).unwrap();
        context
            .load_text(RecordFormat::Ini, "[db]\nhost=h ; primary")
            .unwrap();
        assert_eq!(context.lookup_value("db.host").unwrap(), Value::from("h"));
    }

    #[test]
    fn test_build_reports_failing_source() {
        let result = NamingContext::builder()
            .with_source(Box::new(TextSource::new(RecordFormat::Ini, "[broken")))
            .build();
        assert!(matches!(result, Err(NamingError::ParseError { .. })));
    }

    #[test]
    fn test_build_rejects_bad_delimiter() {
        let result = NamingContext::builder().with_delimiter("(").build();
        assert!(matches!(result, Err(NamingError::InvalidConfig { .. })));
    }
}
