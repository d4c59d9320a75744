//! The logger repository
//!
//! A [`Repository`] owns the namespace tree. Every dotted logger name maps to
//! one node; nodes are created on first request together with any missing
//! ancestors and live until [`Repository::reset`].
//!
//! ## Concurrency
//!
//! Tree shape, binding lists and configuration commits are serialised by one
//! structural mutex per repository. Readers never take it: child maps and
//! binding lists are immutable snapshots swapped atomically, explicit levels
//! are atomics and exact-name lookups go through a concurrent leaf cache.

mod node;

use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};

use crate::component::ComponentFactory;
use crate::config::{ConfigReport, Configurator, Keys, Properties};
use crate::core::{DIAGNOSTIC_TARGET, LogIoResultExt, LogResult, report};
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::SinkBinding;

pub(crate) use node::{Children, Node};

/// Client identifier used when none is configured
pub const DEFAULT_CLIENT_ID: &str = "arbor";

/// Drop empty segments so the name equals the path of the node it denotes
pub(crate) fn normalize(name: &str) -> Cow<'_, str> {
    let clean = !name.starts_with('.') && !name.ends_with('.') && !name.contains("..");
    if clean {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(
            name.split('.')
                .filter(|segment| !segment.is_empty())
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

fn child_name(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_owned()
    } else {
        format!("{parent}.{segment}")
    }
}

/// Level and bindings one logger ends up with after a configuration pass
#[derive(Debug, Default)]
pub(crate) struct LoggerPlan {
    pub(crate) level: Option<Level>,
    pub(crate) bindings: Vec<Arc<SinkBinding>>,
}

/// Off-tree result of a hierarchical configuration pass
#[derive(Debug, Default)]
pub(crate) struct TreePlan {
    pub(crate) root: LoggerPlan,
    /// Keyed by normalised logger name
    pub(crate) loggers: BTreeMap<String, LoggerPlan>,
}

#[derive(Default)]
struct Draft {
    plan: Option<LoggerPlan>,
    children: BTreeMap<String, Draft>,
}

/// State shared between a repository handle and its loggers
pub(crate) struct Shared {
    root: Arc<Node>,
    leaves: DashMap<String, Arc<Node>>,
    structure: Mutex<()>,
    client_id: ArcSwap<String>,
    factory: ComponentFactory,
    keys: Keys,
}

impl Shared {
    pub(crate) fn lock_structure(&self) -> MutexGuard<'_, ()> {
        self.structure.lock()
    }

    pub(crate) fn client_id(&self) -> Arc<String> {
        self.client_id.load_full()
    }

    /// `name` must already be normalised
    pub(crate) fn effective_level(&self, name: &str) -> Level {
        let cached = self.leaves.get(name).map(|entry| Arc::clone(entry.value()));
        if let Some(level) = cached.and_then(|node| node.effective_level()) {
            return level;
        }
        self.deepest(name)
            .effective_level()
            .unwrap_or_else(|| self.root_level())
    }

    fn root_level(&self) -> Level {
        self.root.logger().level().unwrap_or(Level::ROOT_DEFAULT)
    }

    /// Deepest existing node on the path of `name`, never creating any
    fn deepest(&self, name: &str) -> Arc<Node> {
        let mut current = Arc::clone(&self.root);
        for segment in name.split('.') {
            match current.child(segment) {
                Some(child) => current = child,
                None => break,
            }
        }
        current
    }

    /// Resolve `name`, creating missing nodes. Caller holds the structural lock.
    fn resolve_locked(self: &Arc<Self>, name: &str, register: bool) -> Arc<Node> {
        let mut current = Arc::clone(&self.root);
        for segment in name.split('.') {
            current = match current.child(segment) {
                Some(child) => child,
                None => {
                    let logger = Logger::new(
                        child_name(current.logger().name(), segment),
                        Arc::downgrade(self),
                        None,
                    );
                    let child = Arc::new(Node::new(Arc::new(logger), Arc::downgrade(&current)));
                    current.insert_child(segment, Arc::clone(&child));
                    child
                }
            };
        }
        if register {
            self.leaves.insert(name.to_owned(), Arc::clone(&current));
        }
        current
    }

    fn materialize(
        self: &Arc<Self>,
        name: String,
        draft: Draft,
        parent: Weak<Node>,
    ) -> Arc<Node> {
        let plan = draft.plan.unwrap_or_default();
        let logger = Logger::wired(name, Arc::downgrade(self), plan.level, plan.bindings);
        let node = Arc::new(Node::new(Arc::new(logger), parent));
        let children = draft
            .children
            .into_iter()
            .map(|(segment, child)| {
                let name = child_name(node.logger().name(), &segment);
                let child = self.materialize(name, child, Arc::downgrade(&node));
                (segment, child)
            })
            .collect();
        node.replace_children(children);
        node
    }

    /// Rewire the tree from a hierarchical plan
    ///
    /// Loggers already in the tree are updated in place, so handles callers
    /// hold stay wired; loggers the plan does not mention lose their level and
    /// bindings. Missing branches get every level and binding before they are
    /// linked. The root is rewired first.
    fn install(self: &Arc<Self>, plan: TreePlan) {
        let mut top = Draft::default();
        let names: Vec<String> = plan.loggers.keys().cloned().collect();
        for (name, logger) in plan.loggers {
            let mut draft = &mut top;
            for segment in name.split('.') {
                draft = draft.children.entry(segment.to_owned()).or_default();
            }
            draft.plan = Some(logger);
        }

        let _guard = self.lock_structure();
        let root = self.root.logger();
        if let Some(level) = plan.root.level {
            root.set_level(Some(level));
        }
        root.replace_bindings(plan.root.bindings);

        self.merge_children(&self.root, top.children);

        for name in names {
            let node = self.deepest(&name);
            self.leaves.insert(name, node);
        }
    }

    /// Caller holds the structural lock
    fn merge_children(self: &Arc<Self>, node: &Arc<Node>, mut drafts: BTreeMap<String, Draft>) {
        for (segment, child) in node.children().iter() {
            match drafts.remove(segment) {
                Some(draft) => {
                    let plan = draft.plan.unwrap_or_default();
                    let logger = child.logger();
                    logger.replace_bindings(plan.bindings);
                    logger.set_level(plan.level);
                    self.merge_children(child, draft.children);
                }
                None => {
                    child.logger().reset_locked(None);
                    child.for_each_descendant(&mut |descendant| descendant.logger().reset_locked(None));
                }
            }
        }
        for (segment, draft) in drafts {
            let name = child_name(node.logger().name(), &segment);
            let child = self.materialize(name, draft, Arc::downgrade(node));
            node.insert_child(&segment, child);
        }
    }
}

/// Owner of a logger namespace
///
/// Cloning is cheap and yields another handle onto the same tree.
///
/// # Example
///
/// ```rust
/// use arbor_log::{Level, Repository};
///
/// let repository = Repository::new();
/// repository.set_level("db", Some(Level::Error));
///
/// let pool = repository.get_logger("db.pool");
/// assert_eq!(pool.level(), None);
/// assert_eq!(pool.effective_level(), Level::Error);
/// assert_eq!(repository.effective_level("http"), Level::Debug);
/// ```
#[derive(Clone)]
pub struct Repository {
    shared: Arc<Shared>,
}

impl Repository {
    /// Repository with the built-in components and default settings
    pub fn new() -> Self {
        RepositoryBuilder::new().build()
    }

    /// Start configuring a repository
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// The root logger
    pub fn root_logger(&self) -> Arc<Logger> {
        Arc::clone(self.shared.root.logger())
    }

    /// Logger for `name`, creating it and any missing ancestors
    ///
    /// Repeated calls with the same name return the same logger. The empty
    /// name denotes the root logger.
    pub fn get_logger(&self, name: &str) -> Arc<Logger> {
        self.get_logger_with(name, true)
    }

    /// Like [`get_logger`](Self::get_logger); `register_as_leaf = false`
    /// keeps the name out of the leaf cache.
    pub fn get_logger_with(&self, name: &str, register_as_leaf: bool) -> Arc<Logger> {
        let name = normalize(name);
        if name.is_empty() {
            return self.root_logger();
        }
        if let Some(node) = self.shared.leaves.get(name.as_ref()) {
            return Arc::clone(node.logger());
        }

        let _guard = self.shared.lock_structure();
        let node = self.shared.resolve_locked(&name, register_as_leaf);
        Arc::clone(node.logger())
    }

    /// Level a logger called `name` filters with. Never creates nodes.
    pub fn effective_level(&self, name: &str) -> Level {
        self.shared.effective_level(&normalize(name))
    }

    /// Whether `name` is in the leaf cache
    pub fn contains(&self, name: &str) -> bool {
        self.shared.leaves.contains_key(normalize(name).as_ref())
    }

    /// Number of names in the leaf cache
    pub fn number_of_leaf_nodes(&self) -> usize {
        self.shared.leaves.len()
    }

    /// Set the explicit level of `name`, creating the logger if needed
    pub fn set_level(&self, name: &str, level: Option<Level>) {
        self.get_logger(name).set_level(level);
    }

    /// Discard every node but the root and empty the leaf cache
    ///
    /// The root keeps its level and bindings. Loggers handed out before the
    /// reset keep working but are no longer part of the tree.
    pub fn reset(&self) {
        let _guard = self.shared.lock_structure();
        self.shared.root.replace_children(Children::new());
        self.shared.leaves.clear();
        tracing::debug!(target: DIAGNOSTIC_TARGET, "repository reset");
    }

    /// Clear every binding and explicit level, keeping the tree shape
    ///
    /// The root returns to [`Level::ROOT_DEFAULT`].
    pub fn reset_config(&self) {
        let _guard = self.shared.lock_structure();
        let root = &self.shared.root;
        root.logger().reset_locked(Some(Level::ROOT_DEFAULT));
        root.for_each_descendant(&mut |node| node.logger().reset_locked(None));
        tracing::debug!(target: DIAGNOSTIC_TARGET, "repository configuration reset");
    }

    /// Close every sink bound to the root or to a cached leaf
    ///
    /// A sink bound in several places is closed once. Every sink is
    /// attempted; the first failure is returned.
    pub fn shutdown(&self) -> LogResult<()> {
        let mut loggers = vec![self.root_logger()];
        loggers.extend(
            self.shared
                .leaves
                .iter()
                .map(|entry| Arc::clone(entry.value().logger())),
        );

        let mut seen = HashSet::new();
        let mut first = None;
        for logger in loggers {
            for binding in logger.bindings().iter() {
                let sink = binding.sink();
                if !seen.insert(Arc::as_ptr(sink).cast::<()>()) {
                    continue;
                }
                if let Err(error) = sink.close().with_sink("close", sink.name()) {
                    report(&error);
                    first.get_or_insert(error);
                }
            }
        }
        tracing::debug!(target: DIAGNOSTIC_TARGET, sinks = seen.len(), "repository shut down");
        first.map_or(Ok(()), Err)
    }

    /// Identifier stamped on every record
    pub fn client_id(&self) -> Arc<String> {
        self.shared.client_id()
    }

    /// Change the identifier stamped on every record
    pub fn set_client_id(&self, client_id: impl Into<String>) {
        self.shared.client_id.store(Arc::new(client_id.into()));
    }

    /// Wire loggers, sinks and formatters from `properties`
    ///
    /// Problems are collected in the returned report and logged on the
    /// diagnostic channel; they never abort the pass.
    pub fn configure(&self, properties: &Properties) -> ConfigReport {
        Configurator::new(self).configure(properties)
    }

    /// Constructors available to configuration
    pub fn factory(&self) -> &ComponentFactory {
        &self.shared.factory
    }

    /// Configuration key names for this repository
    pub fn keys(&self) -> &Keys {
        &self.shared.keys
    }

    pub(crate) fn install(&self, plan: TreePlan) {
        self.shared.install(plan);
    }

    /// Run `mutate` on the root logger with the structural lock held
    pub(crate) fn with_root_locked<R>(&self, mutate: impl FnOnce(&Logger) -> R) -> R {
        let _guard = self.shared.lock_structure();
        mutate(self.shared.root.logger())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("client_id", &self.shared.client_id())
            .field("root_level", &self.shared.root.logger().level())
            .field("leaves", &self.shared.leaves.len())
            .field("factory", &self.shared.factory)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Repository`]
///
/// # Example
///
/// ```rust
/// use arbor_log::{ComponentFactory, Repository};
///
/// let repository = Repository::builder()
///     .client_id("billing")
///     .key_prefix("billing.log")
///     .factory(ComponentFactory::with_builtins())
///     .build();
///
/// assert_eq!(repository.client_id().as_str(), "billing");
/// assert_eq!(repository.keys().root_logger(), "billing.log.rootLogger");
/// ```
#[derive(Debug)]
pub struct RepositoryBuilder {
    factory: ComponentFactory,
    client_id: String,
    key_prefix: String,
    root_level: Level,
}

impl RepositoryBuilder {
    /// Builder with the built-in components and default settings
    pub fn new() -> Self {
        Self {
            factory: ComponentFactory::with_builtins(),
            client_id: DEFAULT_CLIENT_ID.to_owned(),
            key_prefix: Keys::DEFAULT_PREFIX.to_owned(),
            root_level: Level::ROOT_DEFAULT,
        }
    }

    /// Component constructors used by configuration
    #[must_use]
    pub fn factory(mut self, factory: ComponentFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Identifier stamped on every record
    #[must_use]
    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// Prefix of every configuration key
    #[must_use]
    pub fn key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Level the root logger starts with
    #[must_use]
    pub fn root_level(mut self, level: Level) -> Self {
        self.root_level = level;
        self
    }

    /// Build the repository
    pub fn build(self) -> Repository {
        let shared = Arc::new_cyclic(|this: &Weak<Shared>| {
            let root = Logger::new(String::new(), this.clone(), Some(self.root_level));
            Shared {
                root: Arc::new(Node::new(Arc::new(root), Weak::new())),
                leaves: DashMap::new(),
                structure: Mutex::new(()),
                client_id: ArcSwap::from_pointee(self.client_id),
                factory: self.factory,
                keys: Keys::new(self.key_prefix),
            }
        });
        Repository { shared }
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
