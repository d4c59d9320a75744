//! Namespace tree nodes

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;

use crate::level::Level;
use crate::logger::Logger;

pub(crate) type Children = HashMap<String, Arc<Node>>;

/// One segment of the namespace, owning the logger bound to its path
///
/// The child map is an immutable snapshot; structural changes build a new
/// map and swap it in while the repository's structural lock is held.
pub(crate) struct Node {
    logger: Arc<Logger>,
    parent: Weak<Node>,
    children: ArcSwap<Children>,
}

impl Node {
    pub(crate) fn new(logger: Arc<Logger>, parent: Weak<Self>) -> Self {
        Self {
            logger,
            parent,
            children: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    pub(crate) fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub(crate) fn child(&self, segment: &str) -> Option<Arc<Self>> {
        self.children.load().get(segment).cloned()
    }

    pub(crate) fn children(&self) -> Arc<Children> {
        self.children.load_full()
    }

    /// Caller holds the structural lock
    pub(crate) fn replace_children(&self, children: Children) {
        self.children.store(Arc::new(children));
    }

    /// Caller holds the structural lock
    pub(crate) fn insert_child(&self, segment: &str, child: Arc<Self>) {
        let mut children = Children::clone(&self.children.load());
        children.insert(segment.to_owned(), child);
        self.replace_children(children);
    }

    /// Level of the nearest ancestor (self included) with an explicit level
    ///
    /// `None` when an ancestor was dropped by a concurrent tree swap before
    /// one with a level was reached.
    pub(crate) fn effective_level(self: &Arc<Self>) -> Option<Level> {
        let mut current = Arc::clone(self);
        loop {
            if let Some(level) = current.logger.level() {
                return Some(level);
            }
            current = current.parent.upgrade()?;
        }
    }

    /// Depth-first visit of every descendant, excluding `self`
    pub(crate) fn for_each_descendant(&self, visit: &mut impl FnMut(&Arc<Self>)) {
        for child in self.children.load().values() {
            visit(child);
            child.for_each_descendant(visit);
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("logger", &self.logger.name())
            .field("children", &self.children.load().len())
            .finish_non_exhaustive()
    }
}
