//! Settings tree
//!
//! Nodes live in an arena and refer to their parent by [`NodeId`]. The
//! parent link only records where a node sits; values are copied into a
//! node when it is created and never shared afterwards.

use std::sync::Arc;

use crate::settings::Settings;
use crate::taxonomy::Taxonomy;

/// Handle to a node in a [`SettingsTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    settings: Settings,
}

/// Arena of settings nodes.
#[derive(Debug, Clone, Default)]
pub struct SettingsTree {
    nodes: Vec<Node>,
}

impl SettingsTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, parent: Option<NodeId>, settings: Settings) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            settings,
        });
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    /// Add a root node with default values.
    pub fn add_root(&mut self, taxonomy: Arc<Taxonomy>) -> NodeId {
        self.push(None, Settings::new(taxonomy))
    }

    /// Add a root node holding a snapshot of `source`.
    ///
    /// Returns `None` when `source` is not in this tree.
    pub fn derive_root_from(&mut self, source: NodeId) -> Option<NodeId> {
        let settings = Settings::derive_from(self.get(source)?);
        Some(self.push(None, settings))
    }

    /// Add a child of `parent`.
    ///
    /// With a `source` the child starts as a snapshot of that node,
    /// otherwise with default values. Returns `None` for unknown ids.
    pub fn derive_child(&mut self, parent: NodeId, source: Option<NodeId>) -> Option<NodeId> {
        let parent_settings = self.get(parent)?;
        let settings = match source {
            Some(source) => Settings::derive_from(self.get(source)?),
            None => Settings::new(Arc::clone(parent_settings.taxonomy())),
        };
        log::debug!("adding settings node under {parent:?} (source {source:?})");
        Some(self.push(Some(parent), settings))
    }

    pub fn get(&self, id: NodeId) -> Option<&Settings> {
        self.nodes.get(id.0).map(|n| &n.settings)
    }

    /// Mutable access to one node. Other nodes are unaffected.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Settings> {
        self.nodes.get_mut(id.0).map(|n| &mut n.settings)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(id.0) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
