//! Node descriptors and the registry that resolves them
//!
//! A [`NodeDescriptor`] says which variables a node synchronizes, in which
//! order, and how a mismatch on each of them must be corrected. Snapshot
//! comparison only ever reads descriptors through [`NodeRegistry`].

use crate::{Error, NodeId, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Description of one synchronized variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDescriptor {
    /// Variable name
    pub name: String,
    /// Correct mismatches in place instead of rewinding
    #[serde(default)]
    pub skip_rewinding: bool,
}

impl VarDescriptor {
    /// A variable whose mismatch forces a rewind
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skip_rewinding: false,
        }
    }

    /// A variable whose mismatch is patched without rewinding
    pub fn skip_rewinding(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skip_rewinding: true,
        }
    }
}

/// Registry metadata of one synchronized node
///
/// `vars[i]` describes the variable at index `i` of the node's variable
/// list in every snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    pub display_name: String,
    pub vars: Vec<VarDescriptor>,
    /// Whether the node takes part in reconciliation at all
    pub sync_enabled: bool,
}

impl NodeDescriptor {
    /// Create a sync-enabled descriptor with no variables
    pub fn new(id: NodeId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            vars: Vec::new(),
            sync_enabled: true,
        }
    }

    /// Append a variable descriptor
    pub fn with_var(mut self, var: VarDescriptor) -> Self {
        self.vars.push(var);
        self
    }

    /// Descriptor of the variable at `index`
    pub fn var(&self, index: usize) -> Option<&VarDescriptor> {
        self.vars.get(index)
    }
}

/// Read-only lookup of node descriptors
///
/// Implementations must not change while a comparison is running.
pub trait NodeRegistry {
    /// Resolve a node id, `None` when the node is unknown
    fn lookup(&self, id: NodeId) -> Option<&NodeDescriptor>;
}

impl<R: NodeRegistry + ?Sized> NodeRegistry for &R {
    fn lookup(&self, id: NodeId) -> Option<&NodeDescriptor> {
        (**self).lookup(id)
    }
}

/// In-memory node registry
///
/// Ids are handed out positionally in registration order and are never
/// reused, so removing a node leaves a hole that lookups report as absent.
///
/// # Example
///
/// ```
/// use resync_core::{NodeRegistry, NodeTable, VarDescriptor};
///
/// let mut table = NodeTable::new();
/// let id = table
///     .register("player", vec![VarDescriptor::new("pos")])
///     .unwrap();
///
/// assert_eq!(id.raw(), 0);
/// assert_eq!(table.lookup(id).unwrap().display_name, "player");
/// ```
#[derive(Debug, Default, Clone)]
pub struct NodeTable {
    nodes: IndexMap<NodeId, NodeDescriptor>,
    next_id: u32,
}

impl NodeTable {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node and return its id
    ///
    /// Display names must be unique among registered nodes.
    pub fn register(
        &mut self,
        display_name: impl Into<String>,
        vars: Vec<VarDescriptor>,
    ) -> Result<NodeId> {
        let display_name = display_name.into();
        if self.nodes.values().any(|n| n.display_name == display_name) {
            return Err(Error::DuplicateNode(display_name));
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;

        let mut descriptor = NodeDescriptor::new(id, display_name);
        descriptor.vars = vars;
        self.nodes.insert(id, descriptor);
        Ok(id)
    }

    /// Remove a node; later lookups of its id fail
    pub fn remove(&mut self, id: NodeId) -> Result<NodeDescriptor> {
        self.nodes.shift_remove(&id).ok_or(Error::NodeNotFound(id))
    }

    /// Toggle whether a node takes part in reconciliation
    pub fn set_sync_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.nodes.get_mut(&id).ok_or(Error::NodeNotFound(id))?;
        node.sync_enabled = enabled;
        Ok(())
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node is registered
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over registered descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &NodeDescriptor> {
        self.nodes.values()
    }
}

impl NodeRegistry for NodeTable {
    fn lookup(&self, id: NodeId) -> Option<&NodeDescriptor> {
        self.nodes.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_assigns_positional_ids() {
        let mut table = NodeTable::new();
        let a = table.register("a", vec![]).unwrap();
        let b = table.register("b", vec![VarDescriptor::skip_rewinding("hp")]).unwrap();

        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert!(table.lookup(b).unwrap().vars[0].skip_rewinding);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut table = NodeTable::new();
        table.register("a", vec![]).unwrap();
        assert_eq!(
            table.register("a", vec![]),
            Err(Error::DuplicateNode("a".into()))
        );
    }

    #[test]
    fn test_remove_leaves_hole() {
        let mut table = NodeTable::new();
        let a = table.register("a", vec![]).unwrap();
        table.remove(a).unwrap();

        assert!(table.lookup(a).is_none());
        assert_eq!(table.register("b", vec![]).unwrap(), NodeId(1));
        assert_eq!(table.remove(a), Err(Error::NodeNotFound(a)));
    }

    #[test]
    fn test_set_sync_enabled() {
        let mut table = NodeTable::new();
        let a = table.register("a", vec![]).unwrap();
        table.set_sync_enabled(a, false).unwrap();

        assert!(!table.lookup(a).unwrap().sync_enabled);
        assert!(table.set_sync_enabled(NodeId(9), true).is_err());
    }

    #[test]
    fn test_descriptor_from_ron() {
        let descriptor: NodeDescriptor = ron::from_str(
            r#"(
                id: 3,
                display_name: "crate",
                vars: [(name: "pos"), (name: "tint", skip_rewinding: true)],
                sync_enabled: true,
            )"#,
        )
        .unwrap();

        assert_eq!(descriptor.id, NodeId(3));
        assert!(!descriptor.vars[0].skip_rewinding);
        assert!(descriptor.vars[1].skip_rewinding);
    }
}
