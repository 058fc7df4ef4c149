//! Identity types for synchronized nodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Positional identifier of a synchronized node
///
/// The id doubles as the index of the node's variable list inside a
/// [`Snapshot`](crate::Snapshot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new node ID
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Index of this node inside a snapshot's node list
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Node id for a snapshot list index, `None` past the id range
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node:{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42usize);
        assert_eq!(format!("{}", id), "node:42");
    }

    #[test]
    fn test_node_id_from_index() {
        assert_eq!(NodeId::from_index(7), Some(NodeId(7)));
        assert_eq!(NodeId::from_index(u32::MAX as usize), Some(NodeId(u32::MAX)));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_node_id_from_index_overflow() {
        assert_eq!(NodeId::from_index(u32::MAX as usize + 1), None);
        assert_eq!(NodeId::from_index(usize::MAX), None);
    }

    #[test]
    fn test_node_id_ordering() {
        assert!(NodeId::from(1) < NodeId::from(2));
    }
}
