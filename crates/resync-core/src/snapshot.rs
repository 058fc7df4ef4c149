//! Per-tick snapshots of synchronized node variables
//!
//! A [`Snapshot`] holds the value of every synchronized variable of every
//! node at one input tick, plus a list of global ("custom") values.
//!
//! # Example
//!
//! ```
//! use resync_core::{NodeId, Snapshot, Var};
//!
//! let mut snapshot = Snapshot::new(12);
//! snapshot.set_var(NodeId(0), 0, Var::new("pos", 5i64));
//! snapshot.custom_data.push(1.5f64.into());
//!
//! assert_eq!(snapshot.node_count(), 1);
//! assert_eq!(snapshot.var(NodeId(0), 0).unwrap().value.as_int(), Some(5));
//! ```

use crate::{NodeId, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input id reserved for recovery snapshots that patch values in place
pub const RECOVERY_INPUT_ID: u64 = 0;

/// One synchronized variable of one node at one tick
///
/// A `None` or empty name marks a slot that was not populated this tick
/// (for example, the server chose not to send it).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Var {
    /// Variable name, `None` when the slot is unset
    pub name: Option<String>,
    /// Variable value
    pub value: Value,
}

impl Var {
    /// Create a populated variable slot
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    /// Create an unset slot
    pub fn unset() -> Self {
        Self::default()
    }

    /// Whether this slot carries data
    ///
    /// An empty name counts as unset, same as `None`.
    pub fn is_set(&self) -> bool {
        self.name.as_deref().is_some_and(|name| !name.is_empty())
    }

    /// Name of the variable, or an empty string when unset
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// Synchronized state of one simulation tick
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Tick this snapshot belongs to; [`RECOVERY_INPUT_ID`] for recovery patches
    pub input_id: u64,
    /// Variables of each node, indexed by [`NodeId`]
    pub node_vars: Vec<Vec<Var>>,
    /// Global values not tied to any node
    pub custom_data: Vec<Value>,
}

impl Snapshot {
    /// Create an empty snapshot for the given input tick
    pub fn new(input_id: u64) -> Self {
        Self {
            input_id,
            node_vars: Vec::new(),
            custom_data: Vec::new(),
        }
    }

    /// Whether this snapshot is a recovery patch rather than a real tick
    pub fn is_recovery(&self) -> bool {
        self.input_id == RECOVERY_INPUT_ID
    }

    /// Number of node slots
    pub fn node_count(&self) -> usize {
        self.node_vars.len()
    }

    /// Variables of a node, if the snapshot has a slot for it
    pub fn vars(&self, node: NodeId) -> Option<&[Var]> {
        self.node_vars.get(node.index()).map(Vec::as_slice)
    }

    /// A single variable slot
    pub fn var(&self, node: NodeId, index: usize) -> Option<&Var> {
        self.vars(node).and_then(|vars| vars.get(index))
    }

    /// Grow the node list so it holds at least `count` nodes
    ///
    /// Never shrinks.
    pub fn ensure_node_count(&mut self, count: usize) {
        if self.node_vars.len() < count {
            self.node_vars.resize_with(count, Vec::new);
        }
    }

    /// Write a variable slot, growing the node and variable lists as needed
    pub fn set_var(&mut self, node: NodeId, index: usize, var: Var) {
        self.ensure_node_count(node.index() + 1);
        let vars = &mut self.node_vars[node.index()];
        if vars.len() <= index {
            vars.resize_with(index + 1, Var::unset);
        }
        vars[index] = var;
    }

    /// Replace the variable list of a node
    pub fn set_node_vars(&mut self, node: NodeId, vars: Vec<Var>) {
        self.ensure_node_count(node.index() + 1);
        self.node_vars[node.index()] = vars;
    }

    /// Apply a recovery patch in place
    ///
    /// Every populated slot of `patch` overwrites the matching slot here;
    /// unset slots leave this snapshot untouched. Returns the number of
    /// slots written.
    pub fn apply_patch(&mut self, patch: &Snapshot) -> usize {
        let mut written = 0;
        for (node_index, vars) in patch.node_vars.iter().enumerate() {
            // Slots past the id range cannot be addressed.
            let Some(node) = NodeId::from_index(node_index) else {
                break;
            };
            for (var_index, var) in vars.iter().enumerate() {
                if var.is_set() {
                    self.set_var(node, var_index, var.clone());
                    written += 1;
                }
            }
        }
        written
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot input ID: {}", self.input_id)?;
        for (node_index, vars) in self.node_vars.iter().enumerate() {
            write!(f, "\nNode Data: {}", node_index)?;
            for var in vars {
                write!(f, "\n|- Variable: {} = {}", var.name_str(), var.value)?;
            }
        }
        write!(f, "\nCUSTOM DATA:")?;
        for (i, value) in self.custom_data.iter().enumerate() {
            write!(f, "\n - {}: {}", i, value)?;
        }
        Ok(())
    }
}
