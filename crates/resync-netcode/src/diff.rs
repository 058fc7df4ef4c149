//! Snapshot comparison
//!
//! Compares a server snapshot against the client-predicted snapshot of the
//! same input tick and decides whether the client diverged.
//!
//! A mismatch on a variable flagged `skip_rewinding` is a *soft* divergence:
//! the server value goes into a recovery snapshot (input id 0) that the
//! caller applies in place. Any other mismatch is a *hard* divergence and
//! makes the verdict false, which means the client has to rewind.
//!
//! The server may omit data (shorter variable lists, unset slots) without
//! that counting as a divergence. The client may not: a node the server
//! describes but the client lacks is a hard divergence.

use crate::{DiffMode, DiffOptions};
use resync_core::{
    NodeDescriptor, NodeId, NodeRegistry, Snapshot, Stringifier, Value, ValueComparator, Var,
    RECOVERY_INPUT_ID,
};

/// External collaborators of one comparison
#[derive(Clone, Copy)]
pub struct DiffContext<'a> {
    pub registry: &'a dyn NodeRegistry,
    pub comparator: &'a dyn ValueComparator,
    pub stringifier: &'a dyn Stringifier,
}

impl<'a> DiffContext<'a> {
    pub fn new(
        registry: &'a dyn NodeRegistry,
        comparator: &'a dyn ValueComparator,
        stringifier: &'a dyn Stringifier,
    ) -> Self {
        Self {
            registry,
            comparator,
            stringifier,
        }
    }
}

/// Outcome of [`compare_snapshots`]
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    /// False when at least one hard divergence was found
    pub equal: bool,
    /// Recovery snapshot, present when requested
    pub recovery: Option<Snapshot>,
    /// Diagnostic lines in detection order; empty unless requested
    pub diagnostics: Vec<String>,
    /// Diverging node ids, present when requested
    pub diverging_nodes: Option<Vec<NodeId>>,
}

impl DiffReport {
    /// The recovery snapshot, only if it actually carries patched values
    pub fn recovery_patch(&self) -> Option<&Snapshot> {
        self.recovery.as_ref().filter(|snapshot| snapshot.is_recovery())
    }
}

/// Compare one node's variables between the server and client snapshots
///
/// Only indices present on both sides are checked, and an unset server slot
/// is never a divergence. Soft divergences are written into `recovery` at
/// the node's id and never make the result false. Returns false iff a hard
/// divergence was found; in [`DiffMode::Fast`] it returns at the first one.
pub fn compare_node_vars(
    ctx: &DiffContext<'_>,
    descriptor: &NodeDescriptor,
    server_vars: &[Var],
    client_vars: &[Var],
    mode: DiffMode,
    mut recovery: Option<&mut Snapshot>,
    mut diagnostics: Option<&mut Vec<String>>,
) -> bool {
    let mut is_equal = true;

    // `zip` stops at the shorter list: variables the server did not
    // describe are trusted as they are on the client.
    for (index, (server_var, client_var)) in server_vars.iter().zip(client_vars).enumerate() {
        if !server_var.is_set() {
            continue;
        }

        let different = !client_var.is_set()
            || !ctx.comparator.compare(&server_var.value, &client_var.value);
        if !different {
            continue;
        }

        let var_descriptor = descriptor.var(index);
        let skip_rewinding = var_descriptor.is_some_and(|v| v.skip_rewinding);

        if let Some(lines) = diagnostics.as_deref_mut() {
            let var_name = var_descriptor.map_or("", |v| v.name.as_str());
            lines.push(difference_line(
                ctx,
                skip_rewinding,
                index,
                var_name,
                server_var,
                client_var,
            ));
        }

        if skip_rewinding {
            if let Some(patch) = recovery.as_deref_mut() {
                patch.set_var(descriptor.id, index, server_var.clone());
                patch.input_id = RECOVERY_INPUT_ID;
            }
        } else {
            is_equal = false;
            if mode.stops_early() {
                return false;
            }
        }
    }

    is_equal
}

fn difference_line(
    ctx: &DiffContext<'_>,
    skip_rewinding: bool,
    index: usize,
    var_name: &str,
    server_var: &Var,
    client_var: &Var,
) -> String {
    format!(
        "{}Difference found on var #{} {} Server value: `{}` Client value: `{}`.    [Server name: `{}` Client name: `{}`].",
        if skip_rewinding { "[NO REWIND] " } else { "" },
        index,
        var_name,
        ctx.stringifier.render(&server_var.value),
        ctx.stringifier.render(&client_var.value),
        server_var.name_str(),
        client_var.name_str(),
    )
}

/// Collected outputs of one snapshot comparison
struct Outputs {
    recovery: Option<Snapshot>,
    diagnostics: Option<Vec<String>>,
    diverging_nodes: Option<Vec<NodeId>>,
}

impl Outputs {
    fn note(&mut self, line: impl FnOnce() -> String) {
        if let Some(lines) = self.diagnostics.as_mut() {
            lines.push(line());
        }
    }

    fn mark_diverging(&mut self, id: NodeId) {
        if let Some(nodes) = self.diverging_nodes.as_mut() {
            nodes.push(id);
        }
    }
}

/// Compare a server snapshot with the client snapshot of the same tick
///
/// # Example
///
/// ```
/// use resync_core::{
///     ApproxComparator, DisplayStringifier, NodeId, NodeTable, Snapshot, Var, VarDescriptor,
/// };
/// use resync_netcode::{compare_snapshots, DiffContext, DiffOptions};
///
/// let mut registry = NodeTable::new();
/// let player = registry.register("player", vec![VarDescriptor::new("pos")]).unwrap();
///
/// let mut server = Snapshot::new(8);
/// server.set_var(player, 0, Var::new("pos", 5i64));
/// let mut client = Snapshot::new(8);
/// client.set_var(player, 0, Var::new("pos", 7i64));
///
/// let cmp = ApproxComparator::default();
/// let ctx = DiffContext::new(&registry, &cmp, &DisplayStringifier);
/// let report = compare_snapshots(&ctx, &server, &client, DiffOptions::full().with_diagnostics(true));
///
/// assert!(!report.equal);
/// assert!(report.diagnostics[0].contains("var #0 pos"));
/// ```
pub fn compare_snapshots(
    ctx: &DiffContext<'_>,
    server: &Snapshot,
    client: &Snapshot,
    options: DiffOptions,
) -> DiffReport {
    let mut outputs = Outputs {
        recovery: options.recovery.then(|| {
            let mut patch = Snapshot::new(server.input_id);
            patch.ensure_node_count(server.node_count().max(client.node_count()));
            patch
        }),
        diagnostics: options.diagnostics.then(Vec::new),
        diverging_nodes: options.diverging_nodes.then(Vec::new),
    };

    let equal = scan(ctx, server, client, options.mode, &mut outputs);

    DiffReport {
        equal,
        recovery: outputs.recovery,
        diagnostics: outputs.diagnostics.unwrap_or_default(),
        diverging_nodes: outputs.diverging_nodes,
    }
}

fn scan(
    ctx: &DiffContext<'_>,
    server: &Snapshot,
    client: &Snapshot,
    mode: DiffMode,
    outputs: &mut Outputs,
) -> bool {
    let mut is_equal = compare_custom_data(ctx, &server.custom_data, &client.custom_data, mode, outputs);
    if !is_equal && mode.stops_early() {
        return false;
    }

    for (node_index, server_vars) in server.node_vars.iter().enumerate() {
        // No registry entry can exist past the id range.
        let Some(id) = NodeId::from_index(node_index) else {
            break;
        };
        let descriptor = match ctx.registry.lookup(id) {
            Some(descriptor) if descriptor.sync_enabled => descriptor,
            _ => continue,
        };

        let different = match client.node_vars.get(node_index) {
            None => {
                outputs.note(|| {
                    format!(
                        "Difference detected: The client snapshot doesn't contain this node: {}",
                        descriptor.display_name
                    )
                });
                true
            }
            Some(client_vars) => {
                let different = !compare_node_vars(
                    ctx,
                    descriptor,
                    server_vars,
                    client_vars,
                    mode,
                    outputs.recovery.as_mut(),
                    outputs.diagnostics.as_mut(),
                );
                if different {
                    outputs.note(|| {
                        format!(
                            "Difference detected: The node status on the client snapshot is different. NODE: {}",
                            descriptor.display_name
                        )
                    });
                }
                different
            }
        };

        if different {
            outputs.mark_diverging(id);
            is_equal = false;
            if mode.stops_early() {
                return false;
            }
        }
    }

    is_equal
}

fn compare_custom_data(
    ctx: &DiffContext<'_>,
    server: &[Value],
    client: &[Value],
    mode: DiffMode,
    outputs: &mut Outputs,
) -> bool {
    if server.len() != client.len() {
        outputs.note(|| {
            format!(
                "Difference detected: custom data is different (server has {} entries, client has {}).",
                server.len(),
                client.len()
            )
        });
        return false;
    }

    let mut is_equal = true;
    for (index, (a, b)) in server.iter().zip(client).enumerate() {
        if !ctx.comparator.compare(a, b) {
            outputs.note(|| {
                format!("Difference detected: custom data is different at index `{}`.", index)
            });
            is_equal = false;
            if mode.stops_early() {
                return false;
            }
        }
    }
    is_equal
}
