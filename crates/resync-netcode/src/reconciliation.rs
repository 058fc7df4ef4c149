//! Server state reconciliation
//!
//! Turns the verdict of a snapshot comparison into the correction the
//! synchronizer has to perform.

use crate::diff::{compare_snapshots, DiffContext, DiffReport};
use crate::{Error, ReconcileConfig, Result};
use resync_core::{
    ApproxComparator, DisplayStringifier, NodeId, NodeRegistry, Snapshot, Stringifier,
    ValueComparator,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// What the client has to do after a server snapshot was checked
#[derive(Debug, Clone, PartialEq)]
pub enum Correction {
    /// Prediction matched the server
    InSync,
    /// Apply this recovery snapshot in place, no resimulation needed
    Patch(Snapshot),
    /// Discard predicted ticks and resimulate from the server state
    Rewind {
        /// Nodes that diverged; empty unless tracking is enabled
        diverging_nodes: Vec<NodeId>,
    },
}

impl Correction {
    /// Whether this correction requires resimulation
    pub fn needs_rewind(&self) -> bool {
        matches!(self, Correction::Rewind { .. })
    }
}

/// Counters of reconciliation outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileStats {
    pub checks: u64,
    pub in_sync: u64,
    pub patches: u64,
    pub rewinds: u64,
}

/// Reconciler for server snapshots
///
/// Owns the comparator and stringifier injected into every comparison. The
/// node registry is passed per call since the synchronizer owns it.
///
/// # Example
///
/// ```
/// use resync_core::{NodeTable, Snapshot, Var, VarDescriptor};
/// use resync_netcode::{Correction, ReconcileConfig, Reconciler};
///
/// let mut registry = NodeTable::new();
/// let ball = registry
///     .register("ball", vec![VarDescriptor::skip_rewinding("color")])
///     .unwrap();
///
/// let mut server = Snapshot::new(30);
/// server.set_var(ball, 0, Var::new("color", "red"));
/// let mut client = Snapshot::new(30);
/// client.set_var(ball, 0, Var::new("color", "blue"));
///
/// let mut reconciler = Reconciler::new(ReconcileConfig::default());
/// match reconciler.reconcile(&registry, &server, &client).unwrap() {
///     Correction::Patch(patch) => {
///         client.apply_patch(&patch);
///     }
///     other => panic!("unexpected correction: {:?}", other),
/// }
/// assert_eq!(client.var(ball, 0), server.var(ball, 0));
/// ```
pub struct Reconciler<C = ApproxComparator, S = DisplayStringifier> {
    config: ReconcileConfig,
    comparator: C,
    stringifier: S,
    stats: ReconcileStats,
}

impl Reconciler {
    /// Create a reconciler with the default comparator and stringifier
    ///
    /// The comparator uses `config.float_epsilon` as its tolerance.
    pub fn new(config: ReconcileConfig) -> Self {
        let comparator = ApproxComparator::new(config.float_epsilon);
        Self::with_parts(config, comparator, DisplayStringifier)
    }
}

impl<C: ValueComparator, S: Stringifier> Reconciler<C, S> {
    /// Create a reconciler with a custom comparator and stringifier
    pub fn with_parts(config: ReconcileConfig, comparator: C, stringifier: S) -> Self {
        Self {
            config,
            comparator,
            stringifier,
            stats: ReconcileStats::default(),
        }
    }

    /// Compare two snapshots with the configured options
    ///
    /// Does not check input alignment and does not touch the statistics.
    pub fn diff<R: NodeRegistry>(
        &self,
        registry: &R,
        server: &Snapshot,
        client: &Snapshot,
    ) -> DiffReport {
        let ctx = DiffContext::new(registry, &self.comparator, &self.stringifier);
        compare_snapshots(&ctx, server, client, self.config.diff)
    }

    /// Check a client-predicted snapshot against the server snapshot
    ///
    /// Both snapshots must carry the same input id.
    pub fn reconcile<R: NodeRegistry>(
        &mut self,
        registry: &R,
        server: &Snapshot,
        client: &Snapshot,
    ) -> Result<Correction> {
        if server.input_id != client.input_id {
            warn!(
                server = server.input_id,
                client = client.input_id,
                "refusing to reconcile misaligned snapshots"
            );
            return Err(Error::InputMismatch {
                server: server.input_id,
                client: client.input_id,
            });
        }

        let report = self.diff(registry, server, client);
        self.stats.checks += 1;

        if self.config.log_differences {
            for line in &report.diagnostics {
                trace!(input_id = server.input_id, "{}", line);
            }
        }

        let correction = if !report.equal {
            self.stats.rewinds += 1;
            Correction::Rewind {
                diverging_nodes: report.diverging_nodes.unwrap_or_default(),
            }
        } else if let Some(patch) = report.recovery.filter(Snapshot::is_recovery) {
            self.stats.patches += 1;
            Correction::Patch(patch)
        } else {
            self.stats.in_sync += 1;
            Correction::InSync
        };

        debug!(
            input_id = server.input_id,
            rewind = correction.needs_rewind(),
            patch = matches!(correction, Correction::Patch(_)),
            "reconciled snapshot"
        );

        Ok(correction)
    }

    /// Get the configuration
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Get the outcome counters
    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    /// Reset the outcome counters
    pub fn reset_stats(&mut self) {
        self.stats = ReconcileStats::default();
    }
}
