//! Reconciliation configuration
//!
//! [`DiffOptions`] selects, per comparison, how thoroughly to scan and which
//! outputs to collect. [`ReconcileConfig`] wraps it with the settings the
//! [`Reconciler`](crate::Reconciler) needs and can be loaded from RON.

use crate::Result;
use resync_core::DEFAULT_EPSILON;
use serde::{Deserialize, Serialize};

/// How far a comparison scans after the first hard divergence
///
/// Both modes always return the same verdict; `Full` only gathers more
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiffMode {
    /// Stop at the first hard divergence
    #[default]
    Fast,
    /// Scan every node and custom value before returning
    Full,
}

impl DiffMode {
    /// Whether the scan stops at the first hard divergence
    pub fn stops_early(&self) -> bool {
        matches!(self, DiffMode::Fast)
    }
}

/// Per-call comparison options
///
/// # Example
///
/// ```
/// use resync_netcode::{DiffMode, DiffOptions};
///
/// let options = DiffOptions::full().with_diagnostics(true);
/// assert_eq!(options.mode, DiffMode::Full);
/// assert!(options.diagnostics);
/// assert!(!options.recovery);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    pub mode: DiffMode,
    /// Build a recovery snapshot for soft divergences
    pub recovery: bool,
    /// Collect human-readable diagnostic lines
    pub diagnostics: bool,
    /// Collect the ids of diverging nodes
    pub diverging_nodes: bool,
}

impl DiffOptions {
    /// Fast-path options with no outputs besides the verdict
    pub fn fast() -> Self {
        Self::default()
    }

    /// Full-scan options with no outputs besides the verdict
    pub fn full() -> Self {
        Self {
            mode: DiffMode::Full,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: DiffMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_recovery(mut self, enabled: bool) -> Self {
        self.recovery = enabled;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_diverging_nodes(mut self, enabled: bool) -> Self {
        self.diverging_nodes = enabled;
        self
    }
}

/// Configuration of a [`Reconciler`](crate::Reconciler)
///
/// Missing fields in RON input fall back to the defaults.
///
/// # Example
///
/// ```
/// use resync_netcode::{DiffMode, ReconcileConfig};
///
/// let config = ReconcileConfig::from_ron("(float_epsilon: 0.001, log_differences: true)").unwrap();
/// assert_eq!(config.float_epsilon, 0.001);
/// assert_eq!(config.diff.mode, DiffMode::Fast);
/// assert!(config.diff.recovery);
/// assert!(config.log_differences);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Tolerance of the default float comparator
    pub float_epsilon: f64,
    /// Options used for every comparison
    pub diff: DiffOptions,
    /// Emit each diagnostic line through `tracing`
    pub log_differences: bool,
}

impl ReconcileConfig {
    /// Parse a configuration from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    pub fn with_float_epsilon(mut self, epsilon: f64) -> Self {
        self.float_epsilon = epsilon;
        self
    }

    pub fn with_diff(mut self, diff: DiffOptions) -> Self {
        self.diff = diff;
        self
    }

    pub fn with_log_differences(mut self, enabled: bool) -> Self {
        self.log_differences = enabled;
        self
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            float_epsilon: DEFAULT_EPSILON,
            diff: DiffOptions::fast().with_recovery(true),
            log_differences: false,
        }
    }
}
