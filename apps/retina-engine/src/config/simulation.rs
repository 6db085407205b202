//! Simulation engine configuration.

use serde::{Deserialize, Serialize};

/// Defaults and limits applied by the Monte Carlo engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Runs used when a request does not specify any.
    #[serde(default = "default_runs")]
    pub default_runs: usize,
    /// Upper bound on runs per request.
    #[serde(default = "default_max_runs")]
    pub max_runs: usize,
    /// Seed used when a request does not specify one.
    #[serde(default = "default_seed")]
    pub default_seed: u64,
    /// Aggregate options on the rayon pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_runs: default_runs(),
            max_runs: default_max_runs(),
            default_seed: default_seed(),
            parallel: default_parallel(),
        }
    }
}

impl SimulationConfig {
    /// Configuration with no upper bound on runs.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            max_runs: usize::MAX,
            ..Self::default()
        }
    }
}

const fn default_runs() -> usize {
    1000
}

const fn default_max_runs() -> usize {
    1_000_000
}

const fn default_seed() -> u64 {
    42
}

const fn default_parallel() -> bool {
    true
}
