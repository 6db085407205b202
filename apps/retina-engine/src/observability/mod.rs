//! Observability module for engine metrics.
//!
//! Metrics go through the `metrics` facade. The library never installs a
//! recorder; without one every call here is a no-op.

mod metrics;

pub use metrics::{
    record_credit_score, record_cycle_check, record_simulation, record_simulation_failure,
};
