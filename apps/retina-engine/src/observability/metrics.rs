//! Engine metrics.
//!
//! # Example
//!
//! ```ignore
//! use retina_engine::observability::record_simulation;
//!
//! record_simulation(3, 1000, 0.012);
//! ```

use metrics::{counter, histogram};

// ============================================================================
// Simulation Metrics
// ============================================================================

/// Record a completed simulation.
///
/// # Arguments
///
/// * `options` - Number of options simulated
/// * `runs` - Runs per option
/// * `duration_seconds` - Wall time of the call in seconds
pub fn record_simulation(options: usize, runs: usize, duration_seconds: f64) {
    counter!("retina_simulations_total", "status" => "ok").increment(1);
    histogram!("retina_simulation_runs").record(runs as f64);
    histogram!("retina_simulation_options").record(options as f64);
    histogram!("retina_simulation_duration_seconds").record(duration_seconds);
}

/// Record a simulation rejected with an error.
///
/// # Arguments
///
/// * `code` - Error reason string (e.g., "CONFIGURATION_ERROR")
pub fn record_simulation_failure(code: &str) {
    counter!(
        "retina_simulations_total",
        "status" => "error",
        "code" => code.to_string()
    )
    .increment(1);
}

// ============================================================================
// Graph and Credit Metrics
// ============================================================================

/// Record a dependency cycle check.
pub fn record_cycle_check(has_cycle: bool) {
    let result = if has_cycle { "cycle" } else { "acyclic" };
    counter!("retina_cycle_checks_total", "result" => result).increment(1);
}

/// Record a credit risk score by tier.
pub fn record_credit_score(level: &str) {
    counter!("retina_credit_scores_total", "level" => level.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_simulation(2, 1000, 0.01);
        record_simulation_failure("CONFIGURATION_ERROR");
        record_cycle_check(true);
        record_credit_score("Low");
    }
}
