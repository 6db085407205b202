// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::items_after_statements
    )
)]

//! Retina Engine - Rust Core Library
//!
//! Deterministic decision-support core for the Retina dashboard.
//!
//! # Components
//!
//! - `simulation`: Monte Carlo scenario simulation. Seeded sampling of
//!   normal, lognormal, triangular and uniform variables, per-option outcome
//!   composition and risk metrics (EV, VaR95, CVaR95, RAROC).
//! - `utility`: CARA, CRRA and Exponential utility with certainty equivalents.
//! - `graph`: goal dependency cycle detection, topological ordering and
//!   affected-goal queries.
//! - `credit`: partner credit risk scores normalized across a comparison set.
//!
//! Supporting modules:
//!
//! - `config`: YAML configuration with `${VAR:-default}` interpolation
//! - `error`: error taxonomy shared by every component
//! - `observability`: metrics through the `metrics` facade
//! - `telemetry`: tracing subscriber setup
//!
//! Every component is a pure computation over caller-supplied values; the
//! engine performs no I/O outside `config` and holds no state between calls.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Partner credit risk scoring.
pub mod credit;

/// Error types and codes.
pub mod error;

/// Goal dependency graph and cycle detection.
pub mod graph;

/// Metrics recording.
pub mod observability;

/// Monte Carlo simulation.
pub mod simulation;

/// Tracing subscriber setup.
pub mod telemetry;

/// Utility functions and certainty equivalents.
pub mod utility;

// =============================================================================
// Re-exports
// =============================================================================

pub use credit::{CreditRiskResult, Partner, PartnerSet, RiskLevel, compute_credit_risk_score};
pub use error::{EngineError, ErrorCode, ErrorResponse, Result};
pub use graph::{
    AffectedGoals, CycleDetectionResult, GoalDependency, ValidationResult, get_affected_goals,
    get_topological_order, validate_dependencies, would_create_cycle,
};
pub use simulation::{
    AppliesTo, DecisionOption, DistributionKind, MonteCarloBuilder, MonteCarloEngine,
    ScenarioVariable, SimulationReport, SimulationRequest, SimulationResult, run_simulation,
    sample_distribution,
};
pub use utility::{
    UtilityMode, UtilityParams, certainty_equivalent, compute_utility, expected_utility,
};
