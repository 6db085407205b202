//! Goal dependency graph.
//!
//! Builds a directed graph from "depends on" / "enables" relations, detects
//! cycles before a goal's dependencies are persisted and orders goals
//! topologically. Cycles are reported as data, never as errors.

mod detector;
mod dependency_graph;
mod types;

pub use dependency_graph::DependencyGraph;
pub use detector::{
    get_affected_goals, get_topological_order, validate_dependencies, would_create_cycle,
};
pub use types::{AffectedGoals, CycleDetectionResult, GoalDependency, ValidationResult};
