//! Cycle detection and ordering over goal dependencies.
//!
//! Every call builds a fresh [`DependencyGraph`] from the supplied records;
//! nothing is cached between calls.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::ErrorCode;
use crate::observability::record_cycle_check;

use super::dependency_graph::DependencyGraph;
use super::types::{AffectedGoals, CycleDetectionResult, GoalDependency, ValidationResult};

/// Check whether replacing `goal_id`'s relations with the given lists would
/// introduce a cycle.
///
/// Existing records for `goal_id` are ignored; the proposed relations take
/// their place. The reported path is in depends-on order: each id depends on
/// the one after it, and the first id is repeated at the end.
#[must_use]
pub fn would_create_cycle<S: AsRef<str>>(
    existing: &[GoalDependency],
    goal_id: &str,
    depends_on: &[S],
    enables: &[S],
) -> CycleDetectionResult {
    let proposed = GoalDependency::new(goal_id, depends_on, enables);

    let mut graph = DependencyGraph::new();
    graph.add_dependency(&proposed);
    for dependency in existing.iter().filter(|d| d.goal_id != goal_id) {
        graph.add_dependency(dependency);
    }

    let starts: Vec<usize> = graph.index_of(goal_id).into_iter().collect();
    let cycle = graph.find_cycle_from(&starts).map(|path| {
        let mut ids = graph.ids_of(&path);
        ids.reverse();
        ids
    });

    record_cycle_check(cycle.is_some());

    match cycle {
        Some(ids) => {
            let message = format!("Circular dependency detected: {}", ids.join(" -> "));
            debug!(goal_id, cycle = ?ids, "Dependency cycle detected");
            CycleDetectionResult {
                has_cycle: true,
                cycle: Some(ids),
                message,
            }
        }
        None => {
            debug!(
                goal_id,
                nodes = graph.node_count(),
                edges = graph.edge_count(),
                "No dependency cycle"
            );
            CycleDetectionResult {
                has_cycle: false,
                cycle: None,
                message: "No circular dependencies detected".to_string(),
            }
        }
    }
}

/// Validate a goal's proposed relations before they are persisted.
///
/// Rejects blank ids, self-references and ids listed as both dependency and
/// enabled goal, then rejects any relation set that closes a cycle.
#[must_use]
pub fn validate_dependencies<S: AsRef<str>>(
    goal_id: &str,
    depends_on: &[S],
    enables: &[S],
    existing: &[GoalDependency],
) -> ValidationResult {
    if goal_id.trim().is_empty() {
        return ValidationResult::invalid(ErrorCode::ConfigurationError, "Goal id must not be blank");
    }

    if depends_on
        .iter()
        .chain(enables)
        .any(|id| id.as_ref().trim().is_empty())
    {
        return ValidationResult::invalid(
            ErrorCode::ConfigurationError,
            "Related goal ids must not be blank",
        );
    }

    if depends_on.iter().any(|id| id.as_ref() == goal_id) {
        return ValidationResult::invalid(
            ErrorCode::ConfigurationError,
            format!("Goal '{goal_id}' cannot depend on itself"),
        );
    }
    if enables.iter().any(|id| id.as_ref() == goal_id) {
        return ValidationResult::invalid(
            ErrorCode::ConfigurationError,
            format!("Goal '{goal_id}' cannot enable itself"),
        );
    }

    let upstream: HashSet<&str> = depends_on.iter().map(|id| id.as_ref()).collect();
    if let Some(both) = enables
        .iter()
        .map(|id| id.as_ref())
        .find(|id| upstream.contains(id))
    {
        return ValidationResult::invalid(
            ErrorCode::ConfigurationError,
            format!("Goal '{both}' cannot be both a dependency and enabled by '{goal_id}'"),
        );
    }

    let check = would_create_cycle(existing, goal_id, depends_on, enables);
    if check.has_cycle {
        return ValidationResult {
            cycle: check.cycle,
            ..ValidationResult::invalid(ErrorCode::CycleDetected, check.message)
        };
    }

    ValidationResult::valid()
}

/// Order every goal so that each comes after everything it depends on.
///
/// Returns `None` when the records contain a cycle.
#[must_use]
pub fn get_topological_order(dependencies: &[GoalDependency]) -> Option<Vec<String>> {
    let graph = DependencyGraph::from_dependencies(dependencies);
    let Some(order) = graph.topological_order() else {
        debug!(
            goals = graph.node_count(),
            "Topological order unavailable, dependencies contain a cycle"
        );
        return None;
    };
    Some(graph.ids_of(&order))
}

/// Goals transitively connected to `goal_id`, excluding `goal_id` itself.
///
/// `upstream` follows the declared `dependsOn` lists; `downstream` follows
/// graph edges forward, so it also includes goals reached through `enables`.
/// Both terminate on cyclic input.
#[must_use]
pub fn get_affected_goals(goal_id: &str, dependencies: &[GoalDependency]) -> AffectedGoals {
    let mut declared: HashMap<&str, Vec<&str>> = HashMap::new();
    for dependency in dependencies {
        declared
            .entry(dependency.goal_id.as_str())
            .or_default()
            .extend(dependency.depends_on.iter().map(String::as_str));
    }

    let mut seen: HashSet<&str> = HashSet::from([goal_id]);
    let mut queue = VecDeque::from([goal_id]);
    let mut upstream = Vec::new();
    while let Some(current) = queue.pop_front() {
        for &next in declared.get(current).map_or(&[][..], Vec::as_slice) {
            if seen.insert(next) {
                upstream.push(next.to_string());
                queue.push_back(next);
            }
        }
    }

    let graph = DependencyGraph::from_dependencies(dependencies);
    let downstream = graph
        .index_of(goal_id)
        .map(|start| graph.ids_of(&graph.reachable_from(start)))
        .unwrap_or_default();

    AffectedGoals {
        upstream,
        downstream,
    }
}
