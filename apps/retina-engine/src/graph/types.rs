//! Goal dependency records and detector results.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Dependency relations declared for one goal.
///
/// "A depends on B" induces the edge `B → A`; "A enables B" induces `A → B`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDependency {
    /// Goal identifier.
    pub goal_id: String,
    /// Goals that must complete before this one.
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Goals this one unblocks.
    #[serde(default)]
    pub enables: Vec<String>,
}

impl GoalDependency {
    /// Create a dependency record.
    #[must_use]
    pub fn new<S: AsRef<str>>(goal_id: impl Into<String>, depends_on: &[S], enables: &[S]) -> Self {
        Self {
            goal_id: goal_id.into(),
            depends_on: depends_on.iter().map(|s| s.as_ref().to_string()).collect(),
            enables: enables.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Outcome of a cycle check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDetectionResult {
    /// Whether the edge set contains a cycle.
    pub has_cycle: bool,
    /// Cycle path in depends-on order (each id depends on the next),
    /// starting and ending at the repeated id.
    pub cycle: Option<Vec<String>>,
    /// Diagnostic message for display.
    pub message: String,
}

/// Outcome of dependency validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the proposed dependencies are acceptable.
    pub is_valid: bool,
    /// Reason for rejection.
    pub error: Option<String>,
    /// Machine-readable rejection code.
    pub code: Option<ErrorCode>,
    /// Offending cycle, when the rejection is a cycle.
    pub cycle: Option<Vec<String>>,
}

impl ValidationResult {
    /// Accepted dependencies.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
            code: None,
            cycle: None,
        }
    }

    /// Rejected dependencies.
    #[must_use]
    pub fn invalid(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
            code: Some(code),
            cycle: None,
        }
    }
}

/// Goals transitively connected to one goal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AffectedGoals {
    /// Transitive closure of `dependsOn`, in discovery order.
    pub upstream: Vec<String>,
    /// Goals reachable along graph edges, in discovery order.
    pub downstream: Vec<String>,
}
