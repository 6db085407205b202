//! Simulation input and result records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::utility::UtilityParams;

use super::distribution::{Distribution, DistributionKind};
use super::stats::DistributionStats;

/// Side of an option's cash flow a scenario variable perturbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppliesTo {
    /// Perturbs expected return.
    Return,
    /// Perturbs cost.
    Cost,
}

/// A stochastic driver of option outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioVariable {
    /// Variable identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Which side of the cash flow the draw perturbs.
    pub applies_to: AppliesTo,
    /// Distribution family.
    pub dist: DistributionKind,
    /// Family parameters (exactly the keys the family requires).
    pub params: BTreeMap<String, f64>,
    /// Multiplier applied to every draw.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

const fn default_weight() -> f64 {
    1.0
}

impl ScenarioVariable {
    /// Validate parameters and weight, producing a typed distribution.
    pub fn distribution(&self) -> Result<Distribution> {
        if !self.weight.is_finite() {
            return Err(EngineError::configuration(
                "weight",
                format!("variable '{}' has non-finite weight {}", self.id, self.weight),
            ));
        }
        Distribution::from_params(self.dist, &self.params).map_err(|err| match err {
            EngineError::Configuration { field, message } => EngineError::Configuration {
                field,
                message: format!("variable '{}': {message}", self.id),
            },
            other => other,
        })
    }
}

/// One decision alternative being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOption {
    /// Option identifier.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Base expected return.
    pub expected_return: f64,
    /// Base cost.
    pub cost: f64,
    /// Extra up-front cost of risk mitigation, added to `cost`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mitigation_cost: Option<f64>,
    /// Decision horizon in months (metadata only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_months: Option<u32>,
}

impl DecisionOption {
    /// Create an option with no mitigation cost or horizon.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, expected_return: f64, cost: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            expected_return,
            cost,
            mitigation_cost: None,
            horizon_months: None,
        }
    }

    /// Base cost including mitigation.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.cost + self.mitigation_cost.unwrap_or(0.0)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let fields = [
            ("expectedReturn", Some(self.expected_return)),
            ("cost", Some(self.cost)),
            ("mitigationCost", self.mitigation_cost),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(EngineError::configuration(
                        field,
                        format!("option '{}' has non-finite {field} {value}", self.id),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Per-option simulation output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Option identifier.
    pub option_id: String,
    /// Option label.
    pub option_label: String,
    /// One outcome per run, in run order.
    pub outcomes: Vec<f64>,
    /// Expected value (mean outcome).
    pub ev: f64,
    /// 5th percentile outcome, capped at `ev`.
    pub var95: f64,
    /// Mean of outcomes at or below `var95`.
    pub cvar95: f64,
    /// `ev / (ev - var95)`; `None` when economic capital is zero.
    pub raroc: Option<f64>,
    /// Mean utility, when a utility model was supplied.
    pub expected_utility: Option<f64>,
    /// Certainty equivalent of `expected_utility`.
    pub certainty_equivalent: Option<f64>,
    /// Share of outcomes strictly below zero.
    pub probability_of_loss: f64,
    /// Distribution summary.
    pub stats: DistributionStats,
}

/// A complete simulation request, as read from a scenario document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Alternatives to compare.
    #[serde(default)]
    pub options: Vec<DecisionOption>,
    /// Scenario variables, sampled in this order.
    #[serde(default)]
    pub variables: Vec<ScenarioVariable>,
    /// Number of runs (engine default when absent).
    #[serde(default)]
    pub runs: Option<usize>,
    /// Seed (engine default when absent).
    #[serde(default)]
    pub seed: Option<u64>,
    /// Utility model (engine default when absent).
    #[serde(default)]
    pub utility: Option<UtilityParams>,
}

/// Results of a request plus the parameters actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Runs per option.
    pub runs: usize,
    /// Seed used.
    pub seed: u64,
    /// Utility model used, if any.
    pub utility: Option<UtilityParams>,
    /// Per-option results, in option order.
    pub results: Vec<SimulationResult>,
    /// Highest certainty equivalent, or highest EV without a utility model.
    pub recommended_option_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_deserializes_from_camel_case() {
        let json = r#"{
            "id": "demand",
            "name": "Demand shock",
            "appliesTo": "return",
            "dist": "normal",
            "params": {"mean": 0.0, "stdDev": 0.1},
            "weight": 0.5
        }"#;
        let var: ScenarioVariable = serde_json::from_str(json).unwrap();
        assert_eq!(var.applies_to, AppliesTo::Return);
        assert_eq!(var.dist, DistributionKind::Normal);
        assert_eq!(var.weight, 0.5);
        assert!(var.distribution().is_ok());
    }

    #[test]
    fn test_variable_weight_defaults_to_one() {
        let json = r#"{"id":"v","name":"v","appliesTo":"cost","dist":"uniform","params":{"min":0,"max":1}}"#;
        let var: ScenarioVariable = serde_json::from_str(json).unwrap();
        assert_eq!(var.weight, 1.0);
    }

    #[test]
    fn test_variable_error_mentions_id() {
        let json = r#"{"id":"fx","name":"FX","appliesTo":"cost","dist":"normal","params":{"mean":0}}"#;
        let var: ScenarioVariable = serde_json::from_str(json).unwrap();
        let err = var.distribution().unwrap_err();
        assert!(err.to_string().contains("variable 'fx'"));
        assert!(err.to_string().contains("[stdDev]"));
    }

    #[test]
    fn test_option_total_cost() {
        let mut option = DecisionOption::new("a", "A", 100.0, 50.0);
        assert_eq!(option.total_cost(), 50.0);
        option.mitigation_cost = Some(5.0);
        assert_eq!(option.total_cost(), 55.0);
    }

    #[test]
    fn test_option_rejects_nan() {
        let option = DecisionOption::new("a", "A", f64::NAN, 50.0);
        assert!(option.validate().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: SimulationRequest = serde_json::from_str("{}").unwrap();
        assert!(request.options.is_empty());
        assert!(request.runs.is_none());
        assert!(request.utility.is_none());
    }
}
