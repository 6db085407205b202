//! Utility model parameters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, Result};

/// Risk-preference model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UtilityMode {
    /// Constant absolute risk aversion.
    #[default]
    #[serde(rename = "CARA")]
    Cara,
    /// Constant relative risk aversion.
    #[serde(rename = "CRRA")]
    Crra,
    /// Exponential utility on raw outcomes.
    #[serde(rename = "Exponential")]
    Exponential,
}

impl fmt::Display for UtilityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cara => write!(f, "CARA"),
            Self::Crra => write!(f, "CRRA"),
            Self::Exponential => write!(f, "Exponential"),
        }
    }
}

/// Parameters of a utility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilityParams {
    /// Utility model.
    pub mode: UtilityMode,
    /// Risk-aversion coefficient.
    pub a: f64,
    /// Outcome normalization divisor.
    pub scale: f64,
}

impl Default for UtilityParams {
    fn default() -> Self {
        Self {
            mode: UtilityMode::Cara,
            a: 0.5,
            scale: 100.0,
        }
    }
}

impl UtilityParams {
    /// Create utility parameters.
    #[must_use]
    pub const fn new(mode: UtilityMode, a: f64, scale: f64) -> Self {
        Self { mode, a, scale }
    }

    /// Check the coefficient and scale.
    pub fn validate(&self) -> Result<()> {
        if !self.a.is_finite() {
            return Err(EngineError::configuration(
                "a",
                format!("risk-aversion coefficient must be finite, got {}", self.a),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(EngineError::configuration(
                "scale",
                format!("scale must be a positive finite number, got {}", self.scale),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&UtilityMode::Crra).unwrap();
        assert_eq!(json, "\"CRRA\"");

        let mode: UtilityMode = serde_json::from_str("\"Exponential\"").unwrap();
        assert_eq!(mode, UtilityMode::Exponential);
    }

    #[test]
    fn test_validate_rejects_zero_scale() {
        let params = UtilityParams::new(UtilityMode::Cara, 0.5, 0.0);
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("scale"));
    }

    #[test]
    fn test_validate_rejects_nan_coefficient() {
        let params = UtilityParams::new(UtilityMode::Crra, f64::NAN, 1.0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_default_params_are_valid() {
        assert!(UtilityParams::default().validate().is_ok());
    }
}
