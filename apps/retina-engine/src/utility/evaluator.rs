//! Utility evaluation and certainty-equivalent inversion.

use crate::error::{EngineError, Result};

use super::types::{UtilityMode, UtilityParams};

/// Coefficients closer to zero than this are treated as risk-neutral.
const RISK_NEUTRAL_EPSILON: f64 = 1e-12;

/// Compute the utility of a single outcome.
///
/// # Errors
///
/// Returns a configuration error for invalid parameters and a domain error
/// when the outcome lies outside the model's domain (CRRA on a non-positive
/// normalized outcome) or the utility overflows.
pub fn compute_utility(outcome: f64, params: &UtilityParams) -> Result<f64> {
    params.validate()?;
    evaluate(outcome, params)
}

/// Mean utility over a set of outcome draws.
pub fn expected_utility(outcomes: &[f64], params: &UtilityParams) -> Result<f64> {
    params.validate()?;
    if outcomes.is_empty() {
        return Err(EngineError::configuration(
            "outcomes",
            "expected utility needs at least one outcome",
        ));
    }

    let mut sum = 0.0;
    for &outcome in outcomes {
        sum += evaluate(outcome, params)?;
    }
    let mean = sum / outcomes.len() as f64;

    if !mean.is_finite() {
        return Err(EngineError::domain(
            params.mode,
            "expected utility is not finite",
        ));
    }
    Ok(mean)
}

/// Outcome whose certain utility equals `expected_utility`.
///
/// Exact inverse of [`compute_utility`] for the chosen model.
pub fn certainty_equivalent(expected_utility: f64, params: &UtilityParams) -> Result<f64> {
    params.validate()?;
    if !expected_utility.is_finite() {
        return Err(EngineError::domain(
            params.mode,
            format!("cannot invert non-finite utility {expected_utility}"),
        ));
    }

    let out_of_range = || {
        EngineError::domain(
            params.mode,
            format!(
                "utility {expected_utility} is outside the range of the model with a = {}",
                params.a
            ),
        )
    };

    let value = match params.mode {
        UtilityMode::Cara => {
            exponential_inverse(expected_utility, params.a).ok_or_else(out_of_range)?
                * params.scale
        }
        UtilityMode::Exponential => {
            exponential_inverse(expected_utility, params.a).ok_or_else(out_of_range)?
        }
        UtilityMode::Crra => {
            let k = 1.0 - params.a;
            let normalized = if k.abs() < RISK_NEUTRAL_EPSILON {
                expected_utility.exp()
            } else {
                let arg = k * expected_utility;
                if arg <= -1.0 {
                    return Err(out_of_range());
                }
                (arg.ln_1p() / k).exp()
            };
            normalized * params.scale
        }
    };

    if !value.is_finite() {
        return Err(out_of_range());
    }
    Ok(value)
}

fn evaluate(outcome: f64, params: &UtilityParams) -> Result<f64> {
    if !outcome.is_finite() {
        return Err(EngineError::domain(
            params.mode,
            format!("outcome must be finite, got {outcome}"),
        ));
    }

    let value = match params.mode {
        UtilityMode::Cara => exponential_utility(outcome / params.scale, params.a),
        UtilityMode::Exponential => exponential_utility(outcome, params.a),
        UtilityMode::Crra => {
            let normalized = outcome / params.scale;
            if normalized <= 0.0 {
                return Err(EngineError::domain(
                    UtilityMode::Crra,
                    format!("normalized outcome must be positive, got {normalized}"),
                ));
            }
            let k = 1.0 - params.a;
            if k.abs() < RISK_NEUTRAL_EPSILON {
                normalized.ln()
            } else {
                (k * normalized.ln()).exp_m1() / k
            }
        }
    };

    if !value.is_finite() {
        return Err(EngineError::domain(
            params.mode,
            format!("utility overflows for outcome {outcome}"),
        ));
    }
    Ok(value)
}

/// `(1 - e^(-a·y)) / a`, linear at `a = 0`.
fn exponential_utility(y: f64, a: f64) -> f64 {
    if a.abs() < RISK_NEUTRAL_EPSILON {
        y
    } else {
        -(-a * y).exp_m1() / a
    }
}

/// Inverse of [`exponential_utility`]; `None` when `1 - a·u <= 0`.
fn exponential_inverse(u: f64, a: f64) -> Option<f64> {
    if a.abs() < RISK_NEUTRAL_EPSILON {
        return Some(u);
    }
    let arg = -a * u;
    if arg <= -1.0 {
        return None;
    }
    Some(-arg.ln_1p() / a)
}
