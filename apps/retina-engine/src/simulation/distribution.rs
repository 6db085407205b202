//! Parametric distribution sampling.
//!
//! Scenario variables arrive as a family tag plus a loosely typed parameter
//! map. [`Distribution::from_params`] validates that map once, before any
//! sampling, and produces a typed variant. Sampling consumes the seeded
//! stream in a fixed pattern:
//!
//! - `normal`, `lognormal`: two uniforms (Box-Muller, cosine branch only)
//! - `triangular`, `uniform`: one uniform

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

use super::rng::{open_unit_f64, unit_f64};

/// Distribution family tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    /// Normal with `mean`, `stdDev`.
    Normal,
    /// Lognormal with `mean`, `stdDev` of the underlying normal.
    Lognormal,
    /// Triangular with `min`, `mode`, `max`.
    Triangular,
    /// Uniform with `min`, `max`.
    Uniform,
}

impl DistributionKind {
    /// Parameter keys this family requires, in canonical order.
    #[must_use]
    pub const fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::Normal | Self::Lognormal => &["mean", "stdDev"],
            Self::Triangular => &["min", "mode", "max"],
            Self::Uniform => &["min", "max"],
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Lognormal => write!(f, "lognormal"),
            Self::Triangular => write!(f, "triangular"),
            Self::Uniform => write!(f, "uniform"),
        }
    }
}

/// A validated parametric distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distribution {
    /// Normal distribution.
    Normal {
        /// Mean.
        mean: f64,
        /// Standard deviation.
        std_dev: f64,
    },
    /// Lognormal distribution (parameters of the underlying normal).
    Lognormal {
        /// Mean of the underlying normal.
        mean: f64,
        /// Standard deviation of the underlying normal.
        std_dev: f64,
    },
    /// Triangular distribution.
    Triangular {
        /// Lower bound.
        min: f64,
        /// Peak.
        mode: f64,
        /// Upper bound.
        max: f64,
    },
    /// Continuous uniform distribution.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
}

impl Distribution {
    /// Build a distribution from a family tag and parameter map.
    ///
    /// The map must contain exactly the keys the family requires; a missing
    /// or unknown key is a configuration error naming that key.
    pub fn from_params(kind: DistributionKind, params: &BTreeMap<String, f64>) -> Result<Self> {
        let required = kind.required_params();

        if let Some(unknown) = params.keys().find(|k| !required.contains(&k.as_str())) {
            return Err(EngineError::configuration(
                unknown.clone(),
                format!(
                    "unexpected parameter '{unknown}' for {kind} distribution (expected {})",
                    required.join(", ")
                ),
            ));
        }

        let get = |key: &str| -> Result<f64> {
            let value = *params.get(key).ok_or_else(|| {
                EngineError::configuration(
                    key,
                    format!("{kind} distribution requires parameter '{key}'"),
                )
            })?;
            if !value.is_finite() {
                return Err(EngineError::configuration(
                    key,
                    format!("parameter '{key}' must be finite, got {value}"),
                ));
            }
            Ok(value)
        };

        let dist = match kind {
            DistributionKind::Normal => Self::Normal {
                mean: get("mean")?,
                std_dev: get("stdDev")?,
            },
            DistributionKind::Lognormal => Self::Lognormal {
                mean: get("mean")?,
                std_dev: get("stdDev")?,
            },
            DistributionKind::Triangular => Self::Triangular {
                min: get("min")?,
                mode: get("mode")?,
                max: get("max")?,
            },
            DistributionKind::Uniform => Self::Uniform {
                min: get("min")?,
                max: get("max")?,
            },
        };

        dist.validate()?;
        Ok(dist)
    }

    /// Family tag of this distribution.
    #[must_use]
    pub const fn kind(&self) -> DistributionKind {
        match self {
            Self::Normal { .. } => DistributionKind::Normal,
            Self::Lognormal { .. } => DistributionKind::Lognormal,
            Self::Triangular { .. } => DistributionKind::Triangular,
            Self::Uniform { .. } => DistributionKind::Uniform,
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Normal { std_dev, .. } | Self::Lognormal { std_dev, .. } => {
                if std_dev < 0.0 {
                    return Err(EngineError::configuration(
                        "stdDev",
                        format!("stdDev must be non-negative, got {std_dev}"),
                    ));
                }
            }
            Self::Triangular { min, mode, max } => {
                if !(min <= mode && mode <= max) {
                    return Err(EngineError::configuration(
                        "mode",
                        format!("triangular requires min <= mode <= max, got {min}, {mode}, {max}"),
                    ));
                }
            }
            Self::Uniform { min, max } => {
                if min > max {
                    return Err(EngineError::configuration(
                        "max",
                        format!("uniform requires min <= max, got {min} > {max}"),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Draw one sample.
    pub fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            Self::Normal { mean, std_dev } => standard_normal(rng).mul_add(std_dev, mean),
            Self::Lognormal { mean, std_dev } => {
                standard_normal(rng).mul_add(std_dev, mean).exp()
            }
            Self::Triangular { min, mode, max } => {
                let u = unit_f64(rng);
                let range = max - min;
                if range == 0.0 {
                    return min;
                }
                let split = (mode - min) / range;
                if u < split {
                    min + (u * range * (mode - min)).sqrt()
                } else {
                    max - ((1.0 - u) * range * (max - mode)).sqrt()
                }
            }
            Self::Uniform { min, max } => unit_f64(rng).mul_add(max - min, min),
        }
    }
}

/// Validate a family/parameter pair and draw one sample from it.
pub fn sample_distribution<R: RngCore + ?Sized>(
    kind: DistributionKind,
    params: &BTreeMap<String, f64>,
    rng: &mut R,
) -> Result<f64> {
    Ok(Distribution::from_params(kind, params)?.sample(rng))
}

/// Box-Muller standard normal; always consumes two uniforms.
fn standard_normal<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    let u1 = open_unit_f64(rng);
    let u2 = unit_f64(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng::SeededRng;
    use test_case::test_case;

    fn params(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), *v)).collect()
    }

    fn sample_many(dist: &Distribution, n: usize) -> Vec<f64> {
        let mut rng = SeededRng::new(2024);
        (0..n).map(|_| dist.sample(&mut rng)).collect()
    }

    fn mean(values: &[f64]) -> f64 {
        values.iter().sum::<f64>() / values.len() as f64
    }

    #[test_case(DistributionKind::Normal, &[("mean", 0.0)], "stdDev" ; "normal missing std dev")]
    #[test_case(DistributionKind::Lognormal, &[("stdDev", 0.1)], "mean" ; "lognormal missing mean")]
    #[test_case(DistributionKind::Triangular, &[("min", 0.0), ("max", 1.0)], "mode" ; "triangular missing mode")]
    #[test_case(DistributionKind::Uniform, &[("min", 0.0)], "max" ; "uniform missing max")]
    fn test_missing_param_names_key(kind: DistributionKind, pairs: &[(&str, f64)], key: &str) {
        let err = Distribution::from_params(kind, &params(pairs)).unwrap_err();
        match err {
            EngineError::Configuration { field, message } => {
                assert_eq!(field, key);
                assert!(message.contains(key));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_param_rejected() {
        let err = Distribution::from_params(
            DistributionKind::Uniform,
            &params(&[("min", 0.0), ("max", 1.0), ("mean", 0.5)]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("unexpected parameter 'mean'"));
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let result = Distribution::from_params(
            DistributionKind::Normal,
            &params(&[("mean", 0.0), ("stdDev", -1.0)]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_triangular_ordering_rejected() {
        let result = Distribution::from_params(
            DistributionKind::Triangular,
            &params(&[("min", 0.0), ("mode", 2.0), ("max", 1.0)]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = Distribution::from_params(
            DistributionKind::Uniform,
            &params(&[("min", f64::NEG_INFINITY), ("max", 1.0)]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_normal_moments() {
        let dist = Distribution::Normal {
            mean: 5.0,
            std_dev: 2.0,
        };
        let draws = sample_many(&dist, 20_000);
        let m = mean(&draws);
        let var = draws.iter().map(|x| (x - m).powi(2)).sum::<f64>() / draws.len() as f64;
        assert!((m - 5.0).abs() < 0.1, "mean {m}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn test_lognormal_is_positive() {
        let dist = Distribution::Lognormal {
            mean: 0.0,
            std_dev: 0.5,
        };
        let draws = sample_many(&dist, 5_000);
        assert!(draws.iter().all(|x| *x > 0.0));
        // E[X] = exp(mu + sigma^2 / 2)
        let expected = (0.125_f64).exp();
        assert!((mean(&draws) - expected).abs() < 0.05);
    }

    #[test]
    fn test_triangular_bounds_and_mean() {
        let dist = Distribution::Triangular {
            min: 1.0,
            mode: 2.0,
            max: 6.0,
        };
        let draws = sample_many(&dist, 20_000);
        assert!(draws.iter().all(|x| (1.0..=6.0).contains(x)));
        assert!((mean(&draws) - 3.0).abs() < 0.05);
    }

    #[test]
    fn test_degenerate_triangular_returns_point() {
        let dist = Distribution::Triangular {
            min: 4.0,
            mode: 4.0,
            max: 4.0,
        };
        assert!(sample_many(&dist, 10).iter().all(|x| *x == 4.0));
    }

    #[test]
    fn test_uniform_bounds() {
        let dist = Distribution::Uniform {
            min: -2.0,
            max: 3.0,
        };
        let draws = sample_many(&dist, 10_000);
        assert!(draws.iter().all(|x| (-2.0..3.0).contains(x)));
        assert!((mean(&draws) - 0.5).abs() < 0.1);
    }

    #[test]
    fn test_zero_std_dev_normal_is_constant() {
        let dist = Distribution::Normal {
            mean: 1.5,
            std_dev: 0.0,
        };
        assert!(sample_many(&dist, 10).iter().all(|x| *x == 1.5));
    }

    #[test]
    fn test_normal_consumes_two_uniforms() {
        let dist = Distribution::Normal {
            mean: 0.0,
            std_dev: 1.0,
        };
        let mut a = SeededRng::new(5);
        let mut b = SeededRng::new(5);
        dist.sample(&mut a);
        b.next_u64();
        b.next_u64();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_distribution_helper() {
        let mut rng = SeededRng::new(1);
        let x = sample_distribution(
            DistributionKind::Uniform,
            &params(&[("min", 10.0), ("max", 10.0)]),
            &mut rng,
        )
        .unwrap();
        assert_eq!(x, 10.0);
    }
}
