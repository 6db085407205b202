//! Outcome distribution statistics.
//!
//! Percentiles use the nearest-rank rule on the ascending sorted outcomes:
//! the `p`th percentile is the value at 1-based rank `ceil(p/100 · n)`.
//! Hence `var95` is `sorted[ceil(0.05 · n) - 1]`, capped at the mean so that
//! economic capital is never negative, and `cvar95` averages every outcome at
//! or below that value (ties included).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Tail percentile used for `VaR` and `CVaR` (95% confidence).
pub const VAR_TAIL_PERCENT: u32 = 5;

/// Core risk figures for one outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    /// Mean outcome.
    pub ev: f64,
    /// 5th percentile outcome, capped at `ev`.
    pub var95: f64,
    /// Mean of outcomes at or below `var95`.
    pub cvar95: f64,
    /// `ev - var95`.
    pub economic_capital: f64,
    /// `ev / economic_capital`, `None` when capital is zero.
    pub raroc: Option<f64>,
}

/// Summary statistics of an outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionStats {
    /// Mean value.
    pub mean: f64,
    /// Median (average of the two middle values for even counts).
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
    /// 5th percentile.
    pub percentile_5: f64,
    /// 25th percentile.
    pub percentile_25: f64,
    /// 75th percentile.
    pub percentile_75: f64,
    /// 95th percentile.
    pub percentile_95: f64,
}

/// One equal-width histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Upper edge (inclusive for the last bin).
    pub upper: f64,
    /// Number of outcomes in the bin.
    pub count: usize,
}

/// Sort a copy of `values` ascending.
#[must_use]
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Arithmetic mean of ascending `sorted` values, clamped to `[min, max]`.
///
/// A degenerate distribution returns its single value exactly. Input holding
/// NaN yields NaN rather than a clamp against an unordered bound.
#[must_use]
pub fn mean_sorted(sorted: &[f64]) -> f64 {
    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return 0.0;
    };
    if first == last {
        return first;
    }
    let n = sorted.len() as f64;
    let mut mean = sorted.iter().sum::<f64>() / n;
    if mean.is_infinite() {
        // The running sum overflowed; scale each term first
        mean = sorted.iter().map(|v| v / n).sum();
    }
    if first.is_nan() || last.is_nan() || mean.is_nan() {
        return f64::NAN;
    }
    mean.clamp(first, last)
}

/// Nearest-rank percentile of ascending `sorted` values.
#[must_use]
pub fn percentile_sorted(sorted: &[f64], percent: u32) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let rank = (n * percent as usize).div_ceil(100).clamp(1, n);
    sorted[rank - 1]
}

/// `VaR95`, `CVaR95`, EV and RAROC of ascending `sorted` outcomes.
#[must_use]
pub fn risk_metrics(sorted: &[f64]) -> RiskMetrics {
    let ev = mean_sorted(sorted);
    // A heavy left tail can drag the mean below the 5th percentile
    let var95 = percentile_sorted(sorted, VAR_TAIL_PERCENT).min(ev);

    let tail: Vec<f64> = sorted.iter().copied().take_while(|v| *v <= var95).collect();
    let cvar95 = if tail.is_empty() {
        var95
    } else {
        mean_sorted(&tail).min(var95)
    };

    let economic_capital = ev - var95;
    RiskMetrics {
        ev,
        var95,
        cvar95,
        economic_capital,
        raroc: raroc(ev, economic_capital),
    }
}

/// Risk-adjusted return on capital; `None` when capital is numerically zero.
#[must_use]
pub fn raroc(ev: f64, economic_capital: f64) -> Option<f64> {
    let tolerance = f64::EPSILON * ev.abs().max(1.0) * 8.0;
    if economic_capital.abs() <= tolerance {
        None
    } else {
        Some(ev / economic_capital)
    }
}

/// Summary statistics of ascending `sorted` values.
#[must_use]
pub fn distribution_stats(sorted: &[f64]) -> DistributionStats {
    let n = sorted.len();
    if n == 0 {
        return DistributionStats::default();
    }

    let mean = mean_sorted(sorted);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let std_dev = if n > 1 {
        let sum_sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (sum_sq / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    DistributionStats {
        mean,
        median,
        std_dev,
        min: sorted[0],
        max: sorted[n - 1],
        percentile_5: percentile_sorted(sorted, 5),
        percentile_25: percentile_sorted(sorted, 25),
        percentile_75: percentile_sorted(sorted, 75),
        percentile_95: percentile_sorted(sorted, 95),
    }
}

/// Share of values strictly below zero.
#[must_use]
pub fn probability_of_loss(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| **v < 0.0).count() as f64 / values.len() as f64
}

/// Equal-width histogram over `[min, max]`.
///
/// A degenerate distribution yields a single bin holding every value.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    if bins == 0 {
        return Err(EngineError::configuration(
            "bins",
            "histogram needs at least one bin",
        ));
    }
    if values.is_empty() {
        return Ok(Vec::new());
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return Ok(vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }]);
    }

    let width = (max - min) / bins as f64;
    let mut result: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: (i as f64).mul_add(width, min),
            upper: if i + 1 == bins {
                max
            } else {
                ((i + 1) as f64).mul_add(width, min)
            },
            count: 0,
        })
        .collect();

    for &value in values {
        let index = (((value - min) / width).floor() as usize).min(bins - 1);
        result[index].count += 1;
    }

    Ok(result)
}
