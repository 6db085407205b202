//! Core types for partner credit risk scoring.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A counterparty an option depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partner {
    /// Partner identifier.
    pub id: String,
    /// Amount at risk if the partner defaults (non-negative).
    pub credit_exposure: Decimal,
    /// How strongly the option relies on the partner, in `[0, 1]`.
    pub dependency_score: Decimal,
}

impl Partner {
    /// Create a partner.
    #[must_use]
    pub fn new(id: impl Into<String>, credit_exposure: Decimal, dependency_score: Decimal) -> Self {
        Self {
            id: id.into(),
            credit_exposure,
            dependency_score,
        }
    }
}

/// The partners of one option in a comparison set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartnerSet {
    /// Partners; absent means none.
    #[serde(default)]
    pub partners: Vec<Partner>,
}

impl From<Vec<Partner>> for PartnerSet {
    fn from(partners: Vec<Partner>) -> Self {
        Self { partners }
    }
}

/// Credit risk tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score below 33.
    Low,
    /// Score from 33 up to (not including) 67.
    Medium,
    /// Score of 67 or more.
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Result of scoring one partner set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditRiskResult {
    /// Normalized score in `[0, 100]`, rounded to two decimals.
    pub score: Decimal,
    /// Tier of the unrounded score.
    pub level: RiskLevel,
    /// `Σ exposure × dependency` before normalization.
    pub raw_score: Decimal,
    /// Sum of exposures.
    pub total_exposure: Decimal,
    /// Mean dependency score (zero for no partners).
    pub average_dependency: Decimal,
    /// Number of partners scored.
    pub partner_count: usize,
}
