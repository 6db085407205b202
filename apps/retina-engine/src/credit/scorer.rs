//! Relative credit risk scoring.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::observability::record_credit_score;

use super::types::{CreditRiskResult, Partner, PartnerSet, RiskLevel};

/// Scores at or above this are `Medium`.
pub const MEDIUM_THRESHOLD: Decimal = dec!(33);
/// Scores at or above this are `High`.
pub const HIGH_THRESHOLD: Decimal = dec!(67);

const MAX_SCORE: Decimal = dec!(100);

/// Score `partners` relative to the riskiest set in `comparison`.
///
/// The raw score is `Σ exposure × dependency`. It is scaled so the largest
/// raw score among `comparison` and `partners` maps to 100; when every raw
/// score is zero the result is 0. The tier is taken from the unrounded
/// score.
pub fn compute_credit_risk_score(
    partners: &[Partner],
    comparison: &[PartnerSet],
) -> Result<CreditRiskResult> {
    let raw = raw_score(partners)?;

    let mut ceiling = raw;
    for set in comparison {
        ceiling = ceiling.max(raw_score(&set.partners)?);
    }

    let score = if ceiling.is_zero() {
        Decimal::ZERO
    } else {
        (raw / ceiling * MAX_SCORE).min(MAX_SCORE)
    };
    let level = risk_level(score);

    let total_exposure = partners
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.credit_exposure))
        .ok_or_else(|| overflow("creditExposure"))?;
    let average_dependency = if partners.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = partners.iter().map(|p| p.dependency_score).sum();
        sum / Decimal::from(partners.len())
    };

    record_credit_score(&level.to_string());
    debug!(
        partners = partners.len(),
        comparison = comparison.len(),
        raw_score = %raw,
        %score,
        %level,
        "Credit risk scored"
    );

    Ok(CreditRiskResult {
        score: score.round_dp(2),
        level,
        raw_score: raw,
        total_exposure,
        average_dependency,
        partner_count: partners.len(),
    })
}

/// Tier of a normalized score.
#[must_use]
pub fn risk_level(score: Decimal) -> RiskLevel {
    if score < MEDIUM_THRESHOLD {
        RiskLevel::Low
    } else if score < HIGH_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Validated `Σ exposure × dependency` of one partner list.
pub fn raw_score(partners: &[Partner]) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for partner in partners {
        validate_partner(partner)?;
        let product = partner
            .credit_exposure
            .checked_mul(partner.dependency_score)
            .ok_or_else(|| overflow("creditExposure"))?;
        total = total
            .checked_add(product)
            .ok_or_else(|| overflow("creditExposure"))?;
    }
    Ok(total)
}

fn validate_partner(partner: &Partner) -> Result<()> {
    if partner.credit_exposure < Decimal::ZERO {
        return Err(EngineError::configuration(
            "creditExposure",
            format!(
                "partner '{}' has negative exposure {}",
                partner.id, partner.credit_exposure
            ),
        ));
    }
    if partner.dependency_score < Decimal::ZERO || partner.dependency_score > Decimal::ONE {
        return Err(EngineError::configuration(
            "dependencyScore",
            format!(
                "partner '{}' has dependency score {} outside [0, 1]",
                partner.id, partner.dependency_score
            ),
        ));
    }
    Ok(())
}

fn overflow(field: &str) -> EngineError {
    EngineError::configuration(field, "credit exposure total overflows decimal range")
}
