//! Partner credit risk scoring.
//!
//! Scores are relative: each partner set is normalized against the riskiest
//! set in a comparison group, so the same partners can score differently
//! depending on what they are compared with.
//!
//! # Example
//!
//! ```rust
//! use retina_engine::credit::{compute_credit_risk_score, Partner, PartnerSet, RiskLevel};
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> retina_engine::Result<()> {
//! let ours = vec![Partner::new("supplier", dec!(40), dec!(0.5))];
//! let theirs = PartnerSet::from(vec![Partner::new("bank", dec!(100), dec!(1))]);
//!
//! let result = compute_credit_risk_score(&ours, &[theirs])?;
//! assert_eq!(result.score, dec!(20));
//! assert_eq!(result.level, RiskLevel::Low);
//! # Ok(())
//! # }
//! ```

mod scorer;
mod types;

pub use scorer::{
    HIGH_THRESHOLD, MEDIUM_THRESHOLD, compute_credit_risk_score, raw_score, risk_level,
};
pub use types::{CreditRiskResult, Partner, PartnerSet, RiskLevel};
