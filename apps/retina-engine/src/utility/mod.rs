//! Utility function evaluation.
//!
//! Maps raw outcomes to utility under a risk-preference model and inverts
//! expected utility back to a certainty equivalent.
//!
//! # Models
//!
//! With `y = x / scale`:
//!
//! - `CARA`: `u(x) = (1 - e^(-a·y)) / a`, the affine equivalent of
//!   `-e^(-a·y) / a` that stays finite as `a → 0` (limit `y`).
//! - `CRRA`: `u(x) = (y^(1-a) - 1) / (1 - a)`, `ln y` at `a = 1`. Requires `y > 0`.
//! - `Exponential`: `u(x) = (1 - e^(-a·x)) / a` on the raw outcome. `a` is
//!   per outcome unit and `scale` is ignored, so utility reads in outcome units.
//!
//! All three models reduce to linear utility as `a → 0`.
//!
//! # Example
//!
//! ```rust
//! use retina_engine::utility::{UtilityMode, UtilityParams, certainty_equivalent, expected_utility};
//!
//! # fn main() -> retina_engine::Result<()> {
//! let params = UtilityParams::new(UtilityMode::Cara, 0.5, 100.0);
//! let eu = expected_utility(&[120.0, -40.0, 75.0], &params)?;
//! let ce = certainty_equivalent(eu, &params)?;
//! assert!(ce < 155.0 / 3.0);
//! # Ok(())
//! # }
//! ```

mod evaluator;
mod types;

pub use evaluator::{certainty_equivalent, compute_utility, expected_utility};
pub use types::{UtilityMode, UtilityParams};
