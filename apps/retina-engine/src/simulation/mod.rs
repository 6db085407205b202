//! Monte Carlo decision simulation.
//!
//! Samples scenario variables from parametric distributions, composes
//! per-option outcome draws and derives risk metrics (EV, VaR95, CVaR95,
//! RAROC) and, when a utility model is supplied, expected utility and the
//! certainty equivalent.
//!
//! # Example
//!
//! ```rust
//! use retina_engine::simulation::{DecisionOption, run_simulation};
//!
//! # fn main() -> retina_engine::Result<()> {
//! let options = vec![DecisionOption::new("a", "Expand", 100.0, 50.0)];
//! // Without scenario variables every run lands on the base case
//! let results = run_simulation(&options, &[], 1000, 42, None)?;
//! assert_eq!(results[0].ev, 50.0);
//! # Ok(())
//! # }
//! ```

pub mod distribution;
pub mod rng;
pub mod runner;
pub mod stats;
pub mod types;

pub use distribution::{Distribution, DistributionKind, sample_distribution};
pub use rng::SeededRng;
pub use runner::{MonteCarloBuilder, MonteCarloEngine, run_simulation};
pub use stats::{DistributionStats, HistogramBin, RiskMetrics, histogram};
pub use types::{
    AppliesTo, DecisionOption, ScenarioVariable, SimulationReport, SimulationRequest,
    SimulationResult,
};
