//! Monte Carlo simulation runner.
//!
//! # Sampling order
//!
//! One seeded stream drives the whole call. The outer loop is over runs and
//! the inner loop over scenario variables in slice order, so reordering
//! variables changes results predictably. Draws are shared by every option
//! (common random numbers): run `r` presents the same scenario to all
//! options.
//!
//! # Outcome composition
//!
//! For run `r`, with `R` the sum of weighted return-side draws and `C` the
//! sum of weighted cost-side draws:
//!
//! ```text
//! outcome = expected_return × (1 + R) − (cost + mitigation_cost) × (1 + C)
//! ```

use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::{EngineError, Result};
use crate::observability;
use crate::utility::{UtilityParams, certainty_equivalent, expected_utility};

use super::distribution::Distribution;
use super::rng::SeededRng;
use super::stats::{distribution_stats, probability_of_loss, risk_metrics, sorted_copy};
use super::types::{
    AppliesTo, DecisionOption, ScenarioVariable, SimulationReport, SimulationRequest,
    SimulationResult,
};

/// Run a simulation with no run limit and parallel aggregation.
///
/// # Errors
///
/// Returns a configuration error when `runs < 1` or an input is invalid, and
/// a domain error when the utility model rejects an outcome. No partial
/// results are returned.
pub fn run_simulation(
    options: &[DecisionOption],
    variables: &[ScenarioVariable],
    runs: usize,
    seed: u64,
    utility: Option<&UtilityParams>,
) -> Result<Vec<SimulationResult>> {
    MonteCarloEngine::new(SimulationConfig::unbounded()).simulate(
        options, variables, runs, seed, utility,
    )
}

/// Summed weighted draws for one run.
#[derive(Debug, Clone, Copy, Default)]
struct ScenarioShock {
    returns: f64,
    costs: f64,
}

/// A scenario variable with its validated distribution.
struct CompiledVariable {
    id: String,
    applies_to: AppliesTo,
    distribution: Distribution,
    weight: f64,
}

/// Configured Monte Carlo engine.
#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    config: SimulationConfig,
    default_utility: Option<UtilityParams>,
}

impl MonteCarloEngine {
    /// Create an engine from configuration.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            default_utility: None,
        }
    }

    /// Engine configuration.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run a request, filling absent fields from the engine defaults.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationReport> {
        let runs = request.runs.unwrap_or(self.config.default_runs);
        let seed = request.seed.unwrap_or(self.config.default_seed);
        let utility = request.utility.or(self.default_utility);

        let results = self.simulate(
            &request.options,
            &request.variables,
            runs,
            seed,
            utility.as_ref(),
        )?;
        let recommended_option_id = recommend(&results);

        Ok(SimulationReport {
            runs,
            seed,
            utility,
            results,
            recommended_option_id,
        })
    }

    /// Simulate every option against the scenario variables.
    pub fn simulate(
        &self,
        options: &[DecisionOption],
        variables: &[ScenarioVariable],
        runs: usize,
        seed: u64,
        utility: Option<&UtilityParams>,
    ) -> Result<Vec<SimulationResult>> {
        let started = Instant::now();

        let result = self.simulate_inner(options, variables, runs, seed, utility);
        match &result {
            Ok(results) => {
                observability::record_simulation(
                    results.len(),
                    runs,
                    started.elapsed().as_secs_f64(),
                );
            }
            Err(err) => {
                warn!(error = %err, "Simulation rejected");
                observability::record_simulation_failure(err.code().reason());
            }
        }
        result
    }

    fn simulate_inner(
        &self,
        options: &[DecisionOption],
        variables: &[ScenarioVariable],
        runs: usize,
        seed: u64,
        utility: Option<&UtilityParams>,
    ) -> Result<Vec<SimulationResult>> {
        self.validate_runs(runs)?;
        if let Some(params) = utility {
            params.validate()?;
        }
        validate_options(options)?;
        let compiled = variables
            .iter()
            .map(|variable| {
                Ok(CompiledVariable {
                    id: variable.id.clone(),
                    applies_to: variable.applies_to,
                    distribution: variable.distribution()?,
                    weight: variable.weight,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if options.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            options = options.len(),
            variables = compiled.len(),
            runs,
            seed,
            "Running Monte Carlo simulation"
        );

        let shocks = draw_shocks(&compiled, runs, seed)?;

        let results = if self.config.parallel {
            options
                .par_iter()
                .map(|option| evaluate_option(option, &shocks, utility))
                .collect::<Result<Vec<_>>>()?
        } else {
            options
                .iter()
                .map(|option| evaluate_option(option, &shocks, utility))
                .collect::<Result<Vec<_>>>()?
        };

        info!(options = results.len(), runs, "Monte Carlo simulation complete");
        Ok(results)
    }

    fn validate_runs(&self, runs: usize) -> Result<()> {
        if runs < 1 {
            return Err(EngineError::configuration("runs", "runs must be at least 1"));
        }
        if runs > self.config.max_runs {
            return Err(EngineError::configuration(
                "runs",
                format!("runs {runs} exceeds the limit of {}", self.config.max_runs),
            ));
        }
        Ok(())
    }
}

/// Builder for a [`MonteCarloEngine`].
#[derive(Debug, Default)]
pub struct MonteCarloBuilder {
    config: SimulationConfig,
    default_utility: Option<UtilityParams>,
}

impl MonteCarloBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    #[must_use]
    pub const fn config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Set default runs.
    #[must_use]
    pub const fn default_runs(mut self, runs: usize) -> Self {
        self.config.default_runs = runs;
        self
    }

    /// Set the run limit.
    #[must_use]
    pub const fn max_runs(mut self, runs: usize) -> Self {
        self.config.max_runs = runs;
        self
    }

    /// Set the default seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.config.default_seed = seed;
        self
    }

    /// Enable or disable parallel aggregation.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.config.parallel = parallel;
        self
    }

    /// Set the utility model applied when a request carries none.
    #[must_use]
    pub const fn default_utility(mut self, utility: UtilityParams) -> Self {
        self.default_utility = Some(utility);
        self
    }

    /// Build the engine.
    #[must_use]
    pub fn build(self) -> MonteCarloEngine {
        MonteCarloEngine {
            config: self.config,
            default_utility: self.default_utility,
        }
    }
}

fn validate_options(options: &[DecisionOption]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(options.len());
    for option in options {
        option.validate()?;
        if !seen.insert(option.id.as_str()) {
            return Err(EngineError::configuration(
                "id",
                format!("duplicate option id '{}'", option.id),
            ));
        }
    }
    Ok(())
}

/// Draw every run's shocks from a single stream: runs outer, variables inner.
///
/// A weighted draw or running shock total that overflows `f64` is rejected
/// with a configuration error naming the variable.
fn draw_shocks(
    variables: &[CompiledVariable],
    runs: usize,
    seed: u64,
) -> Result<Vec<ScenarioShock>> {
    let mut rng = SeededRng::new(seed);
    let mut shocks = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut shock = ScenarioShock::default();
        for variable in variables {
            let draw = variable.distribution.sample(&mut rng) * variable.weight;
            let total = match variable.applies_to {
                AppliesTo::Return => {
                    shock.returns += draw;
                    shock.returns
                }
                AppliesTo::Cost => {
                    shock.costs += draw;
                    shock.costs
                }
            };
            if !draw.is_finite() || !total.is_finite() {
                return Err(EngineError::configuration(
                    variable.id.clone(),
                    format!(
                        "variable '{}' produced a non-finite weighted draw; reduce its parameters or weight",
                        variable.id
                    ),
                ));
            }
        }
        shocks.push(shock);
    }

    Ok(shocks)
}

fn evaluate_option(
    option: &DecisionOption,
    shocks: &[ScenarioShock],
    utility: Option<&UtilityParams>,
) -> Result<SimulationResult> {
    let base_cost = option.total_cost();
    let outcomes: Vec<f64> = shocks
        .iter()
        .map(|shock| {
            option.expected_return * (1.0 + shock.returns) - base_cost * (1.0 + shock.costs)
        })
        .collect();

    if outcomes.iter().any(|o| !o.is_finite()) {
        return Err(EngineError::configuration(
            option.id.clone(),
            format!("option '{}' produced a non-finite outcome", option.id),
        ));
    }

    let sorted = sorted_copy(&outcomes);
    let metrics = risk_metrics(&sorted);
    let stats = distribution_stats(&sorted);

    let (expected_utility, certainty_equivalent) = match utility {
        Some(params) => {
            let eu = expected_utility(&outcomes, params)?;
            let ce = certainty_equivalent(eu, params)?;
            (Some(eu), Some(ce))
        }
        None => (None, None),
    };

    debug!(
        option_id = %option.id,
        ev = metrics.ev,
        var95 = metrics.var95,
        cvar95 = metrics.cvar95,
        raroc = ?metrics.raroc,
        "Option aggregated"
    );

    Ok(SimulationResult {
        option_id: option.id.clone(),
        option_label: option.label.clone(),
        probability_of_loss: probability_of_loss(&outcomes),
        outcomes,
        ev: metrics.ev,
        var95: metrics.var95,
        cvar95: metrics.cvar95,
        raroc: metrics.raroc,
        expected_utility,
        certainty_equivalent,
        stats,
    })
}

/// Highest certainty equivalent when available, otherwise highest EV.
fn recommend(results: &[SimulationResult]) -> Option<String> {
    let score = |r: &SimulationResult| r.certainty_equivalent.unwrap_or(r.ev);
    let mut best: Option<&SimulationResult> = None;
    for result in results {
        if best.is_none_or(|b| score(result) > score(b)) {
            best = Some(result);
        }
    }
    best.map(|r| r.option_id.clone())
}
