//! Retina simulation driver.
//!
//! Runs one scenario document through the Monte Carlo engine and prints the
//! report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin retina-sim -- scenario.yaml
//! cargo run --bin retina-sim -- scenario.json --config config.yaml
//! ```
//!
//! The scenario document holds `options`, `variables` and optionally `runs`,
//! `seed` and `utility`. Files ending in `.json` are read as JSON, anything
//! else as YAML.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (overrides `observability.logging.level`)
//! - Any variable referenced as `${VAR}` in the config file

use std::path::Path;

use anyhow::{Context, bail};
use retina_engine::config::{Config, load_config};
use retina_engine::simulation::{MonteCarloBuilder, SimulationRequest};
use retina_engine::telemetry::init_tracing;

/// Config file picked up when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const USAGE: &str = "usage: retina-sim <scenario.yaml|scenario.json> [--config <config.yaml>]";

/// Parsed command line.
struct Args {
    scenario: String,
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    load_dotenv();

    let args = parse_args(std::env::args().skip(1))?;
    let config = resolve_config(args.config.as_deref())?;
    init_tracing(&config.observability.logging);

    tracing::info!(scenario = %args.scenario, "Starting Retina simulation");

    let request = read_request(&args.scenario)?;

    let mut builder = MonteCarloBuilder::new().config(config.simulation.clone());
    if let Some(utility) = config.utility {
        builder = builder.default_utility(utility);
    }
    let engine = builder.build();

    let report = engine
        .run(&request)
        .with_context(|| format!("simulation of '{}' failed", args.scenario))?;

    if let Some(recommended) = &report.recommended_option_id {
        tracing::info!(option_id = %recommended, "Recommended option");
    }

    let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
    println!("{json}");
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let mut scenario = None;
    let mut config = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(path);
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown flag '{flag}'\n{USAGE}"),
            _ if scenario.is_none() => scenario = Some(arg),
            _ => bail!("unexpected argument '{arg}'\n{USAGE}"),
        }
    }

    let scenario = scenario.context(USAGE)?;
    Ok(Args { scenario, config })
}

/// Load the explicit config, else `config.yaml` when present, else defaults.
fn resolve_config(path: Option<&str>) -> anyhow::Result<Config> {
    match path {
        Some(path) => load_config(Some(path)).with_context(|| format!("loading config '{path}'")),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(None).context("loading config.yaml")
        }
        None => Ok(Config::default()),
    }
}

fn read_request(path: &str) -> anyhow::Result<SimulationRequest> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading scenario '{path}'"))?;

    let is_json = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&contents).with_context(|| format!("parsing scenario '{path}'"))
    } else {
        serde_yaml_bw::from_str(&contents).with_context(|| format!("parsing scenario '{path}'"))
    }
}

/// Load `.env` from the working directory or the nearest ancestor holding one.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}
