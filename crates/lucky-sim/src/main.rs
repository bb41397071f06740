//! Balance simulation binary for Lucky Agent.
//!
//! Runs the seeded "first tier-6 draw" simulation against a balance file
//! and logs the p25/p50/p75 minutes. Used to tune the upgrade curves.
//!
//! # Environment
//!
//! - `LUCKY_BALANCE_PATH` -- balance YAML, default `lucky-balance.yaml`
//!   (shipped defaults when the file does not exist)
//! - `SIM_RUNS` -- number of seeded runs, default 500
//! - `SIM_SEED` -- seed of the first run, default 1
//! - `RUST_LOG` -- log filter, default `info`

mod sim;

use std::path::Path;

use lucky_core::{BalanceConfig, Catalog};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::sim::{SimSettings, run_batch};

/// Entry point.
///
/// # Errors
///
/// Returns an error if the balance file or an environment value is invalid.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = load_config()?;
    let catalog = Catalog::standard()?;

    let defaults = SimSettings::default();
    let settings = SimSettings {
        runs: env_or("SIM_RUNS", defaults.runs)?,
        seed: env_or("SIM_SEED", defaults.seed)?,
        ..defaults
    };
    info!(
        version = %config.version,
        runs = settings.runs,
        seed = settings.seed,
        "simulation starting"
    );

    let summary = run_batch(&config, &catalog, &settings)?;
    info!(
        runs = summary.runs,
        p25 = format!("{:.2}", summary.p25),
        p50 = format!("{:.2}", summary.p50),
        p75 = format!("{:.2}", summary.p75),
        "minutes to first tier-6 draw"
    );
    Ok(())
}

fn load_config() -> Result<BalanceConfig, lucky_core::ConfigError> {
    let path = std::env::var("LUCKY_BALANCE_PATH").unwrap_or_else(|_| "lucky-balance.yaml".to_owned());
    let path = Path::new(&path);
    if path.exists() {
        info!(path = %path.display(), "loading balance config");
        BalanceConfig::from_file(path)
    } else {
        warn!(path = %path.display(), "balance file not found, using shipped defaults");
        BalanceConfig::parse("")
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
where
    T::Err: std::error::Error + 'static,
{
    match std::env::var(name) {
        Ok(raw) => Ok(raw.trim().parse::<T>()?),
        Err(_) => Ok(default),
    }
}
