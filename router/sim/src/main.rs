//! Router Simulator - Synthetic Load Against a Routing Strategy
//!
//! Runs concurrent workers through the select → request → report loop
//! against synthetic endpoints and prints a JSON summary of where traffic
//! went and what the router learned.
//!
//! # Usage
//!
//! ```bash
//! # Two endpoints, one slow and flaky
//! router-sim --endpoint a=20 --endpoint b=80:0.2
//!
//! # Compare against round-robin
//! router-sim --strategy round_robin --endpoint a=20 --endpoint b=80:0.2
//!
//! # With config file and more load
//! router-sim --config ./router.toml --workers 16 --rounds 5000 --endpoint a=20
//!
//! # Verbose logging (goes to stderr, the report goes to stdout)
//! RUST_LOG=debug router-sim --endpoint a=20
//! ```

mod simulation;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use router_core::config::{default_config_path, load_config_from_path};
use router_core::{create_router, ConfigOverrides, RouterConfig, Strategy};

use simulation::{EndpointProfile, SimulationConfig};

/// Router Simulator - synthetic load against an endpoint routing strategy
#[derive(Parser, Debug)]
#[command(name = "router-sim")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "ROUTER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Routing strategy (adaptive, sharded, round_robin)
    #[arg(short = 's', long, value_name = "STRATEGY")]
    strategy: Option<Strategy>,

    /// Observations kept per endpoint
    #[arg(short = 'w', long, value_name = "N")]
    window: Option<NonZeroUsize>,

    /// Synthetic endpoint; repeat for each endpoint
    #[arg(
        short = 'e',
        long = "endpoint",
        value_name = "NAME=LATENCY_MS[:FAILURE_RATE]",
        required = true
    )]
    endpoints: Vec<EndpointProfile>,

    /// Concurrent worker tasks
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Requests issued by each worker
    #[arg(long, default_value_t = 1000)]
    rounds: usize,

    /// RNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

impl Args {
    /// Resolve router configuration: defaults, file, env, then flags
    fn router_config(&self) -> Result<RouterConfig> {
        let path = match &self.config {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                Some(path.clone())
            }
            None => default_config_path(),
        };

        let mut config = load_config_from_path(path).context("Failed to load configuration")?;

        let mut overrides = ConfigOverrides::new();
        if let Some(strategy) = self.strategy {
            overrides = overrides.with_strategy(strategy);
        }
        if let Some(window) = self.window {
            overrides = overrides.with_window_size(window);
        }
        overrides.apply(&mut config);

        Ok(config)
    }

    fn simulation_config(&self) -> Result<SimulationConfig> {
        if self.workers == 0 {
            bail!("--workers must be at least 1");
        }
        Ok(SimulationConfig {
            workers: self.workers,
            rounds: self.rounds,
            seed: self.seed,
        })
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("router_sim=info,router_core=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let config = args.router_config()?;
    let simulation = args.simulation_config()?;

    info!(
        strategy = %config.strategy,
        window_size = config.window_size.get(),
        source = %config.source(),
        "Router configured"
    );

    let router = create_router(&config);
    let report = simulation::run(router, args.endpoints, simulation).await?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "router-sim",
            "--strategy",
            "round-robin",
            "--window",
            "3",
            "--endpoint",
            "a=10",
            "-e",
            "b=20:0.5",
            "--workers",
            "2",
        ])
        .unwrap();

        assert_eq!(args.strategy, Some(Strategy::RoundRobin));
        assert_eq!(args.window, NonZeroUsize::new(3));
        assert_eq!(args.endpoints.len(), 2);
        assert_eq!(args.endpoints[1].name, "b");
        assert_eq!(args.workers, 2);
        assert_eq!(args.rounds, 1000);
    }

    #[test]
    fn test_args_require_endpoint() {
        assert!(Args::try_parse_from(["router-sim"]).is_err());
    }

    #[test]
    fn test_args_reject_bad_values() {
        assert!(Args::try_parse_from(["router-sim", "-e", "a=10", "--window", "0"]).is_err());
        assert!(Args::try_parse_from(["router-sim", "-e", "a=10", "--strategy", "random"]).is_err());
        assert!(Args::try_parse_from(["router-sim", "-e", "a"]).is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let args = Args::try_parse_from(["router-sim", "-e", "a=10", "--workers", "0"]).unwrap();
        assert!(args.simulation_config().is_err());
    }

    #[test]
    fn test_missing_config_file_rejected() {
        let args = Args::try_parse_from([
            "router-sim",
            "-e",
            "a=10",
            "--config",
            "/nonexistent/router.toml",
        ])
        .unwrap();
        assert!(args.router_config().is_err());
    }
}
