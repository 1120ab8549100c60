//! Synthetic Load Simulation
//!
//! Drives a [`Router`] through the select → act → report loop against
//! synthetic endpoints. Each endpoint has a base latency and a failure rate;
//! every simulated request samples both from a seeded RNG. Latency is
//! sampled and reported, never waited on.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use router_core::{EndpointSnapshot, Router};

// ============================================================================
// Endpoint Profiles
// ============================================================================

/// Behaviour of one synthetic endpoint
#[derive(Clone, Debug, PartialEq)]
pub struct EndpointProfile {
    /// Endpoint identifier
    pub name: String,

    /// Median latency; samples fall in `[0.5, 1.5)` times this value
    pub latency: Duration,

    /// Probability that a request fails (0.0 - 1.0)
    pub failure_rate: f64,
}

impl EndpointProfile {
    /// Sample the outcome of one request
    fn sample(&self, rng: &mut StdRng) -> (Duration, bool) {
        let latency = self.latency.mul_f64(rng.gen_range(0.5..1.5));
        let success = !rng.gen_bool(self.failure_rate);
        (latency, success)
    }
}

/// Parses `NAME=LATENCY_MS[:FAILURE_RATE]`, e.g. `solr-1=20:0.05`
impl FromStr for EndpointProfile {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, rest) = s
            .split_once('=')
            .with_context(|| format!("expected NAME=LATENCY_MS[:FAILURE_RATE], got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            bail!("endpoint name is empty in '{s}'");
        }

        let (latency, failure_rate) = match rest.split_once(':') {
            Some((latency, rate)) => (latency, Some(rate)),
            None => (rest, None),
        };

        let latency_ms: u64 = latency
            .trim()
            .parse()
            .with_context(|| format!("invalid latency '{latency}' for endpoint '{name}'"))?;

        let failure_rate = match failure_rate {
            Some(rate) => rate
                .trim()
                .parse::<f64>()
                .with_context(|| format!("invalid failure rate '{rate}' for endpoint '{name}'"))?,
            None => 0.0,
        };
        if !(0.0..=1.0).contains(&failure_rate) {
            bail!("failure rate for endpoint '{name}' must be within 0.0-1.0, got {failure_rate}");
        }

        Ok(Self {
            name: name.to_string(),
            latency: Duration::from_millis(latency_ms),
            failure_rate,
        })
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Shape of a simulation run
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    /// Concurrent worker tasks
    pub workers: usize,

    /// Requests issued by each worker
    pub rounds: usize,

    /// Base RNG seed; worker `i` uses `seed + i`
    pub seed: u64,
}

/// Outcome of a simulation run
#[derive(Clone, Debug, Serialize)]
pub struct SimulationReport {
    /// Strategy that was exercised
    pub strategy: &'static str,

    /// Total requests issued
    pub total_requests: usize,

    /// Per-endpoint results, in profile order
    pub endpoints: Vec<EndpointReport>,
}

/// Per-endpoint results of a simulation run
#[derive(Clone, Debug, Serialize)]
pub struct EndpointReport {
    /// Endpoint identifier
    pub endpoint: String,

    /// Times the router selected this endpoint
    pub picks: usize,

    /// Simulated requests to this endpoint that failed
    pub failures: usize,

    /// Router's view of the endpoint at the end of the run, if it keeps one
    pub history: Option<EndpointSnapshot>,
}

#[derive(Default)]
struct Tally {
    picks: usize,
    failures: usize,
}

/// Run `config.workers` concurrent workers against `router`
///
/// # Errors
///
/// Fails if no profiles are given, if a worker task panics, or if the router
/// rejects a selection.
pub async fn run(
    router: Arc<dyn Router>,
    profiles: Vec<EndpointProfile>,
    config: SimulationConfig,
) -> anyhow::Result<SimulationReport> {
    if profiles.is_empty() {
        bail!("at least one endpoint is required");
    }

    let candidates: Arc<Vec<String>> = Arc::new(profiles.iter().map(|p| p.name.clone()).collect());
    let profiles: Arc<BTreeMap<String, EndpointProfile>> = Arc::new(
        profiles
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect(),
    );

    info!(
        strategy = router.name(),
        endpoints = candidates.len(),
        workers = config.workers,
        rounds = config.rounds,
        "Starting simulation"
    );

    let mut handles = Vec::with_capacity(config.workers);
    for worker in 0..config.workers {
        let router = Arc::clone(&router);
        let candidates = Arc::clone(&candidates);
        let profiles = Arc::clone(&profiles);
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(worker as u64));

        handles.push(tokio::spawn(async move {
            let mut tally: BTreeMap<String, Tally> = BTreeMap::new();
            for _ in 0..config.rounds {
                let endpoint = router.select_best(&candidates)?;
                let profile = profiles
                    .get(&endpoint)
                    .with_context(|| format!("router selected unknown endpoint '{endpoint}'"))?;

                let (latency, success) = profile.sample(&mut rng);
                router.record_result(latency, &endpoint, success);

                let entry = tally.entry(endpoint).or_default();
                entry.picks += 1;
                if !success {
                    entry.failures += 1;
                }

                tokio::task::yield_now().await;
            }
            debug!(worker, "Worker finished");
            Ok::<_, anyhow::Error>(tally)
        }));
    }

    let mut totals: BTreeMap<String, Tally> = BTreeMap::new();
    for handle in handles {
        let tally = handle.await.context("simulation worker panicked")??;
        for (endpoint, counts) in tally {
            let total = totals.entry(endpoint).or_default();
            total.picks += counts.picks;
            total.failures += counts.failures;
        }
    }

    let snapshots: BTreeMap<String, EndpointSnapshot> = router
        .snapshots()
        .into_iter()
        .map(|s| (s.endpoint.clone(), s))
        .collect();

    let endpoints: Vec<EndpointReport> = candidates
        .iter()
        .map(|name| {
            let tally = totals.remove(name).unwrap_or_default();
            EndpointReport {
                endpoint: name.clone(),
                picks: tally.picks,
                failures: tally.failures,
                history: snapshots.get(name).cloned(),
            }
        })
        .collect();

    let report = SimulationReport {
        strategy: router.name(),
        total_requests: endpoints.iter().map(|e| e.picks).sum(),
        endpoints,
    };

    info!(total_requests = report.total_requests, "Simulation complete");
    Ok(report)
}

// ============================================================================
// Tests
// ============================================================================
