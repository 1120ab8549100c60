//! Router Factory
//!
//! Builds the configured routing strategy behind the [`Router`] trait so
//! callers never name a concrete type.

use std::sync::Arc;

use crate::config::{RouterConfig, Strategy};
use crate::router::{AdaptiveRouter, RoundRobinRouter, Router, ShardedAdaptiveRouter};

/// Create a router based on configuration
///
/// # Example
///
/// ```ignore
/// use router_core::{config::load_config, create_router};
///
/// let config = load_config()?;
/// let router = create_router(&config);
/// let endpoint = router.select_best(&candidates)?;
/// ```
#[must_use]
pub fn create_router(config: &RouterConfig) -> Arc<dyn Router> {
    tracing::info!(
        strategy = %config.strategy,
        window_size = config.window_size.get(),
        "Creating router"
    );

    match config.strategy {
        Strategy::Adaptive => Arc::new(AdaptiveRouter::new(config.window_size)),
        Strategy::Sharded => Arc::new(ShardedAdaptiveRouter::new(config.window_size)),
        Strategy::RoundRobin => Arc::new(RoundRobinRouter::new()),
    }
}
