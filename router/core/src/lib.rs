//! Router Core - Client-Side Adaptive Endpoint Selection
//!
//! Given several endpoints serving the same resource, picks the one currently
//! performing best and learns from the outcome of every request sent to it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Caller                              │
//! │   candidates ──► select_best ──► request ──► record_result   │
//! └──────────────────────┬───────────────────────────┬───────────┘
//!                        │ read lock                 │ write lock
//! ┌──────────────────────┴───────────────────────────┴───────────┐
//! │                    AdaptiveRouter                             │
//! │  ┌─────────────────────────────────────────────────────────┐ │
//! │  │  endpoint ──► EndpointHistory (ring of N observations)  │ │
//! │  └─────────────────────────────────────────────────────────┘ │
//! │                  ranking: dominance, stable                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Router`]: selection/feedback capability shared by every strategy
//! - [`AdaptiveRouter`]: ranks by failures and average latency
//! - [`EndpointHistory`]: fixed-size ring of recent outcomes for one endpoint
//! - [`RouterConfig`]: strategy and window size, loaded from TOML and env
//!
//! # Quick Start
//!
//! ```ignore
//! use std::num::NonZeroUsize;
//! use std::time::Instant;
//! use router_core::{AdaptiveRouter, Router};
//!
//! let router = AdaptiveRouter::new(NonZeroUsize::new(10).unwrap());
//! let candidates = vec!["http://a:8983".to_string(), "http://b:8983".to_string()];
//!
//! let endpoint = router.select_best(&candidates)?;
//! let started = Instant::now();
//! let ok = send(&endpoint).is_ok();
//! router.record_result(started.elapsed(), &endpoint, ok);
//! ```
//!
//! # Module Overview
//!
//! - [`history`]: per-endpoint rolling window
//! - [`ranking`]: dominance comparator and stable ranking
//! - [`router`]: the `Router` trait and its strategies
//! - [`config`]: configuration loading
//! - [`factory`]: builds a `Router` from configuration
//! - [`error`]: error types
//!
//! Discovery of candidate endpoints and the transport that talks to them live
//! with the caller; this crate only sees identifiers, latencies and a success
//! flag.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod error;
pub mod factory;
pub mod history;
pub mod ranking;
pub mod router;

pub use config::{ConfigError, ConfigOverrides, ConfigSource, RouterConfig, Strategy};
pub use error::RouterError;
pub use factory::create_router;
pub use history::{EndpointHistory, EndpointSnapshot};
pub use ranking::Score;
pub use router::{AdaptiveRouter, RoundRobinRouter, Router, ShardedAdaptiveRouter};
