//! Deal Checker Gateway - HTTP surface for deal risk validation
//!
//! Wraps the `dealcheck-core` pipeline in an axum router:
//!
//! ```text
//!  POST /upload ──► MockExtractor ──► DealRepository
//!                                          │
//!  POST /validate ──► ValidationEngine ◄───┤
//!  POST /simulate ──► SimulationRunner ◄───┤
//!  GET  /summary  ──► SummaryGenerator ◄───┘
//! ```
//!
//! Deals live in a [`store::DealRepository`]; the binary wires in the
//! in-memory store, so nothing survives a restart.

pub mod config;
pub mod error;
pub mod gateway;
pub mod store;

pub use config::GatewayConfig;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayState};
pub use store::{Deal, DealId, DealRepository, DealStatus, InMemoryDealStore};

/// Gateway version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default port
pub const DEFAULT_PORT: u16 = 8000;

/// Default host
pub const DEFAULT_HOST: &str = "127.0.0.1";
