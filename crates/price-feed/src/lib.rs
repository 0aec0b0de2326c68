//! Price Feed
//!
//! Synthetic market for a fixed universe: each tick perturbs every price by
//! a uniform random fraction of its previous value and rounds to cents.

pub mod error;
pub mod generator;

pub use error::FeedError;
pub use generator::{default_universe, PriceGenerator, DEFAULT_VOLATILITY};
