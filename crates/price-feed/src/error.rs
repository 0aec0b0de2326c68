use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Volatility must be within `(0.0, 1.0]`.
    #[error("Invalid volatility: {0}")]
    InvalidVolatility(f64),

    #[error("Price feed needs at least one symbol")]
    EmptyUniverse,

    #[error("Duplicate symbol in universe: {0}")]
    DuplicateSymbol(String),

    #[error("Seed price for {symbol} must be positive (got {price})")]
    InvalidSeedPrice { symbol: String, price: Decimal },
}
