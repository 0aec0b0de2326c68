use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

/// Rejections for user commands. None of these are fatal: a rejected
/// command leaves every part of the engine untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Please enter a valid alert price ({0})")]
    InvalidAlert(String),

    #[error("Not enough cash: required ${required:.2}, available ${available:.2}")]
    InsufficientFunds { required: Decimal, available: Decimal },

    #[error("You don't own any shares of {0}")]
    NoHoldings(String),

    #[error("Price unavailable for {0}")]
    UnknownPrice(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),
}
