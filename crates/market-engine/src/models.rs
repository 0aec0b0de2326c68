use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Ticker identifier from the session's universe.
pub type Symbol = String;

/// Non-negative decimal price.
pub type Price = Decimal;

/// One full tick: every symbol in the universe mapped to its latest price.
pub type PriceSnapshot = BTreeMap<Symbol, Price>;

pub const INITIAL_CASH: Decimal = dec!(10000.00);
pub const HISTORY_CAPACITY: usize = 50;
pub const JOURNAL_CAPACITY: usize = 6;

/// Every order moves exactly one share.
pub const SHARES_PER_ORDER: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

/// An executed order as it appears in the journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp: DateTime<Utc>,
    pub symbol: Symbol,
    pub side: TradeSide,
    pub price: Price,
    pub quantity: u32,
    pub cash_after: Decimal,
}
