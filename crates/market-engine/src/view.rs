use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Price, PriceSnapshot, Symbol, TradeRecord};

/// Tick-over-tick direction of a symbol's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceMove {
    Up,
    Down,
}

/// Net worth relative to the starting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetWorthTrend {
    AtOrAbove,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub cash: Decimal,
    pub holdings_value: Decimal,
    pub net_worth: Decimal,
    pub trend: NetWorthTrend,
}

/// High/low/average over the watched symbols that have a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistAggregate {
    pub count: usize,
    pub high: Price,
    pub low: Price,
    pub average: Price,
}

impl WatchlistAggregate {
    /// `None` when there is nothing to aggregate.
    pub fn from_prices(count: usize, prices: &[Price]) -> Option<Self> {
        let first = *prices.first()?;
        let (high, low, sum) = prices.iter().fold(
            (first, first, Decimal::ZERO),
            |(high, low, sum), p| (high.max(*p), low.min(*p), sum + *p),
        );
        Some(Self {
            count,
            high,
            low,
            average: sum / Decimal::from(prices.len()),
        })
    }
}

/// Card state for one watched symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteView {
    pub symbol: Symbol,
    pub price: Option<Price>,
    pub direction: Option<PriceMove>,
    pub history: Vec<Price>,
    pub owned: u32,
    pub alert_target: Option<Price>,
    pub alert_active: bool,
    pub alert_status: String,
}

/// Read-only snapshot of the whole session, rebuilt after every tick or command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub prices: PriceSnapshot,
    pub quotes: Vec<QuoteView>,
    pub portfolio: PortfolioSummary,
    pub watched_count: usize,
    pub watchlist: Option<WatchlistAggregate>,
    pub journal: Vec<TradeRecord>,
    pub banner: Option<String>,
}
