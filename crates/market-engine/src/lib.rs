//! Market Engine
//!
//! Session-scoped paper trading state: rolling price history, threshold
//! alerts, cash/holdings ledger, trade journal and watchlist. Price
//! snapshots and user commands go in, immutable view models come out.

pub mod alerts;
pub mod engine;
pub mod error;
pub mod history;
pub mod journal;
pub mod ledger;
pub mod models;
pub mod profile;
pub mod protocol;
pub mod view;
pub mod watchlist;
#[cfg(test)]
mod tests;

pub use alerts::{AlertEngine, AlertFired, PriceAlert};
pub use engine::{EngineConfig, MarketEngine, TickOutcome};
pub use error::{EngineError, Result};
pub use history::PriceHistoryStore;
pub use journal::TradeJournal;
pub use ledger::PortfolioLedger;
pub use models::*;
pub use profile::Profile;
pub use protocol::{ClientEvent, ServerEvent};
pub use view::{
    NetWorthTrend, PortfolioSummary, PriceMove, QuoteView, ViewModel, WatchlistAggregate,
};
pub use watchlist::WatchlistManager;
