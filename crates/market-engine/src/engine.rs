use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::alerts::{AlertEngine, AlertFired};
use crate::error::{EngineError, Result};
use crate::history::PriceHistoryStore;
use crate::journal::TradeJournal;
use crate::ledger::PortfolioLedger;
use crate::models::*;
use crate::view::*;
use crate::watchlist::WatchlistManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub initial_cash: Decimal,
    pub history_capacity: usize,
    pub journal_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: INITIAL_CASH,
            history_capacity: HISTORY_CAPACITY,
            journal_capacity: JOURNAL_CAPACITY,
        }
    }
}

/// Everything produced by one tick: the alerts it fired and the view rebuilt from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub fired: Vec<AlertFired>,
    pub view: ViewModel,
}

/// Composition root for one trading session.
///
/// Owns every piece of session state and is driven one event at a time:
/// either a price snapshot ([`MarketEngine::apply_tick`]) or a user command
/// (`toggle_watch`, `buy`, `sell`, `set_alert`). Callers on a multi-threaded
/// runtime must funnel all of these through a single owner.
#[derive(Debug, Clone)]
pub struct MarketEngine {
    universe: Vec<Symbol>,
    history: PriceHistoryStore,
    alerts: AlertEngine,
    ledger: PortfolioLedger,
    journal: TradeJournal,
    watchlist: WatchlistManager,
    current: HashMap<Symbol, Price>,
    // Last price shown on a watched card, and the move it was shown with.
    previous: HashMap<Symbol, Price>,
    direction: HashMap<Symbol, PriceMove>,
    banner: Option<String>,
}

impl MarketEngine {
    /// Bootstrap a session for the given universe with default settings.
    pub fn new<I, S>(universe: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self::with_config(universe, EngineConfig::default())
    }

    pub fn with_config<I, S>(universe: I, config: EngineConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        let mut engine = Self {
            universe: Vec::new(),
            history: PriceHistoryStore::with_capacity(config.history_capacity),
            alerts: AlertEngine::new(),
            ledger: PortfolioLedger::new(config.initial_cash),
            journal: TradeJournal::with_capacity(config.journal_capacity),
            watchlist: WatchlistManager::new(),
            current: HashMap::new(),
            previous: HashMap::new(),
            direction: HashMap::new(),
            banner: None,
        };

        for symbol in universe {
            let symbol = symbol.into();
            if engine.universe.contains(&symbol) {
                continue;
            }
            engine.history.track(&symbol);
            engine.ledger.open(&symbol);
            engine.universe.push(symbol);
        }

        tracing::debug!("Session engine ready for {} symbols", engine.universe.len());
        engine
    }

    pub fn universe(&self) -> &[Symbol] {
        &self.universe
    }

    pub fn history(&self) -> &PriceHistoryStore {
        &self.history
    }

    pub fn alerts(&self) -> &AlertEngine {
        &self.alerts
    }

    pub fn ledger(&self) -> &PortfolioLedger {
        &self.ledger
    }

    pub fn journal(&self) -> &TradeJournal {
        &self.journal
    }

    pub fn watchlist(&self) -> &WatchlistManager {
        &self.watchlist
    }

    pub fn price(&self, symbol: &str) -> Option<Price> {
        self.current.get(symbol).copied()
    }

    /// Ingest one full snapshot.
    ///
    /// Symbols are processed in universe order, so when several alerts fire
    /// in one tick the banner belongs to the last of them in that order.
    /// History and alerts are updated for every priced symbol before the
    /// portfolio and watchlist aggregates are derived from the same tick.
    /// Symbols missing from the snapshot keep their last price but get no
    /// new history point; symbols outside the universe are ignored.
    pub fn apply_tick(&mut self, snapshot: &PriceSnapshot) -> TickOutcome {
        for symbol in snapshot.keys().filter(|s| !self.in_universe(s)) {
            tracing::debug!("Ignoring price for {} outside the universe", symbol);
        }

        let mut fired = Vec::new();
        for symbol in &self.universe {
            let Some(price) = snapshot.get(symbol).copied() else {
                continue;
            };
            self.current.insert(symbol.clone(), price);
            self.history.record(symbol, price);

            if let Some(event) = self.alerts.evaluate(symbol, price) {
                tracing::info!("{}", event.message());
                fired.push(event);
            }
        }

        // Direction only advances for cards on screen; an unwatched symbol
        // keeps comparing against the last price it was shown at (or zero).
        for symbol in self.watchlist.symbols() {
            let Some(price) = snapshot.get(symbol).copied() else {
                continue;
            };
            let prev = self.previous.get(symbol).copied().unwrap_or(Decimal::ZERO);
            let direction = if price >= prev {
                PriceMove::Up
            } else {
                PriceMove::Down
            };
            self.direction.insert(symbol.clone(), direction);
            self.previous.insert(symbol.clone(), price);
        }

        // One banner at a time: the newest alert of this tick wins.
        if let Some(last) = fired.last() {
            self.banner = Some(last.message());
        }

        TickOutcome {
            fired,
            view: self.view(),
        }
    }

    /// Watch or unwatch a symbol. Returns the new membership.
    pub fn toggle_watch(&mut self, symbol: &str) -> Result<bool> {
        self.ensure_known(symbol)?;
        let watched = self.watchlist.toggle(symbol);
        tracing::debug!("{} {}", if watched { "Watching" } else { "Unwatched" }, symbol);
        Ok(watched)
    }

    /// Buy one share at the latest price.
    pub fn buy(&mut self, symbol: &str) -> Result<TradeRecord> {
        self.ensure_known(symbol)?;
        let trade = self
            .ledger
            .buy(symbol, self.price(symbol))
            .inspect_err(|e| tracing::debug!("Buy {} rejected: {}", symbol, e))?;
        self.settle(trade)
    }

    /// Sell one share at the latest price.
    pub fn sell(&mut self, symbol: &str) -> Result<TradeRecord> {
        self.ensure_known(symbol)?;
        let trade = self
            .ledger
            .sell(symbol, self.price(symbol))
            .inspect_err(|e| tracing::debug!("Sell {} rejected: {}", symbol, e))?;
        self.settle(trade)
    }

    /// Arm (or re-arm) a price alert for a symbol.
    pub fn set_alert(&mut self, symbol: &str, target: f64) -> Result<Price> {
        self.ensure_known(symbol)?;
        let target = self.alerts.set_alert(symbol, target)?;
        tracing::info!("Alert armed for {} at {:.2}", symbol, target);
        Ok(target)
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn portfolio(&self) -> PortfolioSummary {
        let holdings_value = self.ledger.holdings_value(&self.current);
        let net_worth = self.ledger.net_worth(&self.current);
        let trend = if net_worth >= self.ledger.initial_cash() {
            NetWorthTrend::AtOrAbove
        } else {
            NetWorthTrend::Below
        };
        PortfolioSummary {
            cash: self.ledger.cash(),
            holdings_value,
            net_worth,
            trend,
        }
    }

    /// Aggregates over watched symbols; `None` when nothing watched has a price.
    pub fn watchlist_aggregate(&self) -> Option<WatchlistAggregate> {
        let prices: Vec<Price> = self
            .watchlist
            .symbols()
            .filter_map(|s| self.price(s))
            .collect();
        WatchlistAggregate::from_prices(self.watchlist.size(), &prices)
    }

    pub fn view(&self) -> ViewModel {
        let quotes = self
            .watchlist
            .symbols()
            .map(|symbol| self.quote(symbol))
            .collect();

        ViewModel {
            prices: self
                .current
                .iter()
                .map(|(s, p)| (s.clone(), *p))
                .collect(),
            quotes,
            portfolio: self.portfolio(),
            watched_count: self.watchlist.size(),
            watchlist: self.watchlist_aggregate(),
            journal: self.journal.all(),
            banner: self.banner.clone(),
        }
    }

    fn quote(&self, symbol: &Symbol) -> QuoteView {
        let price = self.price(symbol);
        let direction = self.direction.get(symbol).copied();

        QuoteView {
            symbol: symbol.clone(),
            price,
            direction,
            history: self.history.get(symbol),
            owned: self.ledger.holding(symbol),
            alert_target: self.alerts.get(symbol).map(|a| a.target),
            alert_active: self.alerts.is_active(symbol),
            alert_status: self.alerts.status_text(symbol),
        }
    }

    fn settle(&mut self, trade: TradeRecord) -> Result<TradeRecord> {
        tracing::info!(
            "{} {} {} @ {:.2} (cash {:.2})",
            trade.side,
            trade.quantity,
            trade.symbol,
            trade.price,
            trade.cash_after
        );
        self.journal.record(trade.clone());
        Ok(trade)
    }

    fn in_universe(&self, symbol: &str) -> bool {
        self.universe.iter().any(|s| s == symbol)
    }

    fn ensure_known(&self, symbol: &str) -> Result<()> {
        if self.in_universe(symbol) {
            Ok(())
        } else {
            Err(EngineError::UnknownSymbol(symbol.to_string()))
        }
    }
}
