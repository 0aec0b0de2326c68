use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::error::{EngineError, Result};
use crate::models::{Price, Symbol, TradeRecord, TradeSide, INITIAL_CASH, SHARES_PER_ORDER};

/// Cash balance and whole-share holdings for one session.
#[derive(Debug, Clone)]
pub struct PortfolioLedger {
    initial_cash: Decimal,
    cash: Decimal,
    holdings: HashMap<Symbol, u32>,
}

impl Default for PortfolioLedger {
    fn default() -> Self {
        Self::new(INITIAL_CASH)
    }
}

impl PortfolioLedger {
    /// Negative starting cash is clamped to zero.
    pub fn new(initial_cash: Decimal) -> Self {
        let initial_cash = initial_cash.max(Decimal::ZERO);
        Self {
            initial_cash,
            cash: initial_cash,
            holdings: HashMap::new(),
        }
    }

    pub fn initial_cash(&self) -> Decimal {
        self.initial_cash
    }

    pub fn cash(&self) -> Decimal {
        self.cash
    }

    pub fn holding(&self, symbol: &str) -> u32 {
        self.holdings.get(symbol).copied().unwrap_or(0)
    }

    pub fn holdings(&self) -> impl Iterator<Item = (&Symbol, u32)> {
        self.holdings.iter().map(|(s, q)| (s, *q))
    }

    /// Register a symbol with zero shares.
    pub(crate) fn open(&mut self, symbol: &str) {
        self.holdings.entry(symbol.to_string()).or_insert(0);
    }

    /// Buy one share. Succeeds when cash equals the price exactly.
    pub fn buy(&mut self, symbol: &str, price: Option<Price>) -> Result<TradeRecord> {
        let price = priced(symbol, price)?;
        if self.cash < price {
            return Err(EngineError::InsufficientFunds {
                required: price,
                available: self.cash,
            });
        }

        self.cash -= price;
        *self.holdings.entry(symbol.to_string()).or_insert(0) += SHARES_PER_ORDER;
        Ok(self.record(symbol, TradeSide::Buy, price))
    }

    /// Sell one share of an existing holding.
    pub fn sell(&mut self, symbol: &str, price: Option<Price>) -> Result<TradeRecord> {
        let price = priced(symbol, price)?;
        let held = self.holding(symbol);
        if held < SHARES_PER_ORDER {
            return Err(EngineError::NoHoldings(symbol.to_string()));
        }

        self.cash += price;
        self.holdings.insert(symbol.to_string(), held - SHARES_PER_ORDER);
        Ok(self.record(symbol, TradeSide::Sell, price))
    }

    /// Market value of all holdings that have a known price.
    pub fn holdings_value(&self, prices: &HashMap<Symbol, Price>) -> Decimal {
        self.holdings
            .iter()
            .filter_map(|(symbol, qty)| prices.get(symbol).map(|p| *p * Decimal::from(*qty)))
            .sum()
    }

    /// Cash plus holdings valued at `prices`; unpriced symbols count as zero.
    pub fn net_worth(&self, prices: &HashMap<Symbol, Price>) -> Decimal {
        self.cash + self.holdings_value(prices)
    }

    fn record(&self, symbol: &str, side: TradeSide, price: Price) -> TradeRecord {
        TradeRecord {
            timestamp: Utc::now(),
            symbol: symbol.to_string(),
            side,
            price,
            quantity: SHARES_PER_ORDER,
            cash_after: self.cash,
        }
    }
}

/// A missing or zero price means the symbol has not been priced yet.
fn priced(symbol: &str, price: Option<Price>) -> Result<Price> {
    match price {
        Some(p) if p > Decimal::ZERO => Ok(p),
        _ => Err(EngineError::UnknownPrice(symbol.to_string())),
    }
}
