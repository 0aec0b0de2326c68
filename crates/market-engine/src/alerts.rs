use std::collections::HashMap;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::{Price, Symbol};

/// An armed (or already fired) price threshold for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub target: Price,
    pub fired: bool,
}

/// Emitted once per arm/fire cycle, when a price reaches the target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFired {
    pub symbol: Symbol,
    pub price: Price,
    pub target: Price,
}

impl AlertFired {
    /// Banner text shown to the user.
    pub fn message(&self) -> String {
        format!(
            "Alert: {} has reached ${:.2} (target ${:.2})",
            self.symbol, self.price, self.target
        )
    }
}

/// Upward threshold alerts. A symbol has no alert until one is set.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    alerts: HashMap<Symbol, PriceAlert>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm an alert from a raw numeric target.
    pub fn set_alert(&mut self, symbol: &str, target: f64) -> Result<Price> {
        if !target.is_finite() || target <= 0.0 {
            return Err(EngineError::InvalidAlert(target.to_string()));
        }
        let target = Decimal::from_f64(target)
            .ok_or_else(|| EngineError::InvalidAlert(target.to_string()))?;
        self.set_alert_price(symbol, target)
    }

    /// Arm (or re-arm) an alert. Clears any previous fired state.
    pub fn set_alert_price(&mut self, symbol: &str, target: Price) -> Result<Price> {
        if target <= Decimal::ZERO {
            return Err(EngineError::InvalidAlert(target.to_string()));
        }
        self.alerts.insert(
            symbol.to_string(),
            PriceAlert {
                target,
                fired: false,
            },
        );
        Ok(target)
    }

    /// Check a fresh price against the symbol's alert, firing at most once.
    pub fn evaluate(&mut self, symbol: &str, price: Price) -> Option<AlertFired> {
        let alert = self.alerts.get_mut(symbol)?;
        if alert.fired || price < alert.target {
            return None;
        }
        alert.fired = true;
        Some(AlertFired {
            symbol: symbol.to_string(),
            price,
            target: alert.target,
        })
    }

    pub fn get(&self, symbol: &str) -> Option<&PriceAlert> {
        self.alerts.get(symbol)
    }

    /// Whether the symbol is in the fired ("alert-active") state.
    pub fn is_active(&self, symbol: &str) -> bool {
        self.alerts.get(symbol).is_some_and(|a| a.fired)
    }

    /// Per-symbol status line.
    pub fn status_text(&self, symbol: &str) -> String {
        match self.alerts.get(symbol) {
            Some(alert) => format!("Alert set at ${:.2}", alert.target),
            None => "No alert set".to_string(),
        }
    }
}
