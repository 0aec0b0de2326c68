use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub tick_interval_ms: u64,     // 1000 (one snapshot per second)
    pub volatility: f64,           // 0.02 (±2% per tick)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            tick_interval_ms: 1000,
            volatility: price_feed::DEFAULT_VOLATILITY,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("PORT must be a port number")?,
            tick_interval_ms: env::var("TICK_INTERVAL_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .context("TICK_INTERVAL_MS must be an integer")?,
            volatility: env::var("FEED_VOLATILITY")
                .unwrap_or_else(|_| price_feed::DEFAULT_VOLATILITY.to_string())
                .parse()
                .context("FEED_VOLATILITY must be a number")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("TICK_INTERVAL_MS must be greater than zero");
        }
        if !(self.volatility > 0.0 && self.volatility <= 1.0) {
            bail!("FEED_VOLATILITY must be in (0, 1], got {}", self.volatility);
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
