use anyhow::{bail, Context, Result};
use std::env;
use std::time::Duration;

pub const LOGIN_REQUIRED: &str = "Please enter both email and password";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub feed_url: String,
    pub email: String,
    pub password: String,
    pub banner_secs: u64, // 5 (alert banner auto-dismiss)
    pub live: bool,       // redraw the dashboard on every tick
}

impl ClientConfig {
    /// Credentials come from the first two CLI arguments, falling back to
    /// `TRADER_EMAIL` / `TRADER_PASSWORD`. `--live` (or `LIVE_DASHBOARD=true`)
    /// turns on the per-tick dashboard.
    pub fn from_env() -> Result<Self> {
        let args: Vec<String> = env::args().skip(1).collect();
        Self::resolve(&args, |key| env::var(key).ok())
    }

    fn resolve(args: &[String], var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let live = args.iter().any(|a| a == "--live")
            || var("LIVE_DASHBOARD").is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");
        let args: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

        let config = Self {
            feed_url: var("FEED_URL").unwrap_or_else(|| "ws://127.0.0.1:3000/ws".to_string()),
            email: args
                .first()
                .map(|s| s.to_string())
                .or_else(|| var("TRADER_EMAIL"))
                .unwrap_or_default()
                .trim()
                .to_string(),
            password: args
                .get(1)
                .map(|s| s.to_string())
                .or_else(|| var("TRADER_PASSWORD"))
                .unwrap_or_default(),
            banner_secs: var("ALERT_BANNER_SECS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("ALERT_BANNER_SECS must be a whole number of seconds")?,
            live,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.email.is_empty() || self.password.trim().is_empty() {
            bail!(LOGIN_REQUIRED);
        }
        if !self.feed_url.starts_with("ws://") && !self.feed_url.starts_with("wss://") {
            bail!("FEED_URL must be a ws:// or wss:// URL, got {}", self.feed_url);
        }
        if self.banner_secs == 0 {
            bail!("ALERT_BANNER_SECS must be greater than zero");
        }
        Ok(())
    }

    pub fn banner_duration(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }
}
