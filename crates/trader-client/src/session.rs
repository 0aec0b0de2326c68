use std::time::Duration;

use market_engine::{EngineError, MarketEngine, PriceSnapshot, Profile, Symbol, TradeRecord};
use tokio::sync::mpsc;

use crate::banner::AlertBanner;
use crate::command::{Command, CommandError};
use crate::render;

/// Everything that may touch the engine, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// `init-data` from the feed: the tradable universe.
    Init(Vec<Symbol>),
    /// `market-update` from the feed.
    Tick(PriceSnapshot),
    /// A raw line typed by the user.
    Input(String),
    DismissBanner(u64),
    Disconnected(String),
}

/// What the terminal should do after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Silent,
    Print(String),
    Quit(String),
}

/// Single owner of the session's engine. Every mutation goes through
/// [`Session::handle`], one event at a time.
pub struct Session {
    profile: Profile,
    engine: Option<MarketEngine>,
    banner: AlertBanner,
    live: bool,
}

impl Session {
    pub fn new(
        profile: Profile,
        banner_duration: Duration,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            profile,
            engine: None,
            banner: AlertBanner::new(banner_duration, events),
            live: false,
        }
    }

    /// Redraw the full dashboard from every tick's view model instead of
    /// printing only alert banners.
    pub fn live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn engine(&self) -> Option<&MarketEngine> {
        self.engine.as_ref()
    }

    pub fn handle(&mut self, event: SessionEvent) -> Reply {
        match event {
            SessionEvent::Init(universe) => self.init(universe),
            SessionEvent::Tick(snapshot) => self.tick(&snapshot),
            SessionEvent::Input(line) => match Command::parse(&line) {
                Ok(Some(command)) => self.command(command),
                Ok(None) => Reply::Silent,
                Err(e) => Reply::Print(notice(&e)),
            },
            SessionEvent::DismissBanner(generation) => {
                if self.banner.is_current(generation) {
                    self.banner.dismissed();
                    if let Some(engine) = self.engine.as_mut() {
                        engine.dismiss_banner();
                    }
                }
                Reply::Silent
            }
            SessionEvent::Disconnected(reason) => {
                self.banner.cancel();
                Reply::Quit(format!("Disconnected from feed: {}", reason))
            }
        }
    }

    fn init(&mut self, universe: Vec<Symbol>) -> Reply {
        if self.engine.is_some() {
            tracing::warn!("Ignoring repeated init-data");
            return Reply::Silent;
        }
        tracing::info!(
            "Session started for {} with {} symbols",
            self.profile.email,
            universe.len()
        );
        let engine = MarketEngine::new(universe);
        let greeting = render::welcome(&self.profile, engine.universe());
        self.engine = Some(engine);
        Reply::Print(greeting)
    }

    fn tick(&mut self, snapshot: &PriceSnapshot) -> Reply {
        let Some(engine) = self.engine.as_mut() else {
            tracing::debug!("Tick before init-data, dropped");
            return Reply::Silent;
        };

        let outcome = engine.apply_tick(snapshot);
        if !outcome.fired.is_empty() {
            self.banner.show();
        }

        // The tick's view model is the presentation contract: live mode draws
        // all of it, otherwise only a fresh banner is worth interrupting for.
        if self.live {
            return Reply::Print(render::dashboard(&self.profile, &outcome.view));
        }
        match outcome.view.banner {
            Some(banner) if !outcome.fired.is_empty() => Reply::Print(format!("!! {}", banner)),
            _ => Reply::Silent,
        }
    }

    fn command(&mut self, command: Command) -> Reply {
        match command {
            Command::Help => Reply::Print(render::HELP.to_string()),
            Command::Logout => {
                self.banner.cancel();
                tracing::info!("{} logged out", self.profile.email);
                Reply::Quit(format!("Goodbye, {}!", self.profile.display_name))
            }
            Command::Show => {
                self.with_engine(|engine, profile| Ok(render::dashboard(profile, &engine.view())))
            }
            Command::Watch(symbol) => self.with_engine(|engine, _| {
                let watched = engine.toggle_watch(&symbol)?;
                Ok(if watched {
                    format!("Watching {}", symbol)
                } else {
                    format!("Removed {} from watchlist", symbol)
                })
            }),
            Command::Buy(symbol) => {
                self.with_engine(|engine, _| Ok(confirmation("Bought", &engine.buy(&symbol)?)))
            }
            Command::Sell(symbol) => {
                self.with_engine(|engine, _| Ok(confirmation("Sold", &engine.sell(&symbol)?)))
            }
            Command::Alert { symbol, target } => self.with_engine(|engine, _| {
                let target = engine.set_alert(&symbol, target)?;
                Ok(format!("{}: Alert set at ${:.2}", symbol, target))
            }),
        }
    }

    /// Run an engine command, turning rejections into a printed notice.
    fn with_engine<F>(&mut self, f: F) -> Reply
    where
        F: FnOnce(&mut MarketEngine, &Profile) -> Result<String, EngineError>,
    {
        let Some(engine) = self.engine.as_mut() else {
            return Reply::Print("Waiting for market data...".to_string());
        };
        match f(engine, &self.profile) {
            Ok(text) => Reply::Print(text),
            Err(e) => Reply::Print(notice(&CommandError::from(e))),
        }
    }
}

fn confirmation(verb: &str, trade: &TradeRecord) -> String {
    format!(
        "{} {} {} @ ${:.2}. Cash: ${:.2}",
        verb, trade.quantity, trade.symbol, trade.price, trade.cash_after
    )
}

fn notice(error: &CommandError) -> String {
    format!("Error: {}", error)
}
