use std::fmt::Write;

use market_engine::{NetWorthTrend, Price, PriceMove, Profile, QuoteView, TradeRecord, ViewModel};
use rust_decimal::prelude::*;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub const HELP: &str = "\
Commands:
  watch SYM        add or remove a symbol from the watchlist
  buy SYM          buy one share at the latest price
  sell SYM         sell one share at the latest price
  alert SYM PRICE  notify when SYM reaches PRICE
  show             print the dashboard
  logout | quit    end the session
  help             this list";

pub fn welcome(profile: &Profile, universe: &[String]) -> String {
    format!(
        "[{}] Welcome, {}! Trading {}. Type 'help' for commands.",
        profile.avatar,
        profile.display_name,
        universe.join(", ")
    )
}

pub fn dashboard(profile: &Profile, view: &ViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}] {}  ({} watched)",
        profile.avatar, profile.display_name, view.watched_count
    );

    let trend = match view.portfolio.trend {
        NetWorthTrend::AtOrAbove => "▲",
        NetWorthTrend::Below => "▼",
    };
    let _ = writeln!(
        out,
        "Cash ${:.2} | Holdings ${:.2} | Net worth ${:.2} {}",
        view.portfolio.cash, view.portfolio.holdings_value, view.portfolio.net_worth, trend
    );

    if view.prices.is_empty() {
        let _ = writeln!(out, "Market: waiting for prices...");
    } else {
        let market: Vec<String> = view
            .prices
            .iter()
            .map(|(symbol, price)| format!("{} ${:.2}", symbol, price))
            .collect();
        let _ = writeln!(out, "Market: {}", market.join("  "));
    }

    match &view.watchlist {
        Some(agg) => {
            let _ = writeln!(
                out,
                "Watchlist ({}): high ${:.2}  low ${:.2}  avg ${:.2}",
                agg.count, agg.high, agg.low, agg.average
            );
        }
        None => {
            let _ = writeln!(out, "Watchlist ({}): --", view.watched_count);
        }
    }
    for quote in &view.quotes {
        let _ = writeln!(out, "  {}", quote_line(quote));
    }

    if !view.journal.is_empty() {
        let _ = writeln!(out, "Recent trades:");
        for trade in &view.journal {
            let _ = writeln!(out, "  {}", trade_line(trade));
        }
    }

    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "!! {}", banner);
    }

    out.trim_end().to_string()
}

fn quote_line(quote: &QuoteView) -> String {
    let price = match quote.price {
        Some(p) => format!("${:.2}", p),
        None => "--".to_string(),
    };
    let arrow = match quote.direction {
        Some(PriceMove::Up) => "▲",
        Some(PriceMove::Down) => "▼",
        None => " ",
    };
    let flag = if quote.alert_active { " *" } else { "" };

    format!(
        "{:<5} {:>10} {} owned {:<3} {}{}  {}",
        quote.symbol,
        price,
        arrow,
        quote.owned,
        quote.alert_status,
        flag,
        sparkline(&quote.history)
    )
}

pub fn trade_line(trade: &TradeRecord) -> String {
    format!(
        "{} {} {} {} @ ${:.2} (cash ${:.2})",
        trade.timestamp.format("%H:%M:%S"),
        trade.side,
        trade.quantity,
        trade.symbol,
        trade.price,
        trade.cash_after
    )
}

/// One block character per history point, scaled between the window's min and max.
pub fn sparkline(history: &[Price]) -> String {
    let Some(first) = history.first() else {
        return String::new();
    };
    let (low, high) = history
        .iter()
        .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let range = high - low;
    let top = SPARK.len() - 1;

    history
        .iter()
        .map(|p| {
            if range.is_zero() {
                return SPARK[top / 2];
            }
            let idx = ((*p - low) / range * Decimal::from(top))
                .round()
                .to_usize()
                .unwrap_or(0);
            SPARK[idx.min(top)]
        })
        .collect()
}
