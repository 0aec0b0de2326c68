use market_engine::{EngineError, Symbol};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}'. Type 'help' for the list of commands.")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Watch(Symbol),
    Buy(Symbol),
    Sell(Symbol),
    Alert { symbol: Symbol, target: f64 },
    Show,
    Help,
    Logout,
}

impl Command {
    /// Parse a command line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let symbol = words.next().map(|s| s.to_ascii_uppercase());

        let command = match (verb.to_ascii_lowercase().as_str(), symbol) {
            ("watch", Some(symbol)) => Command::Watch(symbol),
            ("watch", None) => return Err(CommandError::Usage("watch SYMBOL")),
            ("buy", Some(symbol)) => Command::Buy(symbol),
            ("buy", None) => return Err(CommandError::Usage("buy SYMBOL")),
            ("sell", Some(symbol)) => Command::Sell(symbol),
            ("sell", None) => return Err(CommandError::Usage("sell SYMBOL")),
            ("alert", Some(symbol)) => {
                let raw: Vec<&str> = words.collect();
                Command::Alert {
                    symbol,
                    target: parse_alert_price(&raw.join(" "))?,
                }
            }
            ("alert", None) => return Err(CommandError::Usage("alert SYMBOL PRICE")),
            ("show", _) => Command::Show,
            ("help", _) => Command::Help,
            ("logout" | "quit" | "exit", _) => Command::Logout,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Validate free-form alert input: a finite number above zero, `$` allowed.
pub fn parse_alert_price(input: &str) -> Result<f64, EngineError> {
    let trimmed = input.trim();
    let cleaned = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    match cleaned.parse::<f64>() {
        Ok(target) if target.is_finite() && target > 0.0 => Ok(target),
        _ => Err(EngineError::InvalidAlert(trimmed.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trading_commands() {
        assert_eq!(Command::parse("buy goog"), Ok(Some(Command::Buy("GOOG".into()))));
        assert_eq!(Command::parse("  SELL tsla "), Ok(Some(Command::Sell("TSLA".into()))));
        assert_eq!(Command::parse("watch NVDA"), Ok(Some(Command::Watch("NVDA".into()))));
        assert_eq!(
            Command::parse("alert tsla $260.50"),
            Ok(Some(Command::Alert {
                symbol: "TSLA".into(),
                target: 260.5
            }))
        );
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("show"), Ok(Some(Command::Show)));
        assert_eq!(Command::parse("HELP"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("quit"), Ok(Some(Command::Logout)));
        assert_eq!(Command::parse("logout"), Ok(Some(Command::Logout)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("buy"), Err(CommandError::Usage("buy SYMBOL")));
        assert_eq!(
            Command::parse("short GOOG"),
            Err(CommandError::Unknown("short".into()))
        );
        assert!(matches!(
            Command::parse("alert GOOG"),
            Err(CommandError::Engine(EngineError::InvalidAlert(_)))
        ));
    }

    #[test]
    fn test_alert_price_validation() {
        assert_eq!(parse_alert_price("150"), Ok(150.0));
        assert_eq!(parse_alert_price(" $99.5 "), Ok(99.5));
        for bad in ["", "   ", "abc", "0", "-5", "NaN", "inf"] {
            assert!(
                matches!(parse_alert_price(bad), Err(EngineError::InvalidAlert(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
