//! JSON frames exchanged between the feed server and trading clients.
//!
//! Every frame is `{"event": "<name>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::models::{PriceSnapshot, Symbol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Reply to `login`: the tradable universe for this session.
    InitData { available: Vec<Symbol> },
    /// Full price snapshot, broadcast every tick.
    MarketUpdate(PriceSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    Login(String),
}

impl ServerEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

impl ClientEvent {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_login_frame_shape() {
        let frame = ClientEvent::Login("trader@example.com".into()).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value, json!({"event": "login", "data": "trader@example.com"}));
    }

    #[test]
    fn test_init_data_frame_shape() {
        let frame = ServerEvent::InitData {
            available: vec!["GOOG".into(), "TSLA".into()],
        }
        .to_json()
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(
            value,
            json!({"event": "init-data", "data": {"available": ["GOOG", "TSLA"]}})
        );
    }

    #[test]
    fn test_market_update_prices_are_numbers() {
        let raw = r#"{"event":"market-update","data":{"GOOG":140.25,"TSLA":250.0}}"#;
        let event = ServerEvent::from_json(raw).unwrap();
        match event {
            ServerEvent::MarketUpdate(prices) => {
                assert_eq!(prices.get("GOOG"), Some(&dec!(140.25)));
                assert_eq!(prices.get("TSLA"), Some(&dec!(250)));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_unknown_event_rejected() {
        assert!(ClientEvent::from_json(r#"{"event":"buy","data":"GOOG"}"#).is_err());
    }
}
