use futures_util::{Stream, StreamExt};
use market_engine::ServerEvent;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::{self, Message};

use crate::session::SessionEvent;

/// Map one text frame from the feed server onto a session event.
pub fn decode_frame(text: &str) -> Option<SessionEvent> {
    match ServerEvent::from_json(text) {
        Ok(ServerEvent::InitData { available }) => Some(SessionEvent::Init(available)),
        Ok(ServerEvent::MarketUpdate(snapshot)) => Some(SessionEvent::Tick(snapshot)),
        Err(e) => {
            tracing::warn!("Unrecognised feed frame: {}", e);
            None
        }
    }
}

/// Forward feed frames to the session until the socket closes, then report why.
pub async fn forward_frames<S>(mut read: S, events: mpsc::UnboundedSender<SessionEvent>)
where
    S: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    let reason = loop {
        match read.next().await {
            Some(Ok(Message::Text(text))) => {
                if let Some(event) = decode_frame(&text) {
                    if events.send(event).is_err() {
                        return;
                    }
                }
            }
            Some(Ok(Message::Close(_))) | None => break "connection closed".to_string(),
            Some(Err(e)) => break e.to_string(),
            Some(Ok(_)) => {}
        }
    };

    tracing::info!("Feed connection ended: {}", reason);
    let _ = events.send(SessionEvent::Disconnected(reason));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_frames() {
        assert_eq!(
            decode_frame(r#"{"event":"init-data","data":{"available":["GOOG","TSLA"]}}"#),
            Some(SessionEvent::Init(vec!["GOOG".into(), "TSLA".into()]))
        );

        match decode_frame(r#"{"event":"market-update","data":{"GOOG":140.12,"TSLA":250}}"#) {
            Some(SessionEvent::Tick(snapshot)) => {
                assert_eq!(snapshot["GOOG"], dec!(140.12));
                assert_eq!(snapshot["TSLA"], dec!(250));
            }
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(decode_frame(r#"{"event":"news","data":{}}"#), None);
    }

    #[tokio::test]
    async fn test_forward_until_close() {
        let frames: Vec<Result<Message, tungstenite::Error>> = vec![
            Ok(Message::Text(
                r#"{"event":"init-data","data":{"available":["GOOG"]}}"#.to_string(),
            )),
            Ok(Message::Text("garbage".to_string())),
            Ok(Message::Close(None)),
        ];
        let (tx, mut rx) = mpsc::unbounded_channel();

        forward_frames(stream::iter(frames), tx).await;

        assert_eq!(rx.recv().await, Some(SessionEvent::Init(vec!["GOOG".into()])));
        assert!(matches!(rx.recv().await, Some(SessionEvent::Disconnected(_))));
        assert_eq!(rx.recv().await, None);
    }
}
