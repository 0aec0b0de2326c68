use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures_util::{SinkExt, StreamExt};
use market_engine::{ClientEvent, PriceSnapshot, ServerEvent, Symbol};
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

use crate::{ApiResponse, AppState};

// ---------------------------------------------------------------------------
// WebSocket handler: /ws
// ---------------------------------------------------------------------------

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = Uuid::new_v4();
    tracing::info!("New client connected: {}", conn_id);

    let (mut sender, mut receiver) = socket.split();
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut ticks = state.feed.subscribe();

    // Every connection gets every tick, logged in or not; direct replies
    // share the same writer so frames never interleave.
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                reply = reply_rx.recv() => match reply {
                    Some(event) => event,
                    None => break,
                },
                tick = ticks.recv() => match tick {
                    Ok(snapshot) => ServerEvent::MarketUpdate(snapshot),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Client {} lagged, skipped {} ticks", conn_id, skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            let json = match event.to_json() {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to encode frame for {}: {}", conn_id, e);
                    continue;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let universe = state.universe.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    if let Some(reply) = handle_client_frame(&text, &universe, conn_id) {
                        if reply_tx.send(reply).is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => break,
                _ => {} // axum answers pings itself
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::info!("Client disconnected: {}", conn_id);
}

/// Decode one client frame and produce the direct reply, if any.
pub(crate) fn handle_client_frame(
    text: &str,
    universe: &[Symbol],
    conn_id: Uuid,
) -> Option<ServerEvent> {
    match ClientEvent::from_json(text) {
        Ok(ClientEvent::Login(email)) => {
            tracing::info!("User logged in: {} ({})", email, conn_id);
            Some(ServerEvent::InitData {
                available: universe.to_vec(),
            })
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed frame from {}: {}", conn_id, e);
            None
        }
    }
}

// ---------------------------------------------------------------------------
// REST fallback: /api/prices
// ---------------------------------------------------------------------------

async fn get_prices(State(state): State<AppState>) -> Json<ApiResponse<PriceSnapshot>> {
    Json(ApiResponse::success(state.feed.latest().await))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn ws_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/api/prices", get(get_prices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<Symbol> {
        vec!["GOOG".into(), "TSLA".into()]
    }

    #[test]
    fn test_login_replies_with_universe() {
        let reply = handle_client_frame(
            r#"{"event":"login","data":"trader@example.com"}"#,
            &universe(),
            Uuid::new_v4(),
        );
        assert_eq!(
            reply,
            Some(ServerEvent::InitData {
                available: universe()
            })
        );
    }

    #[test]
    fn test_malformed_frames_ignored() {
        assert!(handle_client_frame("not json", &universe(), Uuid::new_v4()).is_none());
        assert!(handle_client_frame(r#"{"event":"sell","data":"GOOG"}"#, &universe(), Uuid::new_v4()).is_none());
    }
}
