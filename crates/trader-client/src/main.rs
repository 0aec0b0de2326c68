mod banner;
mod command;
mod config;
mod feed;
mod input;
mod render;
mod session;

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use market_engine::{ClientEvent, Profile};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use config::ClientConfig;
use session::{Reply, Session, SessionEvent};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    // Terminal output owns stdout, so logs go to stderr at warn by default.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = ClientConfig::from_env()?;
    let profile = Profile::from_email(&config.email);

    let (ws_stream, _) = connect_async(config.feed_url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {}", config.feed_url))?;
    let (mut write, read) = ws_stream.split();
    tracing::info!("Connected to feed at {}", config.feed_url);

    let login = ClientEvent::Login(profile.email.clone()).to_json()?;
    write
        .send(Message::Text(login))
        .await
        .context("Failed to send login")?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(feed::forward_frames(read, events_tx.clone()));

    input::spawn_reader(std::io::BufReader::new(std::io::stdin()), events_tx.clone());

    let mut session =
        Session::new(profile, config.banner_duration(), events_tx).live(config.live);

    loop {
        let event = tokio::select! {
            event = events_rx.recv() => match event {
                Some(event) => event,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => SessionEvent::Input("logout".to_string()),
        };

        match session.handle(event) {
            Reply::Silent => {}
            Reply::Print(text) => println!("{}", text),
            Reply::Quit(text) => {
                if let Some(engine) = session.engine() {
                    println!("Final net worth: ${:.2}", engine.portfolio().net_worth);
                }
                println!("{}", text);
                break;
            }
        }
    }

    let _ = write.send(Message::Close(None)).await;
    reader.abort();
    Ok(())
}
