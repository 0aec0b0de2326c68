use std::sync::Arc;
use std::time::Duration;

use market_engine::PriceSnapshot;
use price_feed::PriceGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, Notify, RwLock};
use tokio::time::{self, Instant, MissedTickBehavior};

// ---------------------------------------------------------------------------
// Broadcast channel + latest snapshot, shared by the ticker and every socket
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct FeedBroadcast {
    ticks: broadcast::Sender<PriceSnapshot>,
    latest: Arc<RwLock<PriceSnapshot>>,
}

impl FeedBroadcast {
    pub fn new(initial: PriceSnapshot) -> Self {
        let (ticks, _) = broadcast::channel(64);
        Self {
            ticks,
            latest: Arc::new(RwLock::new(initial)),
        }
    }

    /// Update the cached snapshot and fan it out to every subscriber.
    pub async fn publish(&self, snapshot: PriceSnapshot) {
        {
            let mut latest = self.latest.write().await;
            *latest = snapshot.clone();
        }
        // No receivers just means nobody is connected yet.
        let _ = self.ticks.send(snapshot);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PriceSnapshot> {
        self.ticks.subscribe()
    }

    pub async fn latest(&self) -> PriceSnapshot {
        self.latest.read().await.clone()
    }

    pub fn receiver_count(&self) -> usize {
        self.ticks.receiver_count()
    }
}

/// Advance the generator once per `period` and publish each snapshot until
/// `shutdown` is notified. The first tick fires one period after start.
pub async fn run_feed(
    mut generator: PriceGenerator,
    period: Duration,
    feed: FeedBroadcast,
    shutdown: Arc<Notify>,
) {
    let mut rng = StdRng::from_entropy();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        "Price feed started: {} symbols every {:?}",
        generator.universe().len(),
        period
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let snapshot = generator.tick(&mut rng);
                tracing::debug!("Tick for {} listeners", feed.receiver_count());
                feed.publish(snapshot).await;
            }
            _ = shutdown.notified() => {
                tracing::info!("Price feed stopped");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use price_feed::{default_universe, DEFAULT_VOLATILITY};

    fn generator() -> PriceGenerator {
        PriceGenerator::new(default_universe(), DEFAULT_VOLATILITY).unwrap()
    }

    #[tokio::test]
    async fn test_publish_updates_cache() {
        let feed = FeedBroadcast::new(generator().snapshot());
        let mut rx = feed.subscribe();

        let mut next = generator().snapshot();
        next.insert("GOOG".into(), rust_decimal_macros::dec!(141.11));
        feed.publish(next.clone()).await;

        assert_eq!(rx.recv().await.unwrap(), next);
        assert_eq!(feed.latest().await, next);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_ticks_each_period() {
        let gen = generator();
        let feed = FeedBroadcast::new(gen.snapshot());
        let mut rx = feed.subscribe();
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(run_feed(
            gen,
            Duration::from_secs(1),
            feed.clone(),
            shutdown.clone(),
        ));

        let start = Instant::now();
        let first = rx.recv().await.unwrap();
        assert_eq!(first.len(), 5);
        assert!(start.elapsed() >= Duration::from_secs(1));

        rx.recv().await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(2));

        shutdown.notify_one();
        task.await.unwrap();
    }
}
