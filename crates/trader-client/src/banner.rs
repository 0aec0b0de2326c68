use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::session::SessionEvent;

/// Auto-dismiss timer for the alert banner.
///
/// Each `show` bumps the generation, cancels the pending timer and starts a
/// new one that posts `DismissBanner(generation)` back to the session. The
/// session only honours a dismissal whose generation is still current.
pub struct AlertBanner {
    duration: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl AlertBanner {
    pub fn new(duration: Duration, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            duration,
            generation: 0,
            pending: None,
            events,
        }
    }

    /// Schedule dismissal of a freshly shown banner, superseding any earlier one.
    pub fn show(&mut self) -> u64 {
        self.cancel();
        let generation = self.generation;
        let duration = self.duration;
        let events = self.events.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // The session may already be gone.
            let _ = events.send(SessionEvent::DismissBanner(generation));
        }));
        generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.pending.is_some() && self.generation == generation
    }

    /// Forget the pending timer after its dismissal has been applied.
    pub fn dismissed(&mut self) {
        self.pending = None;
    }

    /// Abort the pending timer and invalidate any dismissal already in flight.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation += 1;
    }
}

impl Drop for AlertBanner {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
