//! # SubscriberSet: fan-out over multiple subscribers
//!
//! [`SubscriberSet`] distributes each [`Event`] to multiple subscribers, each
//! processing it on its own worker task.
//!
//! ## What it guarantees
//! - Every event reaches every live subscriber (no drops).
//! - Per-subscriber FIFO (queue order).
//! - Panics inside subscribers are caught and logged (isolation).
//! - `shutdown()` drains every queue before returning.
//!
//! ## Backpressure
//! `emit(Event).await` returns once the event is queued for every subscriber.
//! While a queue is full the caller waits for that worker to catch up, so a
//! slow subscriber slows the tick loop down instead of losing events. The
//! tick loop only emits between ticks, so a tick is never suspended midway.
//!
//! ## What it does **not** guarantee
//! - No global ordering across different subscribers.
//!
//! ## Diagram
//! ```text
//!    emit(Event).await
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        ├────────────────► [queue S2] ─► worker S2 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::Subscribe;

/// Per-subscriber channel with metadata
struct SubscriberChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-subscriber bounded queues and worker tasks.
///
/// Must be created inside a Tokio runtime.
pub struct SubscriberSet {
    channels: Vec<SubscriberChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Creates a new set and spawns one worker per subscriber.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = sub.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await
                    {
                        tracing::error!(
                            subscriber = sub.name(),
                            seq = ev.seq,
                            "subscriber panicked: {}",
                            panic_message(&*panic_err),
                        );
                    }
                }
            });

            channels.push(SubscriberChannel { name, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Creates a set with no subscribers.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Fan-out one event to all subscribers.
    ///
    /// Waits while a subscriber's queue is full. A subscriber whose worker is
    /// gone (closed queue) is skipped with a warning.
    pub async fn emit(&self, event: Event) {
        let ev = Arc::new(event);
        for channel in &self.channels {
            if channel.sender.send(Arc::clone(&ev)).await.is_err() {
                tracing::warn!(
                    subscriber = channel.name,
                    seq = ev.seq,
                    "subscriber dropped event: worker closed"
                );
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no subscribers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct Collect {
        seen: Mutex<Vec<u64>>,
    }

    #[async_trait]
    impl Subscribe for Collect {
        async fn on_event(&self, ev: &Event) {
            self.seen.lock().await.push(ev.seq);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    /// One-slot queue with a handler that yields before recording.
    #[derive(Default)]
    struct Slow {
        count: Mutex<usize>,
    }

    #[async_trait]
    impl Subscribe for Slow {
        async fn on_event(&self, _ev: &Event) {
            tokio::task::yield_now().await;
            *self.count.lock().await += 1;
        }
        fn queue_capacity(&self) -> usize {
            1
        }
    }

    struct Explode;

    #[async_trait]
    impl Subscribe for Explode {
        async fn on_event(&self, _ev: &Event) {
            panic!("boom");
        }
    }

    #[tokio::test]
    async fn test_fifo_delivery_to_every_subscriber() {
        let a = Arc::new(Collect::default());
        let b = Arc::new(Collect::default());
        let list: Vec<Arc<dyn Subscribe>> = vec![a.clone(), b.clone()];
        let set = SubscriberSet::new(list);
        assert_eq!(set.len(), 2);

        let mut sent = Vec::new();
        for _ in 0..10 {
            let ev = Event::new(EventKind::RunStarted);
            sent.push(ev.seq);
            set.emit(ev).await;
        }
        set.shutdown().await;

        assert_eq!(*a.seen.lock().await, sent);
        assert_eq!(*b.seen.lock().await, sent);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_full_queue_waits_instead_of_dropping() {
        let slow = Arc::new(Slow::default());
        let set = SubscriberSet::new(vec![slow.clone() as Arc<dyn Subscribe>]);
        for _ in 0..500 {
            set.emit(Event::new(EventKind::TickCompleted)).await;
        }
        set.shutdown().await;
        assert_eq!(*slow.count.lock().await, 500);
    }

    #[tokio::test]
    async fn test_panicking_subscriber_is_isolated() {
        let ok = Arc::new(Collect::default());
        let list: Vec<Arc<dyn Subscribe>> = vec![Arc::new(Explode), ok.clone()];
        let set = SubscriberSet::new(list);
        set.emit(Event::new(EventKind::RunStarted)).await;
        set.emit(Event::new(EventKind::RunFinished)).await;
        set.shutdown().await;
        assert_eq!(ok.seen.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn test_empty_set() {
        let set = SubscriberSet::empty();
        assert!(set.is_empty());
        set.emit(Event::new(EventKind::RunStarted)).await;
        set.shutdown().await;
    }
}
