//! Real-time sync client
//!
//! Subscribes to the server's change feed for ONE collection and keeps a
//! local copy fresh by refetching the whole collection on every change
//! signal. No incremental patching, no local merge logic.
//!
//! State machine: Disconnected → Subscribed → (change event) →
//! Refetching → Subscribed.
//!
//! The channel carries changes for the whole collection regardless of
//! franchise; tenant scoping is the refetch query's job.
//!
//! Refetches carry a generation number. A response whose generation is no
//! longer the newest is dropped, so a slow in-flight refetch can never
//! overwrite the result of a later one.
//!
//! A failed refetch logs, surfaces a user-facing notification through
//! `on_error`, and leaves the subscription open for the next event;
//! there is no automatic retry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::ClientResult;
use shared::message::{BusMessage, EventType, NotificationPayload, SyncPayload};

/// Full-collection fetch seam; implemented over [`crate::HttpClient`]
/// in production and by fixtures in tests.
#[async_trait]
pub trait CollectionFetcher<T>: Send + Sync {
    async fn fetch_all(&self) -> ClientResult<Vec<T>>;
}

/// [`CollectionFetcher`] over a typed HTTP collection endpoint
///
/// ```ignore
/// let fetcher = HttpCollectionFetcher::new(client.clone(), "/api/sessions");
/// let sub = sync::subscribe(bus_rx, "sessions", Arc::new(fetcher), on_update, on_error);
/// ```
pub struct HttpCollectionFetcher {
    client: crate::HttpClient,
    path: String,
}

impl HttpCollectionFetcher {
    pub fn new(client: crate::HttpClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }
}

#[async_trait]
impl<T> CollectionFetcher<T> for HttpCollectionFetcher
where
    T: serde::de::DeserializeOwned + Send + 'static,
{
    async fn fetch_all(&self) -> ClientResult<Vec<T>> {
        self.client.get(&self.path).await
    }
}

/// Observable subscription state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Disconnected,
    Subscribed,
    Refetching,
}

/// Handle owned by the subscriber; releases the channel on unsubscribe
/// or drop. Double-unsubscribe is a no-op.
#[derive(Debug)]
pub struct SyncSubscription {
    cancel: CancellationToken,
    state_rx: watch::Receiver<SyncState>,
}

impl SyncSubscription {
    /// Release the subscription. Idempotent: calling this twice (or
    /// after drop) does nothing further and never errors.
    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }

    /// Current subscription state
    pub fn state(&self) -> SyncState {
        *self.state_rx.borrow()
    }

    /// Wait until the state changes (test support / progress display)
    pub async fn state_changed(&mut self) -> SyncState {
        if self.state_rx.changed().await.is_err() {
            return SyncState::Disconnected;
        }
        *self.state_rx.borrow()
    }
}

impl Drop for SyncSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Subscribe to change signals for `collection`.
///
/// Every insert/update/delete notification for the collection triggers a
/// full refetch through `fetcher`; the fresh collection is republished
/// via `on_update`. `on_error` receives a user-facing notification when
/// a refetch fails.
pub fn subscribe<T, F, U, E>(
    events: broadcast::Receiver<BusMessage>,
    collection: impl Into<String>,
    fetcher: Arc<F>,
    on_update: U,
    on_error: E,
) -> SyncSubscription
where
    T: Send + 'static,
    F: CollectionFetcher<T> + 'static,
    U: Fn(Vec<T>) + Send + Sync + 'static,
    E: Fn(NotificationPayload) + Send + Sync + 'static,
{
    let collection = collection.into();
    let cancel = CancellationToken::new();
    let (state_tx, state_rx) = watch::channel(SyncState::Subscribed);

    let worker = SyncWorker {
        collection,
        fetcher,
        on_update: Arc::new(on_update),
        on_error: Arc::new(on_error),
        generation: Arc::new(AtomicU64::new(0)),
        state_tx,
        cancel: cancel.clone(),
    };

    tokio::spawn(worker.run(events));

    SyncSubscription { cancel, state_rx }
}

struct SyncWorker<T, F> {
    collection: String,
    fetcher: Arc<F>,
    on_update: Arc<dyn Fn(Vec<T>) + Send + Sync>,
    on_error: Arc<dyn Fn(NotificationPayload) + Send + Sync>,
    /// Newest issued refetch generation; stale responses are dropped
    generation: Arc<AtomicU64>,
    state_tx: watch::Sender<SyncState>,
    cancel: CancellationToken,
}

impl<T, F> SyncWorker<T, F>
where
    T: Send + 'static,
    F: CollectionFetcher<T> + 'static,
{
    async fn run(self, mut events: broadcast::Receiver<BusMessage>) {
        tracing::debug!(collection = %self.collection, "Sync subscription opened");
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                received = events.recv() => match received {
                    Ok(msg) => self.handle_message(msg),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // Missed signals still mean "something changed"
                        tracing::warn!(
                            collection = %self.collection,
                            missed,
                            "Sync channel lagged, forcing refetch"
                        );
                        self.spawn_refetch();
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!(collection = %self.collection, "Sync channel closed");
                        break;
                    }
                },
            }
        }
        let _ = self.state_tx.send(SyncState::Disconnected);
        tracing::debug!(collection = %self.collection, "Sync subscription released");
    }

    fn handle_message(&self, msg: BusMessage) {
        if msg.event_type != EventType::Sync {
            return;
        }
        let payload: SyncPayload = match msg.decode_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring undecodable sync payload");
                return;
            }
        };
        if payload.resource != self.collection {
            return;
        }
        tracing::debug!(
            collection = %self.collection,
            action = %payload.action,
            version = payload.version,
            "Change signal received"
        );
        self.spawn_refetch();
    }

    /// Issue a generation-stamped full refetch as its own task so a
    /// later signal can supersede it while it is in flight.
    fn spawn_refetch(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.state_tx.send(SyncState::Refetching);

        let fetcher = Arc::clone(&self.fetcher);
        let on_update = Arc::clone(&self.on_update);
        let on_error = Arc::clone(&self.on_error);
        let latest = Arc::clone(&self.generation);
        let state_tx = self.state_tx.clone();
        let cancel = self.cancel.clone();
        let collection = self.collection.clone();

        tokio::spawn(async move {
            let result = fetcher.fetch_all().await;
            if cancel.is_cancelled() {
                return;
            }
            match result {
                Ok(items) => {
                    if latest.load(Ordering::SeqCst) == generation {
                        on_update(items);
                    } else {
                        tracing::debug!(
                            collection = %collection,
                            generation,
                            "Dropping superseded refetch result"
                        );
                    }
                }
                Err(e) => {
                    // No retry, no teardown: stay subscribed for the next event
                    tracing::error!(collection = %collection, error = %e, "Refetch failed");
                    on_error(NotificationPayload::error(
                        "Sync refresh failed",
                        format!("Could not refresh {collection}: {e}"),
                    ));
                }
            }
            if latest.load(Ordering::SeqCst) == generation {
                let _ = state_tx.send(SyncState::Subscribed);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct CountingFetcher {
        calls: AtomicUsize,
        items: Vec<i64>,
    }

    #[async_trait]
    impl CollectionFetcher<i64> for CountingFetcher {
        async fn fetch_all(&self) -> ClientResult<Vec<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    fn sync_message(resource: &str) -> BusMessage {
        BusMessage::sync(&SyncPayload {
            resource: resource.to_string(),
            version: 1,
            action: "updated".to_string(),
            id: "1".to_string(),
            data: None,
        })
    }

    #[tokio::test]
    async fn test_change_event_triggers_one_refetch_and_callback() {
        let (tx, rx) = broadcast::channel(16);
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            items: vec![1, 2, 3],
        });
        let received: Arc<Mutex<Vec<Vec<i64>>>> = Arc::new(Mutex::new(Vec::new()));
        let received_in = Arc::clone(&received);

        let subscription = subscribe(
            rx,
            "sessions",
            Arc::clone(&fetcher),
            move |items| received_in.lock().unwrap().push(items),
            |_| {},
        );

        tx.send(sync_message("sessions")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let updates = received.lock().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0], vec![1, 2, 3]);
        drop(updates);

        subscription.unsubscribe();
    }

    #[tokio::test]
    async fn test_other_collections_are_ignored() {
        let (tx, rx) = broadcast::channel(16);
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            items: vec![],
        });

        let _subscription = subscribe(rx, "sessions", Arc::clone(&fetcher), |_| {}, |_| {});

        tx.send(sync_message("guests")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_double_unsubscribe_does_not_error() {
        let (_tx, rx) = broadcast::channel(16);
        let fetcher = Arc::new(CountingFetcher {
            calls: AtomicUsize::new(0),
            items: vec![],
        });
        let subscription = subscribe(rx, "sessions", fetcher, |_| {}, |_| {});

        subscription.unsubscribe();
        subscription.unsubscribe();
    }

    struct FailingFetcher;

    #[async_trait]
    impl CollectionFetcher<i64> for FailingFetcher {
        async fn fetch_all(&self) -> ClientResult<Vec<i64>> {
            Err(ClientError::Internal("backend down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_refetch_notifies_and_stays_subscribed() {
        let (tx, rx) = broadcast::channel(16);
        let errors: Arc<Mutex<Vec<NotificationPayload>>> = Arc::new(Mutex::new(Vec::new()));
        let errors_in = Arc::clone(&errors);

        let subscription = subscribe(
            rx,
            "sessions",
            Arc::new(FailingFetcher),
            |_: Vec<i64>| panic!("no update expected"),
            move |notification| errors_in.lock().unwrap().push(notification),
        );

        tx.send(sync_message("sessions")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        assert_eq!(errors.lock().unwrap().len(), 1);
        // Channel still open: a second event reaches the worker again
        tx.send(sync_message("sessions")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(errors.lock().unwrap().len(), 2);

        subscription.unsubscribe();
    }

    /// Fetcher whose first call blocks until released, returning stale
    /// data; later calls return fresh data immediately.
    struct RacingFetcher {
        calls: AtomicUsize,
        gate: tokio::sync::Semaphore,
    }

    #[async_trait]
    impl CollectionFetcher<i64> for RacingFetcher {
        async fn fetch_all(&self) -> ClientResult<Vec<i64>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                // First (stale) fetch waits for the gate
                let _permit = self.gate.acquire().await.map_err(|_| {
                    ClientError::Internal("gate closed".to_string())
                })?;
                Ok(vec![1])
            } else {
                Ok(vec![2])
            }
        }
    }

    #[tokio::test]
    async fn test_superseded_refetch_is_dropped() {
        let (tx, rx) = broadcast::channel(16);
        let fetcher = Arc::new(RacingFetcher {
            calls: AtomicUsize::new(0),
            gate: tokio::sync::Semaphore::new(0),
        });
        let received: Arc<Mutex<Vec<Vec<i64>>>> = Arc::new(Mutex::new(Vec::new()));
        let received_in = Arc::clone(&received);

        let subscription = subscribe(
            rx,
            "sessions",
            Arc::clone(&fetcher),
            move |items| received_in.lock().unwrap().push(items),
            |_| {},
        );

        // First signal: refetch blocks on the gate
        tx.send(sync_message("sessions")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        // Second signal supersedes it; its fetch returns fresh data
        tx.send(sync_message("sessions")).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        // Release the stale fetch
        fetcher.gate.add_permits(1);
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        let updates = received.lock().unwrap();
        // Only the fresh result was published; stale vec![1] was dropped
        assert_eq!(*updates, vec![vec![2]]);

        drop(updates);
        subscription.unsubscribe();
    }
}
