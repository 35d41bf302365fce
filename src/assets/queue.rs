//! Asset worker queue.
//!
//! - Bounded worker pool resolving requests through an `AssetFetcher`
//! - Results are delivered over a flume channel and polled by the UI loop
//! - Completed outcomes are remembered in an LRU so remounted cards resolve
//!   immediately instead of refetching

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, trace, warn};

use super::{AssetError, AssetEvent, AssetFetcher, AssetKind, AssetRequest};
use crate::interaction::CardKey;

/// Default number of worker threads.
const DEFAULT_WORKERS: usize = 2;

/// Maximum number of worker threads.
const MAX_WORKERS: usize = 4;

/// Maximum number of pending requests in the queue.
const MAX_QUEUE_SIZE: usize = 64;

/// Default number of remembered outcomes.
const DEFAULT_CACHE_ENTRIES: usize = 128;

/// How long a worker blocks before re-checking the shutdown flag.
const WORKER_POLL: Duration = Duration::from_millis(100);

type PendingSet = Arc<RwLock<HashSet<(CardKey, AssetKind)>>>;
type OutcomeCache = Arc<Mutex<LruCache<(AssetKind, String), Result<(), AssetError>>>>;

/// Worker queue for card asset loads.
pub struct AssetQueue {
    /// Sender for new requests.
    request_tx: Sender<AssetRequest>,
    /// Sender used to replay cached outcomes without a worker round-trip.
    result_tx: Sender<AssetEvent>,
    /// Receiver for completed results (UI loop reads this).
    result_rx: Receiver<AssetEvent>,
    /// Worker thread handles.
    workers: Vec<JoinHandle<()>>,
    /// Flag to signal workers to stop.
    shutdown: Arc<AtomicBool>,
    /// Number of workers currently fetching.
    active_workers: Arc<AtomicUsize>,
    /// Requests sent to workers and not yet completed.
    pending: PendingSet,
    /// Completed outcomes keyed by (kind, id).
    outcomes: OutcomeCache,
}

impl AssetQueue {
    /// Create a queue with the given worker count and fetch backend.
    pub fn with_fetcher<F: AssetFetcher>(
        workers: usize,
        cache_entries: usize,
        fetcher: F,
    ) -> Result<Self> {
        let num_workers = workers.clamp(1, MAX_WORKERS);
        let capacity = NonZeroUsize::new(cache_entries).unwrap_or(NonZeroUsize::MIN);

        let (request_tx, request_rx) = flume::bounded(MAX_QUEUE_SIZE);
        let (result_tx, result_rx) = flume::unbounded();

        let shutdown = Arc::new(AtomicBool::new(false));
        let active_workers = Arc::new(AtomicUsize::new(0));
        let pending: PendingSet = Arc::new(RwLock::new(HashSet::new()));
        let outcomes: OutcomeCache = Arc::new(Mutex::new(LruCache::new(capacity)));
        let fetcher = Arc::new(fetcher);

        let mut worker_handles = Vec::with_capacity(num_workers);

        for worker_id in 0..num_workers {
            let ctx = WorkerContext {
                worker_id,
                rx: request_rx.clone(),
                tx: result_tx.clone(),
                shutdown: Arc::clone(&shutdown),
                active: Arc::clone(&active_workers),
                pending: Arc::clone(&pending),
                outcomes: Arc::clone(&outcomes),
                fetcher: Arc::clone(&fetcher),
            };

            let handle = thread::Builder::new()
                .name(format!("asset-worker-{}", worker_id))
                .spawn(move || worker_loop(ctx))
                .context("Failed to spawn asset worker")?;

            worker_handles.push(handle);
        }

        debug!(num_workers, "Started asset worker queue");

        Ok(Self {
            request_tx,
            result_tx,
            result_rx,
            workers: worker_handles,
            shutdown,
            active_workers,
            pending,
            outcomes,
        })
    }

    /// Submit a load request.
    ///
    /// Returns false if the same card already has this asset in flight. A
    /// request that cannot be queued is reported back as a failure so the
    /// card keeps its fallback visual.
    pub fn request(&self, req: AssetRequest) -> bool {
        let pending_key = (req.key.clone(), req.kind);
        if self.pending.read().contains(&pending_key) {
            trace!(key = %req.key, kind = %req.kind, "Request already pending");
            return false;
        }

        let cached = self
            .outcomes
            .lock()
            .get(&(req.kind, req.id().to_string()))
            .cloned();
        if let Some(outcome) = cached {
            trace!(key = %req.key, kind = %req.kind, "Replaying cached asset outcome");
            let event = AssetEvent {
                key: req.key,
                kind: req.kind,
                outcome,
            };
            return self.result_tx.send(event).is_ok();
        }

        self.pending.write().insert(pending_key.clone());

        match self.request_tx.try_send(req) {
            Ok(_) => true,
            Err(flume::TrySendError::Full(req)) => {
                warn!(key = %req.key, kind = %req.kind, "Asset queue full, failing request");
                self.pending.write().remove(&pending_key);
                let error = AssetError::failed(req.kind, req.id(), "queue full");
                let _ = self
                    .result_tx
                    .send(AssetEvent::failed(req.key, req.kind, error));
                false
            }
            Err(flume::TrySendError::Disconnected(req)) => {
                error!(key = %req.key, "Asset queue disconnected");
                self.pending.write().remove(&pending_key);
                let _ = self
                    .result_tx
                    .send(AssetEvent::failed(req.key, req.kind, AssetError::Cancelled));
                false
            }
        }
    }

    /// Poll for completed loads (non-blocking).
    pub fn poll_results(&self) -> Vec<AssetEvent> {
        let mut results = Vec::new();
        while let Ok(result) = self.result_rx.try_recv() {
            results.push(result);
        }
        results
    }

    /// Block until no request is in flight, or the timeout elapses.
    ///
    /// Returns true if the queue went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.is_busy() {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(2));
        }
        true
    }

    /// Get the number of pending requests.
    pub fn pending_count(&self) -> usize {
        self.pending.read().len()
    }

    /// Get the number of workers currently fetching.
    pub fn active_worker_count(&self) -> usize {
        self.active_workers.load(Ordering::Relaxed)
    }

    /// Check if there is work in progress.
    pub fn is_busy(&self) -> bool {
        !self.pending.read().is_empty() || self.active_worker_count() > 0
    }

    /// Shutdown the worker queue.
    pub fn shutdown(&mut self) {
        debug!("Shutting down asset queue");

        self.shutdown.store(true, Ordering::SeqCst);

        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }

        debug!("Asset queue shutdown complete");
    }
}

impl Drop for AssetQueue {
    fn drop(&mut self) {
        if !self.shutdown.load(Ordering::Relaxed) {
            self.shutdown();
        }
    }
}

struct WorkerContext<F> {
    worker_id: usize,
    rx: Receiver<AssetRequest>,
    tx: Sender<AssetEvent>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
    pending: PendingSet,
    outcomes: OutcomeCache,
    fetcher: Arc<F>,
}

/// Worker thread loop.
fn worker_loop<F: AssetFetcher>(ctx: WorkerContext<F>) {
    let worker_id = ctx.worker_id;
    debug!(worker_id, "Asset worker started");

    loop {
        if ctx.shutdown.load(Ordering::Relaxed) {
            break;
        }

        match ctx.rx.recv_timeout(WORKER_POLL) {
            Ok(req) => {
                ctx.active.fetch_add(1, Ordering::Relaxed);

                trace!(worker_id, url = %req.url, "Fetching asset");
                let outcome = ctx.fetcher.fetch(&req);
                if let Err(e) = &outcome {
                    warn!(worker_id, key = %req.key, error = %e, "Asset load failed");
                }

                ctx.outcomes
                    .lock()
                    .put((req.kind, req.id().to_string()), outcome.clone());

                let event = match outcome {
                    Ok(()) => AssetEvent::loaded(req.key, req.kind),
                    Err(e) => AssetEvent::failed(req.key, req.kind, e),
                };
                // Pending is cleared only after the event is queued so that
                // an idle queue always has its results ready to poll.
                let pending_key = (event.key.clone(), event.kind);
                if let Err(e) = ctx.tx.send(event) {
                    warn!(worker_id, error = ?e, "Failed to send asset result");
                }
                ctx.pending.write().remove(&pending_key);

                ctx.active.fetch_sub(1, Ordering::Relaxed);
            }
            Err(flume::RecvTimeoutError::Timeout) => continue,
            Err(flume::RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(worker_id, "Asset worker stopped");
}

/// Builder for AssetQueue with configuration options.
pub struct AssetQueueBuilder {
    workers: usize,
    cache_entries: usize,
}

impl AssetQueueBuilder {
    pub fn new() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }

    pub fn workers(mut self, count: usize) -> Self {
        self.workers = count;
        self
    }

    pub fn cache_entries(mut self, entries: usize) -> Self {
        self.cache_entries = entries;
        self
    }

    pub fn build<F: AssetFetcher>(self, fetcher: F) -> Result<AssetQueue> {
        AssetQueue::with_fetcher(self.workers, self.cache_entries, fetcher)
    }
}

impl Default for AssetQueueBuilder {
    fn default() -> Self {
        Self::new()
    }
}
