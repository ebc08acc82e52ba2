//! Shutdown coordination for the gateway.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Coordinator for graceful shutdown.
///
/// The signal is latched: once triggered it stays set, so a task that starts
/// waiting afterwards resolves immediately.
#[derive(Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// A future that resolves once shutdown has been triggered, including
    /// when it was triggered before this call.
    pub fn signalled(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            // The sender lives as long as any clone of `Shutdown`; an error
            // means every coordinator is gone, which is treated as shutdown.
            let _ = rx.wait_for(|triggered| *triggered).await;
        }
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Get the number of active waiters.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
