//! One-shot cancellation primitive for request cycles.
//!
//! Each data-load cycle owns a [`CancelHandle`]; clones of the matching
//! [`CancelToken`] are passed explicitly to every sub-fetch issued by that
//! cycle. Signalling the handle makes all in-flight requests resolve with
//! [`Error::Cancelled`](crate::error::Error::Cancelled). A handle is not
//! reusable: a new cycle allocates a fresh pair.

use tokio::sync::watch;

/// Create a linked cancel handle/token pair.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

/// The signalling side of a cancellation pair, owned by the operation that
/// started the load cycle.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signal cancellation to every token cloned from this pair.
    ///
    /// Idempotent; tokens observing the signal after completion see a
    /// no-op.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// The observing side of a cancellation pair, cloned into each sub-fetch.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Whether cancellation has already been signalled.
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation is signalled.
    ///
    /// If the handle is dropped without signalling, this future never
    /// resolves, so racing it against a request leaves the request to run
    /// to completion.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if *rx.borrow() {
            return;
        }
        loop {
            if rx.changed().await.is_err() {
                // Handle dropped without cancelling; park forever.
                std::future::pending::<()>().await;
            }
            if *rx.borrow() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn token_observes_signal() {
        let (handle, token) = cancel_pair();
        assert!(!token.is_cancelled());
        handle.cancel();
        assert!(token.is_cancelled());
        // Must resolve immediately once signalled.
        tokio::time::timeout(Duration::from_millis(100), token.cancelled())
            .await
            .expect("cancelled() should resolve after cancel()");
    }

    #[tokio::test]
    async fn token_without_signal_stays_pending() {
        let (_handle, token) = cancel_pair();
        let result =
            tokio::time::timeout(Duration::from_millis(50), token.cancelled()).await;
        assert!(result.is_err());
    }
}
