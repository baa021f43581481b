//! Explicit cancellation for in-flight requests

use tokio::sync::watch;

/// Fires the paired [`AbortSignal`]
#[derive(Debug)]
pub struct AbortHandle(watch::Sender<bool>);

/// Observes an [`AbortHandle`]; cheap to clone
#[derive(Debug, Clone)]
pub struct AbortSignal(Option<watch::Receiver<bool>>);

/// Create a connected handle and signal
#[must_use]
pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle(tx), AbortSignal(Some(rx)))
}

impl AbortHandle {
    /// Abort every request holding the paired signal
    pub fn abort(&self) {
        self.0.send_replace(true);
    }
}

impl AbortSignal {
    /// A signal that never fires
    #[must_use]
    pub const fn never() -> Self {
        Self(None)
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolve once aborted
    ///
    /// Pends forever if the handle is dropped without aborting.
    pub async fn aborted(&self) {
        if let Some(rx) = &self.0 {
            let mut rx = rx.clone();
            if rx.wait_for(|aborted| *aborted).await.is_ok() {
                return;
            }
        }
        std::future::pending::<()>().await;
    }
}

impl Default for AbortSignal {
    fn default() -> Self {
        Self::never()
    }
}
