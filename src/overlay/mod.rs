//! Single-flight overlay host.
//!
//! At most one overlay (dialog, sheet) is shown at a time. Concurrent
//! [`OverlayHost::show`] calls queue in arrival order on a fair async mutex
//! and each suspends until its overlay is finished or dismissed. Dropping a
//! pending `show` future cancels it without leaving the host busy.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Overlay was dismissed without a result")]
    Dismissed,
}

struct ActiveOverlay<O, R> {
    overlay: O,
    reply: oneshot::Sender<Option<R>>,
}

struct HostInner<O, R> {
    gate: tokio::sync::Mutex<()>,
    current: Mutex<Option<ActiveOverlay<O, R>>>,
}

/// Shows overlays one at a time. Cloning shares the host.
pub struct OverlayHost<O, R> {
    inner: Arc<HostInner<O, R>>,
}

impl<O, R> Clone for OverlayHost<O, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O, R> Default for OverlayHost<O, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O, R> OverlayHost<O, R> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HostInner {
                gate: tokio::sync::Mutex::new(()),
                current: Mutex::new(None),
            }),
        }
    }

    /// Show `overlay` once every earlier request has completed, and wait
    /// for its result.
    pub async fn show(&self, overlay: O) -> Result<R, OverlayError> {
        let _turn = self.inner.gate.lock().await;
        let (reply, response) = oneshot::channel();
        *self.inner.current.lock() = Some(ActiveOverlay { overlay, reply });
        let _clear = scopeguard::guard((), |()| {
            self.inner.current.lock().take();
        });
        tracing::debug!("Overlay shown");

        match response.await {
            Ok(Some(result)) => Ok(result),
            Ok(None) | Err(_) => Err(OverlayError::Dismissed),
        }
    }

    /// The overlay currently on screen.
    pub fn current(&self) -> Option<O>
    where
        O: Clone,
    {
        self.inner
            .current
            .lock()
            .as_ref()
            .map(|active| active.overlay.clone())
    }

    pub fn is_showing(&self) -> bool {
        self.inner.current.lock().is_some()
    }

    /// Complete the current overlay with `result`. Returns false if none is shown.
    pub fn finish(&self, result: R) -> bool {
        self.respond(Some(result))
    }

    /// Close the current overlay without a result.
    pub fn dismiss(&self) -> bool {
        self.respond(None)
    }

    fn respond(&self, result: Option<R>) -> bool {
        let Some(active) = self.inner.current.lock().take() else {
            return false;
        };
        // The waiter may have been cancelled already.
        let _ = active.reply.send(result);
        true
    }
}
