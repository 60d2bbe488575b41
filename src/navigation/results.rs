//! Result delivery between records.
//!
//! A requester arms a waiter when it navigates for a result. The waiter is
//! bound to the record that was pushed; popping that record resumes the
//! waiter with the pop result, and discarding the record any other way
//! resolves it with no value.

use std::collections::HashMap;
use std::future::Future;

use tokio::sync::oneshot;

use super::screen::PopResult;

type ResultSender = oneshot::Sender<Option<PopResult>>;
type ResultReceiver = oneshot::Receiver<Option<PopResult>>;

#[derive(Debug, Default)]
pub struct ResultHandler {
    /// Record key -> (requester key, sender).
    senders: HashMap<String, (String, ResultSender)>,
    /// Requester key -> receiver not yet awaited.
    receivers: HashMap<String, ResultReceiver>,
}

impl ResultHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a waiter for `requester_key` to the record keyed `record_key`.
    ///
    /// Arming again for the same requester replaces the previous waiter,
    /// which then resolves with no value.
    pub fn prepare_for_result(&mut self, record_key: &str, requester_key: &str) {
        self.senders
            .retain(|_, (requester, _)| requester.as_str() != requester_key);
        let (tx, rx) = oneshot::channel();
        self.senders
            .insert(record_key.to_string(), (requester_key.to_string(), tx));
        self.receivers.insert(requester_key.to_string(), rx);
        tracing::debug!(record_key, requester_key, "Armed result waiter");
    }

    /// Whether a waiter is bound to `record_key`.
    pub fn expecting_result(&self, record_key: &str) -> bool {
        self.senders.contains_key(record_key)
    }

    /// Resume the waiter bound to `record_key`. Returns true if one was resumed.
    ///
    /// A requester that never called [`await_result`](Self::await_result)
    /// has nobody listening; its waiter is dropped instead.
    pub fn deliver(&mut self, record_key: &str, result: Option<PopResult>) -> bool {
        let Some((requester_key, tx)) = self.senders.remove(record_key) else {
            return false;
        };
        let unawaited = self.receivers.remove(&requester_key).is_some();
        let delivered = !unawaited && tx.send(result).is_ok();
        tracing::debug!(record_key, requester_key = %requester_key, delivered, "Delivered pop result");
        delivered
    }

    /// Resolve the waiter bound to `record_key` with no value.
    pub fn discard(&mut self, record_key: &str) {
        if let Some((requester_key, _tx)) = self.senders.remove(record_key) {
            self.receivers.remove(&requester_key);
            tracing::debug!(record_key, requester_key = %requester_key, "Discarded result waiter");
        }
    }

    /// Discard the waiters of every record for which `keep` returns false.
    pub fn retain_records(&mut self, mut keep: impl FnMut(&str) -> bool) {
        let dropped: Vec<String> = self
            .senders
            .keys()
            .filter(|record_key| !keep(record_key.as_str()))
            .cloned()
            .collect();
        for record_key in dropped {
            self.discard(&record_key);
        }
    }

    /// Number of armed waiters, awaited or not.
    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Wait for the result armed for `requester_key`.
    ///
    /// Resolves immediately with `None` if nothing is armed. The returned
    /// future does not borrow the handler.
    pub fn await_result(
        &mut self,
        requester_key: &str,
    ) -> impl Future<Output = Option<PopResult>> + Send + 'static {
        let receiver = self.receivers.remove(requester_key);
        async move {
            match receiver {
                Some(rx) => rx.await.ok().flatten(),
                None => None,
            }
        }
    }
}
