//! Debounced triggers.
//!
//! Each `schedule` aborts the pending timer task, if any, and starts a new
//! one. Only the value of the last call within a quiet period is delivered.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Delivers the last scheduled value after `delay` of quiet.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    tx: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer with `value` as the payload to deliver.
    pub fn schedule(&mut self, value: T) {
        self.cancel();
        let tx = self.tx.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver may have been dropped
            let _ = tx.send(value);
        }));
    }

    /// Drops the pending timer without delivering anything.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns true while a timer is running.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
