//! Notifier adapters.

use std::sync::{Arc, Mutex};

use crate::ports::{Notice, NoticeLevel, Notifier};

/// Forwards notices to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Warning => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Error => tracing::error!(message = %notice.message, "notice"),
        }
    }
}

/// Keeps every notice in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self) -> usize {
        self.notices.lock().map(|n| n.len()).unwrap_or(0)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
