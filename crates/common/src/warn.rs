//! Caller-supplied warning capability.
//!
//! Operations that resolve recoverable problems internally (dropping an
//! unsupported attachment, overriding a mislabeled mime type) report them
//! through a [`WarnLog`] handed in by the caller instead of a global logger,
//! so each call decides where its warnings go.

use std::sync::{Arc, Mutex};

/// Sink for human-readable warnings emitted during a single call.
pub trait WarnLog: Send + Sync {
    fn warn(&self, message: &str);
}

impl<T: WarnLog + ?Sized> WarnLog for &T {
    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

impl<T: WarnLog + ?Sized> WarnLog for Arc<T> {
    fn warn(&self, message: &str) {
        (**self).warn(message);
    }
}

/// Forwards warnings to `tracing` at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingWarnLog;

impl WarnLog for TracingWarnLog {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "satchel::attachments", "{message}");
    }
}

/// Discards every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopWarnLog;

impl WarnLog for NoopWarnLog {
    fn warn(&self, _message: &str) {}
}

/// Keeps warnings in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingWarnLog {
    messages: Mutex<Vec<String>>,
}

impl RecordingWarnLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the warnings recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl WarnLog for RecordingWarnLog {
    fn warn(&self, message: &str) {
        let mut guard = self
            .messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.push(message.to_string());
    }
}
