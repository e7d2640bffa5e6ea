use std::sync::{Mutex, PoisonError};

use tracing::log::error;

/// Where code under test sends error output.
pub trait ErrorSink: Send + Sync {
    fn error(&self, message: &str);
}

/// Passes everything through to the `tracing` error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn error(&self, message: &str) {
        error!("{message}")
    }
}

/// Keeps error output out of the test log while remembering what was sent.
#[derive(Debug, Default)]
pub struct MutedSink {
    messages: Mutex<Vec<String>>,
}

impl MutedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear()
    }
}

impl ErrorSink for MutedSink {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
