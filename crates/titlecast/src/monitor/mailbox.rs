//! Latest-title mailbox

use std::sync::Mutex;

use crate::config::titles::LOADING;

/// Single-slot store for the most recent title, shared between the worker
/// and the consumer.
///
/// A write replaces any undelivered value, so the consumer always observes
/// the latest title and never a backlog. Reads do not consume. The slot is
/// never empty; it starts at the loading placeholder.
#[derive(Debug)]
pub struct TitleMailbox {
    slot: Mutex<String>,
}

impl TitleMailbox {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(LOADING.to_string()),
        }
    }

    /// Replace the stored title
    pub fn publish(&self, title: String) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = title;
    }

    /// Read the most recent title
    pub fn latest(&self) -> String {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Restore the loading placeholder
    pub fn reset(&self) {
        self.publish(LOADING.to_string());
    }
}

impl Default for TitleMailbox {
    fn default() -> Self {
        Self::new()
    }
}
