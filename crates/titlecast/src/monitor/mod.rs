//! Title monitoring
//!
//! [`TitleMonitor`] owns one background worker per monitored URL and
//! exposes the most recent extracted title through a single-slot mailbox.

pub mod mailbox;
mod worker;

// Re-export common types
pub use mailbox::TitleMailbox;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::warn;

use crate::stream::title::format_title;

/// Monitors one stream URL at a time for `StreamTitle` updates.
///
/// `listen` starts or restarts a background worker and `stop` cancels it
/// and waits for it to exit; `current_title` is a non-blocking read of
/// the latest formatted title. At most one worker is alive at any moment.
pub struct TitleMonitor {
    url: Option<String>,
    mailbox: Arc<TitleMailbox>,
    stop_flag: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl TitleMonitor {
    pub fn new() -> Self {
        Self {
            url: None,
            mailbox: Arc::new(TitleMailbox::new()),
            stop_flag: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Monitor `url`, replacing any currently monitored stream.
    ///
    /// Calling again with the URL already being monitored is a no-op; the
    /// existing worker and its titles are kept.
    pub fn listen(&mut self, url: &str) {
        if self.url.as_deref() == Some(url) {
            return;
        }
        self.stop();
        self.url = Some(url.to_string());
        self.mailbox.reset();
        // Each worker observes its own flag; stopping one never cancels
        // a successor.
        self.stop_flag = Arc::new(AtomicBool::new(false));

        let stop_flag = self.stop_flag.clone();
        let mailbox = self.mailbox.clone();
        let target = url.to_string();
        let handle = thread::Builder::new()
            .name("title-monitor".into())
            .spawn(move || worker::run(&target, &mailbox, &stop_flag))
            .expect("Failed to spawn title-monitor thread");
        self.worker = Some(handle);
    }

    /// Latest known title, formatted for display. Never blocks on the
    /// network.
    pub fn current_title(&self) -> String {
        format_title(&self.mailbox.latest())
    }

    /// Cancel the active worker and wait for it to exit. Idempotent; safe
    /// to call with no worker running.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                warn!("title monitor worker panicked");
            }
        }
        self.url = None;
    }
}

impl Default for TitleMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TitleMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}
