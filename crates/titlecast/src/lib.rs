//! Titlecast engine
//!
//! Watches Icecast/Shoutcast streams for `StreamTitle` metadata and keeps
//! the latest track title available to a polling consumer.
//!
//! The entry point is [`monitor::TitleMonitor`]. `listen` starts a
//! background worker for one stream URL and `current_title` reads the
//! latest formatted title without blocking; `stop` cancels the worker.
//!
//! ```no_run
//! use titlecast::monitor::TitleMonitor;
//!
//! let mut monitor = TitleMonitor::new();
//! monitor.listen("http://example.com/stream");
//! println!("{}", monitor.current_title());
//! monitor.stop();
//! ```

pub mod config;
pub mod error;
pub mod monitor;
pub mod stream;
