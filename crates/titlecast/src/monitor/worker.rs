//! Monitor worker
//!
//! Runs on a background thread: opens the HTTP connection, negotiates ICY
//! metadata support, and drives the parser over the response body,
//! publishing every extracted title to the mailbox.

use std::io::{BufReader, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use encoding_rs::Encoding;
use tracing::{debug, info, warn};

use crate::config::network::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::config::titles::NO_METADATA;
use crate::error::{MonitorError, Result};
use crate::monitor::mailbox::TitleMailbox;
use crate::stream::icy::{parse_icy_headers, IcyParser};
use crate::stream::title::extract_stream_title;

/// How a stream run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StreamEnd {
    /// The cancellation flag was observed
    Cancelled,
    /// The server closed the connection
    SourceExhausted,
}

/// Worker entry point. Failures never leave the worker; the consumer only
/// ever sees mailbox contents.
pub(crate) fn run(url: &str, mailbox: &TitleMailbox, stop_flag: &AtomicBool) {
    match monitor_stream(url, mailbox, stop_flag) {
        Ok(StreamEnd::Cancelled) => debug!(url, "title monitor cancelled"),
        Ok(StreamEnd::SourceExhausted) => info!(url, "stream ended"),
        Err(e @ (MonitorError::NoMetadata | MonitorError::BadStatus(_))) => {
            info!(url, reason = %e, "stream offers no usable title metadata");
            mailbox.publish(NO_METADATA.to_string());
        }
        Err(e) => warn!(url, error = %e, "title monitor failed"),
    }
}

/// Connect to the stream and run the parser until cancellation, stream
/// end, or an error.
fn monitor_stream(
    url: &str,
    mailbox: &TitleMailbox,
    stop_flag: &AtomicBool,
) -> Result<StreamEnd> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        // The blocking client applies this per read on the body, not to
        // the whole response, so an endless stream stays up.
        .timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()?;

    let response = client.get(url).header("Icy-MetaData", "1").send()?;

    if !response.status().is_success() {
        return Err(MonitorError::BadStatus(response.status()));
    }

    let headers = parse_icy_headers(response.headers());
    let metaint = headers.metaint.ok_or(MonitorError::NoMetadata)?;
    debug!(
        url,
        metaint,
        station = headers.station_name.as_deref().unwrap_or("unknown"),
        encoding = headers.encoding.name(),
        "connected to stream"
    );

    run_parser(response, metaint, headers.encoding, mailbox, stop_flag)
}

/// Drive the parser over the body one byte at a time.
///
/// The cancellation flag is checked before every read, so stop latency is
/// bounded by the per-read timeout even on a silent stream.
fn run_parser(
    source: impl Read,
    metaint: usize,
    encoding: &'static Encoding,
    mailbox: &TitleMailbox,
    stop_flag: &AtomicBool,
) -> Result<StreamEnd> {
    let mut parser = IcyParser::new(metaint);
    let mut reader = BufReader::new(source);
    let mut byte = [0u8; 1];

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            return Ok(StreamEnd::Cancelled);
        }
        if reader.read(&mut byte)? == 0 {
            return Ok(StreamEnd::SourceExhausted);
        }
        if let Some(block) = parser.push(byte[0]) {
            if let Some(title) = extract_stream_title(&block, encoding) {
                debug!(%title, "stream title extracted");
                mailbox.publish(title);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::icy::{AUDIO_WINDOW_BYTES, META_CAPTURE_SLACK};
    use crate::config::titles::LOADING;
    use encoding_rs::UTF_8;
    use std::io::Cursor;
    use std::sync::Arc;

    // --- Test helpers ---

    fn cycle(metaint: usize, block: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0xAAu8; AUDIO_WINDOW_BYTES];
        bytes.push(0x42);
        let mut capture = block.to_vec();
        capture.resize(metaint + META_CAPTURE_SLACK, 0);
        bytes.extend_from_slice(&capture);
        bytes.push(0xAA);
        bytes
    }

    /// Reader that raises the stop flag after a fixed number of bytes
    struct StopAfter {
        inner: Cursor<Vec<u8>>,
        flag: Arc<AtomicBool>,
        remaining: usize,
    }

    impl Read for StopAfter {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                self.flag.store(true, Ordering::SeqCst);
            } else {
                self.remaining -= 1;
            }
            let n = 1.min(buf.len());
            self.inner.read(&mut buf[..n])
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::ConnectionReset))
        }
    }

    // --- Parse loop ---

    #[test]
    fn publishes_title_and_ends_with_source() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(false);
        let body = cycle(32, b"StreamTitle='Workertest';");

        let end = run_parser(Cursor::new(body), 32, UTF_8, &mailbox, &flag).unwrap();

        assert_eq!(end, StreamEnd::SourceExhausted);
        assert_eq!(mailbox.latest(), "Workertest");
    }

    #[test]
    fn latest_title_overwrites_earlier_ones() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(false);
        let mut body = cycle(16, b"StreamTitle='First Track';");
        body.extend_from_slice(&cycle(16, b"StreamTitle='Second Track';"));
        body.extend_from_slice(&cycle(16, b"StreamTitle='Third Track';"));

        run_parser(Cursor::new(body), 16, UTF_8, &mailbox, &flag).unwrap();

        assert_eq!(mailbox.latest(), "Third Track");
    }

    #[test]
    fn blocks_without_titles_leave_mailbox_untouched() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(false);
        let body = cycle(16, b"StreamUrl='http://example.com';");

        run_parser(Cursor::new(body), 16, UTF_8, &mailbox, &flag).unwrap();

        assert_eq!(mailbox.latest(), LOADING);
    }

    #[test]
    fn preset_flag_cancels_before_any_read() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(true);
        let body = cycle(16, b"StreamTitle='Never Seen';");

        let end = run_parser(Cursor::new(body), 16, UTF_8, &mailbox, &flag).unwrap();

        assert_eq!(end, StreamEnd::Cancelled);
        assert_eq!(mailbox.latest(), LOADING);
    }

    #[test]
    fn flag_raised_mid_stream_stops_the_loop() {
        let mailbox = TitleMailbox::new();
        let flag = Arc::new(AtomicBool::new(false));
        let body = cycle(16, b"StreamTitle='Interrupted';");
        let total = body.len();
        let reader = StopAfter {
            inner: Cursor::new(body),
            flag: flag.clone(),
            remaining: total / 2,
        };

        let end = run_parser(reader, 16, UTF_8, &mailbox, &flag).unwrap();

        assert_eq!(end, StreamEnd::Cancelled);
        assert_eq!(mailbox.latest(), LOADING);
    }

    #[test]
    fn read_errors_propagate() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(false);

        let err = run_parser(FailingReader, 16, UTF_8, &mailbox, &flag).unwrap_err();

        assert!(matches!(err, MonitorError::Io(_)));
    }

    // --- Connection ---

    #[test]
    fn refused_connection_surfaces_as_network_error() {
        let mailbox = TitleMailbox::new();
        let flag = AtomicBool::new(false);

        let err = monitor_stream("http://127.0.0.1:1/stream", &mailbox, &flag).unwrap_err();

        assert!(matches!(err, MonitorError::Network(_)));
        assert_eq!(mailbox.latest(), LOADING);
    }
}
