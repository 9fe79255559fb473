//! ICY framing
//!
//! Icecast/Shoutcast servers interleave metadata into the audio stream when
//! the request carries `Icy-MetaData: 1`. The response announces the audio
//! interval in the `icy-metaint` header; this module parses those headers
//! and splits the body back into audio and raw metadata blocks.

use encoding_rs::{Encoding, UTF_8};
use reqwest::header::HeaderMap;

use crate::config::icy::{AUDIO_WINDOW_BYTES, MAX_METAINT_BYTES, META_CAPTURE_SLACK};

/// Stream properties negotiated from the response headers
#[derive(Debug, Clone)]
pub struct IcyHeaders {
    /// Advertised audio bytes between metadata blocks; `None` when the
    /// header is absent, unparseable, or past `MAX_METAINT_BYTES`
    pub metaint: Option<usize>,
    /// Station name from `icy-name`
    pub station_name: Option<String>,
    /// Text encoding from the Content-Type charset parameter, UTF-8 when
    /// missing or unrecognized
    pub encoding: &'static Encoding,
}

/// Parse the ICY headers of a stream response
pub fn parse_icy_headers(headers: &HeaderMap) -> IcyHeaders {
    let metaint = headers
        .get("icy-metaint")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&m| m <= MAX_METAINT_BYTES);

    let station_name = headers
        .get("icy-name")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let encoding = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    IcyHeaders {
        metaint,
        station_name,
        encoding,
    }
}

/// Pull the charset parameter out of a Content-Type value
fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}

/// Byte-addressed parser separating audio from metadata blocks.
///
/// Each cycle is a fixed audio window, one metadata-length marker byte, a
/// capture window of `metaint + 255` metadata bytes, and one trailing audio
/// byte before the next cycle begins. The marker's value does not size the
/// capture; real blocks are NUL-padded inside the window, and spillover
/// past the block is stripped during title extraction.
pub struct IcyParser {
    metaint: usize,
    audio_window: usize,
    /// Position within the current cycle, 1-based after the first push
    pos: usize,
    /// 0 outside metadata; counts captured bytes plus one while inside
    inside_meta: usize,
    block: Vec<u8>,
}

impl IcyParser {
    /// Parser with the standard audio window
    pub fn new(metaint: usize) -> Self {
        Self::with_audio_window(metaint, AUDIO_WINDOW_BYTES)
    }

    /// Parser with a custom audio window, for servers that frame strictly
    /// on `icy-metaint`. Intervals past `MAX_METAINT_BYTES` are clamped.
    pub fn with_audio_window(metaint: usize, audio_window: usize) -> Self {
        let metaint = metaint.min(MAX_METAINT_BYTES);
        Self {
            metaint,
            audio_window,
            pos: 0,
            inside_meta: 0,
            block: Vec::with_capacity(metaint + META_CAPTURE_SLACK),
        }
    }

    /// Capacity of the block accumulator for this stream
    fn capture_limit(&self) -> usize {
        self.metaint + META_CAPTURE_SLACK
    }

    /// Feed one byte of the response body.
    ///
    /// Returns the accumulated raw metadata block when the capture window
    /// closes, `None` for every other byte.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        self.pos += 1;

        if self.pos <= self.audio_window {
            return None;
        }
        if self.inside_meta == 0 {
            // Length marker: consumed, never stored
            self.inside_meta = 1;
            return None;
        }
        if self.inside_meta <= self.capture_limit() {
            self.block.push(byte);
            self.inside_meta += 1;
            return None;
        }
        if self.pos > self.audio_window + self.metaint {
            // Cycle boundary: hand the block over and start again
            self.pos = 0;
            self.inside_meta = 0;
            return Some(std::mem::take(&mut self.block));
        }
        None
    }
}
