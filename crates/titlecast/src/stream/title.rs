//! Title extraction and display formatting
//!
//! Pure functions over the raw metadata blocks produced by the ICY parser.

use encoding_rs::Encoding;
use regex::bytes::Regex;

use crate::config::titles::{FALLBACK, MAX_DISPLAY_CHARS, TRUNCATE_TO_CHARS};

/// Extract the `StreamTitle` value from a raw metadata block.
///
/// Blocks look like `StreamTitle='Artist - Song';StreamUrl='...';`,
/// NUL-padded up to the capture window. Matching happens on the raw bytes
/// before any decoding; only the captured value is decoded, with
/// undecodable sequences replaced by U+FFFD. An empty value is treated the
/// same as a missing tag.
pub fn extract_stream_title(block: &[u8], encoding: &'static Encoding) -> Option<String> {
    // Strip the NUL padding from the end of the block
    let end = block.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    if end == 0 {
        return None;
    }

    let re = Regex::new(r"(?-u)StreamTitle='([^']*)';").ok()?;
    let value = re.captures(&block[..end])?.get(1)?.as_bytes();
    if value.is_empty() {
        return None;
    }

    let (decoded, _, _) = encoding.decode(value);
    Some(decoded.into_owned())
}

/// Format a title for display.
///
/// Titles of three characters or fewer collapse to a fixed placeholder;
/// titles longer than the display width are truncated with an ellipsis.
/// Counts are in characters, not bytes.
pub fn format_title(title: &str) -> String {
    let chars = title.chars().count();
    if chars <= 3 {
        return FALLBACK.to_string();
    }
    if chars > MAX_DISPLAY_CHARS {
        let kept: String = title.chars().take(TRUNCATE_TO_CHARS).collect();
        return format!("{kept}...");
    }
    title.to_string()
}
