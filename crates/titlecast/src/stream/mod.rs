//! ICY stream handling
//!
//! Header negotiation, the byte-addressed parser that splits a response
//! body into audio and metadata blocks, and title extraction/formatting.

pub mod icy;
pub mod title;

// Re-export common types
pub use icy::{parse_icy_headers, IcyHeaders, IcyParser};
pub use title::{extract_stream_title, format_title};
