//! Configuration constants for the titlecast engine

/// Network-related configuration
pub mod network {
    /// User agent for HTTP requests
    pub const USER_AGENT: &str = concat!("Titlecast/", env!("CARGO_PKG_VERSION"));

    /// Connection timeout in seconds
    pub const CONNECT_TIMEOUT_SECS: u64 = 2;

    /// Per-read timeout in seconds; bounds how long a stalled stream can
    /// delay cancellation
    pub const READ_TIMEOUT_SECS: u64 = 10;
}

/// ICY framing configuration
pub mod icy {
    /// Audio bytes consumed before each metadata-length marker.
    ///
    /// Shoutcast-lineage servers send this initial fill ahead of the first
    /// marker regardless of the advertised `icy-metaint`; strict ICY framing
    /// would count `icy-metaint` bytes between markers instead.
    pub const AUDIO_WINDOW_BYTES: usize = 2048;

    /// Bytes captured after each length marker, beyond the metadata
    /// interval, when accumulating a block
    pub const META_CAPTURE_SLACK: usize = 255;

    /// Largest `icy-metaint` value taken at face value. Real streams
    /// advertise a few KiB; anything past this is treated as if the
    /// header were absent.
    pub const MAX_METAINT_BYTES: usize = 1024 * 1024;
}

/// Title display configuration
pub mod titles {
    /// Shown until the first title arrives
    pub const LOADING: &str = "Loading...";

    /// Shown when the stream does not advertise metadata support
    pub const NO_METADATA: &str = "No title info supported";

    /// Shown in place of empty or very short titles
    pub const FALLBACK: &str = "No title";

    /// Titles longer than this many characters are truncated for display
    pub const MAX_DISPLAY_CHARS: usize = 50;

    /// Characters kept when truncating, before the ellipsis
    pub const TRUNCATE_TO_CHARS: usize = 47;
}
