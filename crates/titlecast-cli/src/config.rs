//! Configuration constants for the titlecast CLI

/// Application defaults
pub mod app {
    /// Default station file, relative to the working directory
    pub const STATIONS_FILE: &str = "channels.json";
}

/// Remote-control socket configuration
pub mod remote {
    /// Default bind address for the remote-control listener
    pub const DEFAULT_ADDR: &str = "127.0.0.1:65432";

    /// Shutdown-flag poll interval for the accept loop, in milliseconds
    pub const ACCEPT_POLL_MS: u64 = 50;

    /// Read timeout for an accepted client, in seconds; a silent client
    /// is dropped without a response
    pub const CLIENT_TIMEOUT_SECS: u64 = 2;
}

/// Display configuration
pub mod display {
    /// Now-playing poll interval in seconds
    pub const POLL_INTERVAL_SECS: u64 = 5;

    /// Station names longer than this many characters are truncated
    pub const MAX_STATION_CHARS: usize = 40;

    /// Characters kept when truncating a station name, before the ellipsis
    pub const STATION_TRUNCATE_TO: usize = 37;
}

/// Status labels
pub mod labels {
    /// Shown when no station is selected
    pub const IDLE: &str = "Nothing playing...";

    /// Shown while the selected station is paused
    pub const PAUSED: &str = "Paused";
}
