//! Shared application state and commands

use crate::config::labels;

/// Commands sent to the controller by any frontend (startup arguments,
/// the remote-control socket)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Select and start the station at this zero-based index
    Play(usize),
    /// Flip between playing and paused for the selected station
    TogglePause,
    /// Pause if currently playing
    #[allow(dead_code)] // planned: directional commands over the remote protocol
    Pause,
    /// Resume if currently paused
    #[allow(dead_code)] // planned: directional commands over the remote protocol
    Resume,
    /// Deselect the station and stop monitoring
    Stop,
    /// Exit the controller loop
    Shutdown,
}

/// Snapshot of app state, shared between the controller, the remote
/// server, and the display loop
#[derive(Debug, Clone)]
pub struct AppSnapshot {
    /// Index of the selected station, if any
    pub active_station: Option<usize>,
    /// Name of the selected station
    pub station_title: Option<String>,
    /// False while the selected station is paused
    pub playing: bool,
    /// Latest formatted stream title, or a status label
    pub now_playing: String,
}

impl Default for AppSnapshot {
    fn default() -> Self {
        Self {
            active_station: None,
            station_title: None,
            playing: false,
            now_playing: labels::IDLE.to_string(),
        }
    }
}
