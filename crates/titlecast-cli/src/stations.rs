//! Station directory
//!
//! Loads the station list from a channels file shaped like
//! `{"channels": [{"title": "...", "url": "..."}]}`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, Result};

/// One station entry from the channels file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Station {
    /// Display name
    pub title: String,
    /// Stream URL
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelsFile {
    channels: Vec<Station>,
}

/// Load stations from a channels file.
///
/// Errors on a missing or unreadable file, malformed JSON, or an empty
/// station list.
pub fn load_stations(path: &Path) -> Result<Vec<Station>> {
    let content = fs::read_to_string(path).map_err(|e| {
        let msg = match e.kind() {
            ErrorKind::NotFound => format!("station file not found: {}", path.display()),
            ErrorKind::PermissionDenied => {
                format!("cannot read station file {}: permission denied", path.display())
            }
            _ => format!("cannot read station file {}: {e}", path.display()),
        };
        AppError::Config(msg)
    })?;

    let file: ChannelsFile = serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("invalid station file {}: {e}", path.display())))?;

    if file.channels.is_empty() {
        return Err(AppError::Config(format!(
            "station file {} lists no channels",
            path.display()
        )));
    }

    Ok(file.channels)
}
