//! Best-effort persistence of generation and parent state.
//!
//! Save and load happen only at generation boundaries, never on the tick
//! path. Missing or corrupt state loads as `None` so the caller falls back
//! to generation 1 with fresh random controllers; save failures surface as
//! errors for the caller's retry policy and never touch simulation state.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::evolution::ParentPair;
use super::track::Track;

/// Persisted generation state: the counter and the starting pose every
/// generation spawns from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetupState {
    /// Generation number, starting at 1.
    pub generation: u32,
    /// Starting x coordinate.
    pub x: f64,
    /// Starting y coordinate.
    pub y: f64,
    /// Starting heading in radians.
    pub angle: f64,
}

/// Saves the generation state as JSON.
pub fn save_setup(path: impl AsRef<Path>, setup: &SetupState) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(setup)?;
    fs::write(path, json)?;
    Ok(())
}

/// Loads the generation state, treating a missing or corrupt file as no
/// prior state.
pub fn load_setup(path: impl AsRef<Path>) -> Option<SetupState> {
    load_json(path.as_ref(), "setup state")
}

/// Saves the two parent records as JSON.
pub fn save_parents(path: impl AsRef<Path>, parents: &ParentPair) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(parents)?;
    fs::write(path, json)?;
    Ok(())
}

/// Loads the two parent records, treating a missing or corrupt file as no
/// prior state.
pub fn load_parents(path: impl AsRef<Path>) -> Option<ParentPair> {
    load_json(path.as_ref(), "parent state")
}

/// Reads and deserializes a JSON state file. Absence is normal (first
/// run); corruption is logged and also treated as absence.
fn load_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Option<T> {
    let json = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "discarding corrupt {what}");
            None
        }
    }
}

/// Loads a track from its text format: one polyline per non-blank line,
/// whitespace-separated coordinates, each consecutive point pair becoming
/// one wall segment.
pub fn load_track(path: impl AsRef<Path>) -> Result<Track, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    let mut track = Track::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let values = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()?;

        let points: Vec<(f64, f64)> = values
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect();

        track.add_polyline(&points);
    }

    Ok(track)
}
