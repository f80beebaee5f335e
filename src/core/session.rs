//! # Session Summary
//!
//! Every `summary_interval` the event loop snapshots a small advisory summary
//! of the meeting into `<data_dir>/session.json`, overwriting the previous
//! one. Nothing in the client reads it back.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::core::state::App;

pub const SUMMARY_FILE: &str = "session.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_messages: usize,
    pub participants: Vec<String>,
    pub timestamp: String,
}

impl SessionSummary {
    /// Snapshot the current meeting. Reads `app`, never mutates it.
    pub fn capture(app: &App) -> Self {
        Self {
            total_messages: app.transcript.message_count(),
            participants: app.roster.selected_names(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub fn summary_path(dir: &Path) -> PathBuf {
    dir.join(SUMMARY_FILE)
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn write_summary(dir: &Path, summary: &SessionSummary) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    atomic_write_json(&summary_path(dir), summary)
}

/// Capture and write the summary, logging instead of failing.
pub fn save_summary(app: &App, dir: &Path) {
    let summary = SessionSummary::capture(app);
    match write_summary(dir, &summary) {
        Ok(()) => debug!(
            "Session summary saved: {} messages, {} participants",
            summary.total_messages,
            summary.participants.len()
        ),
        Err(e) => warn!("Failed to save session summary: {}", e),
    }
}

/// Run `body`, then write the summary whatever it returned. The event loop
/// goes through here so an early `?` exit still records the session.
pub fn saving_on_exit<T>(app: &mut App, dir: &Path, body: impl FnOnce(&mut App) -> T) -> T {
    let result = body(app);
    save_summary(app, dir);
    result
}
