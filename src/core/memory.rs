//! Presentation model for the memory overlay.

use chrono::{DateTime, Local, NaiveDateTime};

use crate::backend::MemorySnapshot;

pub const MEMORY_ITEMS_SHOWN: usize = 10;
pub const HISTORY_ENTRIES_SHOWN: usize = 5;
pub const EXCERPT_CHARS: usize = 100;
pub const NO_MEMORY_PLACEHOLDER: &str = "No memory recorded yet.";

const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExcerpt {
    pub timestamp: String,
    pub user_message: String,
    pub response: String,
}

/// What the overlay shows for one participant: the tail of their memory and
/// conversation log, trimmed for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryView {
    pub name: String,
    pub memory_items: Vec<String>,
    pub history: Vec<HistoryExcerpt>,
}

impl MemoryView {
    pub fn from_snapshot(snapshot: MemorySnapshot) -> Self {
        let memory_items = tail(snapshot.memory, MEMORY_ITEMS_SHOWN);
        let history = tail(snapshot.conversation_history, HISTORY_ENTRIES_SHOWN)
            .into_iter()
            .map(|entry| HistoryExcerpt {
                timestamp: format_timestamp(&entry.timestamp),
                user_message: excerpt(&entry.user_message),
                response: excerpt(&entry.response),
            })
            .collect();

        Self {
            name: snapshot.name,
            memory_items,
            history,
        }
    }

    pub fn has_memory(&self) -> bool {
        !self.memory_items.is_empty()
    }
}

/// Keep the last `n` items, preserving order.
fn tail<T>(mut items: Vec<T>, n: usize) -> Vec<T> {
    let skip = items.len().saturating_sub(n);
    items.drain(..skip);
    items
}

/// Truncate to [`EXCERPT_CHARS`] characters, appending `...` when cut.
pub fn excerpt(text: &str) -> String {
    match text.char_indices().nth(EXCERPT_CHARS) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Render a backend timestamp in local time. Accepts RFC 3339 and the naive
/// ISO-8601 form the backend writes; anything else is shown as-is.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_TIME_FORMAT).to_string();
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return naive.format(DISPLAY_TIME_FORMAT).to_string();
    }
    raw.to_string()
}
