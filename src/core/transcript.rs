//! # Transcript
//!
//! The ordered, append-only list of rendered conversation entries.
//!
//! Entries are never edited. Only two kinds are ever removed: the typing
//! placeholder, once the dispatch it belongs to finishes, and transient
//! errors, once their deadline passes.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use super::format::{self, FormattedLine};

/// How long a transient error stays in the transcript.
pub const ERROR_TTL: Duration = Duration::from_millis(5000);

pub type EntryId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Participant,
    System,
    Error,
    /// "Typing..." placeholder shown while a chat request is in flight.
    Typing,
}

#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub sender: String,
    pub text: String,
    pub kind: EntryKind,
    /// Client-local time at render.
    pub timestamp: DateTime<Local>,
    /// `text` run through [`format::format`] once, at append time.
    pub lines: Vec<FormattedLine>,
    expires_at: Option<Instant>,
}

impl ConversationEntry {
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    entries: Vec<ConversationEntry>,
    next_id: EntryId,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry stamped with the current local time.
    pub fn append(&mut self, sender: &str, text: &str, kind: EntryKind) -> EntryId {
        self.push(sender, text, kind, None)
    }

    /// Append a transient error that expires [`ERROR_TTL`] after `now`.
    pub fn show_error(&mut self, message: &str, now: Instant) -> EntryId {
        self.push("System", message, EntryKind::Error, Some(now + ERROR_TTL))
    }

    /// Append an error that stays until removed explicitly.
    pub fn show_persistent_error(&mut self, message: &str) -> EntryId {
        self.push("System", message, EntryKind::Error, None)
    }

    fn push(
        &mut self,
        sender: &str,
        text: &str,
        kind: EntryKind,
        expires_at: Option<Instant>,
    ) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(ConversationEntry {
            id,
            sender: sender.to_string(),
            text: text.to_string(),
            kind,
            timestamp: Local::now(),
            lines: format::format(text),
            expires_at,
        });
        id
    }

    /// Remove an entry if it is still attached. Returns true if removed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every transient entry whose deadline is at or before `now`.
    /// Returns the number removed.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.expires_at.is_none_or(|deadline| deadline > now));
        before - self.entries.len()
    }

    pub fn has_expiring(&self) -> bool {
        self.entries.iter().any(|e| e.expires_at.is_some())
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// User and participant messages currently recorded.
    pub fn message_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.kind, EntryKind::User | EntryKind::Participant))
            .count()
    }
}
