//! # Application State
//!
//! Core meeting state for Roundtable. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn MeetingBackend>  // HTTP API seam
//! ├── meeting: MeetingSettings          // supervisor name/title
//! ├── roster: Roster                    // participants + selection set
//! ├── roster_status: RosterStatus       // idle / loading / ready / failed
//! ├── transcript: Transcript            // rendered conversation entries
//! ├── dispatch: DispatchState           // the busy flag (Idle | Sending)
//! ├── typing_entry: Option<EntryId>     // placeholder for the in-flight send
//! ├── load_error_entry: Option<EntryId> // persistent roster load error
//! ├── memory: Option<MemoryView>        // open memory overlay
//! ├── pending_memory: Option<String>    // name of the last memory request
//! ├── messages_sent: usize              // drives the quit guard
//! └── confirm_quit: bool                // quit confirmation showing
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::backend::MeetingBackend;
use crate::core::config::MeetingSettings;
use crate::core::dispatch::DispatchState;
use crate::core::memory::MemoryView;
use crate::core::roster::Roster;
use crate::core::transcript::{EntryId, EntryKind, Transcript};

pub const WELCOME_MESSAGE: &str = "Welcome to the IT department meeting. \
    Pick who should join from the roster, then describe the processes you would like to automate.";

/// `Idle -> Loading -> Ready | Failed`, and `Failed -> Loading` on a manual
/// reload. A `Ready` roster is never refetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterStatus {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready,
    Failed,
}

pub struct App {
    pub backend: Arc<dyn MeetingBackend>,
    pub meeting: MeetingSettings,
    pub roster: Roster,
    pub roster_status: RosterStatus,
    pub transcript: Transcript,
    pub dispatch: DispatchState,
    pub typing_entry: Option<EntryId>,
    pub load_error_entry: Option<EntryId>,
    pub memory: Option<MemoryView>,
    pub pending_memory: Option<String>,
    pub messages_sent: usize,
    pub confirm_quit: bool,
}

impl App {
    pub fn new(backend: Arc<dyn MeetingBackend>, meeting: MeetingSettings) -> Self {
        let mut transcript = Transcript::new();
        transcript.append("System", WELCOME_MESSAGE, EntryKind::System);
        Self {
            backend,
            meeting,
            roster: Roster::default(),
            roster_status: RosterStatus::Idle,
            transcript,
            dispatch: DispatchState::Idle,
            typing_entry: None,
            load_error_entry: None,
            memory: None,
            pending_memory: None,
            messages_sent: 0,
            confirm_quit: false,
        }
    }

    pub fn is_sending(&self) -> bool {
        self.dispatch == DispatchState::Sending
    }

    /// Whether leaving now would throw away conversation history.
    pub fn has_history(&self) -> bool {
        self.messages_sent > 0
    }

    /// Short status for the title bar.
    pub fn status_label(&self) -> &'static str {
        match (self.roster_status, self.dispatch) {
            (_, DispatchState::Sending) => "Sending...",
            (RosterStatus::Idle | RosterStatus::Loading, _) => "Loading team...",
            (RosterStatus::Failed, _) => "Roster unavailable (Ctrl+L to retry)",
            (RosterStatus::Ready, DispatchState::Idle) => "Ready",
        }
    }
}
