//! # Message Dispatch
//!
//! Send preconditions and reply fan-out. The dispatcher is a two-state
//! machine:
//!
//! ```text
//! Idle --send(valid)--> Sending --success|failure--> Idle
//! ```
//!
//! A send while `Sending` is rejected at the precondition check, never queued.

use crate::backend::ChatRequest;
use crate::core::config::MeetingSettings;
use crate::core::roster::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Idle,
    Sending,
}

/// Why a send never left the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    Busy,
    EmptyMessage,
    NoParticipants,
}

impl SendRejection {
    pub fn message(self) -> &'static str {
        match self {
            SendRejection::Busy => "Still waiting for the team to respond.",
            SendRejection::EmptyMessage => "Please enter a message.",
            SendRejection::NoParticipants => {
                "Please select at least one team member to discuss with."
            }
        }
    }
}

/// Check the send preconditions and build the outbound request.
/// The message is sent trimmed.
pub fn prepare_send(
    text: &str,
    state: DispatchState,
    roster: &Roster,
) -> Result<ChatRequest, SendRejection> {
    if state == DispatchState::Sending {
        return Err(SendRejection::Busy);
    }
    let message = text.trim();
    if message.is_empty() {
        return Err(SendRejection::EmptyMessage);
    }
    if roster.selected_count() == 0 {
        return Err(SendRejection::NoParticipants);
    }
    Ok(ChatRequest {
        message: message.to_string(),
        selected_members: roster.selected_names(),
    })
}

/// A reply ready for the transcript: display label plus text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledReply {
    pub label: String,
    pub text: String,
}

/// Order replies for display. The supervisor, if present, goes first under
/// the supervisor title. Everyone else follows in the reply map's own order,
/// labeled `name (role)`. Names missing from the roster fall back to the
/// bare name.
pub fn fan_out(
    replies: Vec<(String, String)>,
    roster: &Roster,
    meeting: &MeetingSettings,
) -> Vec<LabeledReply> {
    let mut ordered = Vec::with_capacity(replies.len());
    let mut rest = Vec::with_capacity(replies.len());

    for (name, text) in replies {
        if name == meeting.supervisor_name && ordered.is_empty() {
            ordered.push(LabeledReply {
                label: format!("{} ({})", name, meeting.supervisor_title),
                text,
            });
        } else {
            rest.push((name, text));
        }
    }

    ordered.extend(rest.into_iter().map(|(name, text)| LabeledReply {
        label: participant_label(&name, roster),
        text,
    }));
    ordered
}

fn participant_label(name: &str, roster: &Roster) -> String {
    match roster.get(name) {
        Some(p) => format!("{} ({})", p.name, p.role),
        None => name.to_string(),
    }
}
