//! # Actions
//!
//! Everything that can happen in Roundtable becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The backend answers? That's `Action::ChatCompleted(result)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O the caller should
//! start. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::time::Instant;

use log::{debug, info, warn};

use crate::backend::{ApiError, ChatReply, ChatRequest, MemorySnapshot, Participant};
use crate::core::dispatch::{self, DispatchState, SendRejection};
use crate::core::memory::MemoryView;
use crate::core::roster::Roster;
use crate::core::state::{App, RosterStatus};
use crate::core::transcript::EntryKind;

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load team members";
pub const DISPATCH_FAILED_MESSAGE: &str = "Failed to get a response from the team. Please try again.";
pub const TYPING_TEXT: &str = "Typing...";
pub const USER_SENDER: &str = "You";
pub const TEAM_SENDER: &str = "Team";

#[derive(Debug)]
pub enum Action {
    /// Start the roster load, or retry one that failed.
    LoadRoster,
    RosterLoaded(Result<Vec<Participant>, ApiError>),
    SetParticipant { name: String, checked: bool },
    SelectAll(bool),
    Submit(String),
    ChatCompleted(Result<ChatReply, ApiError>),
    ViewMemory(String),
    MemoryLoaded {
        name: String,
        result: Result<MemorySnapshot, ApiError>,
    },
    CloseMemory,
    /// Periodic clock tick; expires transient errors.
    Tick(Instant),
    Quit,
    ConfirmQuit,
    CancelQuit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    FetchRoster,
    SendChat(ChatRequest),
    FetchMemory(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::LoadRoster => {
            if matches!(app.roster_status, RosterStatus::Loading | RosterStatus::Ready) {
                debug!("Roster reload ignored while {:?}", app.roster_status);
                return Effect::None;
            }
            if let Some(id) = app.load_error_entry.take() {
                app.transcript.remove(id);
            }
            app.roster_status = RosterStatus::Loading;
            Effect::FetchRoster
        }
        // The roster is fixed for the session once loaded
        Action::RosterLoaded(result) if app.roster_status == RosterStatus::Ready => {
            debug!("Late roster result ignored (ok={})", result.is_ok());
            Effect::None
        }
        Action::RosterLoaded(Ok(participants)) => {
            info!("Roster loaded: {} participants", participants.len());
            app.roster = Roster::from_participants(participants);
            app.roster_status = RosterStatus::Ready;
            Effect::None
        }
        Action::RosterLoaded(Err(e)) => {
            warn!("Roster load failed: {}", e);
            app.roster = Roster::default();
            app.roster_status = RosterStatus::Failed;
            app.load_error_entry = Some(app.transcript.show_persistent_error(LOAD_FAILED_MESSAGE));
            Effect::None
        }
        Action::SetParticipant { name, checked } => {
            if !app.roster.toggle(&name, checked) {
                debug!("Selection unchanged for {name} (checked={checked})");
            }
            Effect::None
        }
        Action::SelectAll(checked) => {
            app.roster.select_all(checked);
            Effect::None
        }
        Action::Submit(text) => submit(app, &text),
        Action::ChatCompleted(result) => {
            finish_dispatch(app);
            match result {
                Ok(reply) => {
                    let replies = dispatch::fan_out(
                        reply.responses.into_inner(),
                        &app.roster,
                        &app.meeting,
                    );
                    info!("Rendering {} replies", replies.len());
                    for reply in replies {
                        app.transcript
                            .append(&reply.label, &reply.text, EntryKind::Participant);
                    }
                }
                Err(e) => {
                    warn!("Chat request failed: {}", e);
                    app.transcript
                        .show_error(DISPATCH_FAILED_MESSAGE, Instant::now());
                }
            }
            Effect::None
        }
        Action::ViewMemory(name) => {
            app.pending_memory = Some(name.clone());
            Effect::FetchMemory(name)
        }
        Action::MemoryLoaded { name, result } => {
            if app.pending_memory.as_deref() != Some(name.as_str()) {
                debug!("Ignoring stale memory response for {name}");
                return Effect::None;
            }
            app.pending_memory = None;
            match result {
                Ok(snapshot) => {
                    app.memory = Some(MemoryView::from_snapshot(snapshot));
                }
                Err(e) => {
                    warn!("Memory fetch for {} failed: {}", name, e);
                    let message = match e {
                        ApiError::Api { message, .. } if !message.is_empty() => {
                            format!("Failed to load memory for {name}: {message}")
                        }
                        _ => format!("Failed to load memory for {name}"),
                    };
                    app.transcript.show_error(&message, Instant::now());
                }
            }
            Effect::None
        }
        Action::CloseMemory => {
            app.memory = None;
            Effect::None
        }
        Action::Tick(now) => {
            let expired = app.transcript.expire(now);
            if expired > 0 {
                debug!("Expired {expired} transient entries");
            }
            Effect::None
        }
        Action::Quit => {
            if app.has_history() && !app.confirm_quit {
                app.confirm_quit = true;
                Effect::None
            } else {
                Effect::Quit
            }
        }
        Action::ConfirmQuit => Effect::Quit,
        Action::CancelQuit => {
            app.confirm_quit = false;
            Effect::None
        }
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    let request = match dispatch::prepare_send(text, app.dispatch, &app.roster) {
        Ok(request) => request,
        Err(rejection) => {
            debug!("Send rejected: {:?}", rejection);
            if rejection != SendRejection::Busy {
                app.transcript.show_error(rejection.message(), Instant::now());
            }
            return Effect::None;
        }
    };

    app.transcript
        .append(USER_SENDER, &request.message, EntryKind::User);
    app.messages_sent += 1;
    app.typing_entry = Some(app.transcript.append(TEAM_SENDER, TYPING_TEXT, EntryKind::Typing));
    app.dispatch = DispatchState::Sending;
    Effect::SendChat(request)
}

/// Runs first on every dispatch completion, success or failure.
fn finish_dispatch(app: &mut App) {
    if let Some(id) = app.typing_entry.take() {
        app.transcript.remove(id);
    }
    app.dispatch = DispatchState::Idle;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HistoryEntry, Ordered};
    use crate::core::roster::SelectAllState;
    use crate::core::transcript::ERROR_TTL;
    use crate::test_support::{sample_participants, test_app, test_app_with_roster};

    fn kinds(app: &App) -> Vec<EntryKind> {
        app.transcript.entries().iter().map(|e| e.kind).collect()
    }

    fn last_text(app: &App) -> &str {
        &app.transcript.entries().last().unwrap().text
    }

    fn reply(pairs: &[(&str, &str)]) -> ChatReply {
        ChatReply {
            responses: pairs
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect::<Ordered<String>>(),
            ..Default::default()
        }
    }

    // ==========================================================================
    // Roster
    // ==========================================================================

    #[test]
    fn load_roster_requests_fetch() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::LoadRoster), Effect::FetchRoster);
        assert_eq!(app.roster_status, RosterStatus::Loading);
    }

    #[test]
    fn roster_loaded_selects_everyone() {
        let mut app = test_app();
        update(&mut app, Action::RosterLoaded(Ok(sample_participants())));
        assert_eq!(app.roster_status, RosterStatus::Ready);
        assert_eq!(app.roster.selected_count(), 4);
        assert_eq!(app.roster.select_all_state(), SelectAllState::Checked);
    }

    #[test]
    fn roster_failure_is_persistent_until_reload() {
        let mut app = test_app();
        update(
            &mut app,
            Action::RosterLoaded(Err(ApiError::Network("refused".to_string()))),
        );
        assert_eq!(app.roster_status, RosterStatus::Failed);
        assert!(app.roster.is_empty());
        assert_eq!(last_text(&app), LOAD_FAILED_MESSAGE);

        // Still there long after a transient error would have gone
        update(&mut app, Action::Tick(Instant::now() + ERROR_TTL * 10));
        assert_eq!(last_text(&app), LOAD_FAILED_MESSAGE);

        // A new load attempt clears it
        update(&mut app, Action::LoadRoster);
        assert!(app.transcript.entries().iter().all(|e| e.text != LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn reload_is_ignored_while_ready() {
        let mut app = test_app();
        update(&mut app, Action::LoadRoster);
        update(&mut app, Action::RosterLoaded(Ok(sample_participants())));
        update(&mut app, Action::SelectAll(false));
        update(
            &mut app,
            Action::SetParticipant {
                name: "Alex Chen".to_string(),
                checked: true,
            },
        );

        assert_eq!(update(&mut app, Action::LoadRoster), Effect::None);
        assert_eq!(app.roster_status, RosterStatus::Ready);
        assert_eq!(app.roster.selected_names(), vec!["Alex Chen".to_string()]);
    }

    #[test]
    fn reload_is_ignored_while_loading() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::LoadRoster), Effect::FetchRoster);
        assert_eq!(update(&mut app, Action::LoadRoster), Effect::None);
    }

    #[test]
    fn late_failure_does_not_wipe_loaded_roster() {
        let mut app = test_app();
        update(&mut app, Action::LoadRoster);
        update(&mut app, Action::RosterLoaded(Ok(sample_participants())));
        update(&mut app, Action::RosterLoaded(Err(ApiError::Timeout)));

        assert_eq!(app.roster_status, RosterStatus::Ready);
        assert_eq!(app.roster.len(), 4);
        assert!(app.load_error_entry.is_none());
        assert!(app.transcript.entries().iter().all(|e| e.text != LOAD_FAILED_MESSAGE));
    }

    #[test]
    fn set_participant_and_select_all_drive_tri_state() {
        let mut app = test_app_with_roster();
        update(
            &mut app,
            Action::SetParticipant {
                name: "Alex Chen".to_string(),
                checked: false,
            },
        );
        assert_eq!(app.roster.select_all_state(), SelectAllState::Indeterminate);
        assert_eq!(app.roster.counter_label(), "Participants: 3");

        update(&mut app, Action::SelectAll(false));
        assert_eq!(app.roster.select_all_state(), SelectAllState::Unchecked);

        update(&mut app, Action::SelectAll(true));
        assert_eq!(app.roster.select_all_state(), SelectAllState::Checked);
        assert_eq!(app.roster.counter_label(), "Participants: 4");
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    #[test]
    fn blank_sends_never_reach_the_backend() {
        for text in ["", "   "] {
            let mut app = test_app_with_roster();
            let effect = update(&mut app, Action::Submit(text.to_string()));
            assert_eq!(effect, Effect::None);
            assert_eq!(last_text(&app), SendRejection::EmptyMessage.message());
            assert_eq!(app.transcript.entries().last().unwrap().kind, EntryKind::Error);
            assert!(!app.is_sending());
        }
    }

    #[test]
    fn send_without_selection_is_rejected() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::SelectAll(false));
        let effect = update(&mut app, Action::Submit("hello".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(last_text(&app), SendRejection::NoParticipants.message());
        assert_eq!(app.messages_sent, 0);
    }

    #[test]
    fn valid_send_appends_user_then_typing() {
        let mut app = test_app_with_roster();
        let effect = update(&mut app, Action::Submit("  Hello team  ".to_string()));

        assert_eq!(
            effect,
            Effect::SendChat(ChatRequest {
                message: "Hello team".to_string(),
                selected_members: app.roster.selected_names(),
            })
        );
        assert!(app.is_sending());
        assert_eq!(
            kinds(&app),
            vec![EntryKind::System, EntryKind::User, EntryKind::Typing]
        );
        assert_eq!(app.transcript.entries()[1].text, "Hello team");
        assert_eq!(app.status_label(), "Sending...");
    }

    #[test]
    fn second_send_while_busy_is_a_no_op() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit("first".to_string()));
        let len_before = app.transcript.len();

        let effect = update(&mut app, Action::Submit("second".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(app.transcript.len(), len_before);
        assert_eq!(app.messages_sent, 1);
    }

    #[test]
    fn success_fans_out_with_supervisor_first() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit("Status?".to_string()));
        update(
            &mut app,
            Action::ChatCompleted(Ok(reply(&[
                ("Maria Rodriguez", "Backups are nightly."),
                ("Sarah Mitchell", "Let's prioritise."),
                ("Bob", "Who am I?"),
            ]))),
        );

        assert!(!app.is_sending());
        assert!(app.typing_entry.is_none());
        let senders: Vec<&str> = app
            .transcript
            .entries()
            .iter()
            .skip(2)
            .map(|e| e.sender.as_str())
            .collect();
        assert_eq!(
            senders,
            vec![
                "Sarah Mitchell (IT Supervisor)",
                "Maria Rodriguez (Database Administrator)",
                "Bob",
            ]
        );
        assert!(!kinds(&app).contains(&EntryKind::Typing));
    }

    #[test]
    fn failure_releases_busy_flag_and_reports() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit("Status?".to_string()));
        update(
            &mut app,
            Action::ChatCompleted(Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
        );

        assert!(!app.is_sending());
        assert_eq!(
            kinds(&app),
            vec![EntryKind::System, EntryKind::User, EntryKind::Error]
        );
        assert_eq!(last_text(&app), DISPATCH_FAILED_MESSAGE);

        // Idle again: the next send goes out
        let effect = update(&mut app, Action::Submit("Retry".to_string()));
        assert!(matches!(effect, Effect::SendChat(_)));
    }

    #[test]
    fn timeout_is_a_dispatch_failure() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit("Anyone?".to_string()));
        update(&mut app, Action::ChatCompleted(Err(ApiError::Timeout)));
        assert!(!app.is_sending());
        assert_eq!(last_text(&app), DISPATCH_FAILED_MESSAGE);
    }

    #[test]
    fn validation_error_expires() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit(String::new()));
        assert_eq!(app.transcript.len(), 2);

        update(&mut app, Action::Tick(Instant::now() + ERROR_TTL));
        assert_eq!(app.transcript.len(), 1);
    }

    // ==========================================================================
    // Memory
    // ==========================================================================

    fn snapshot(name: &str, entries: usize) -> MemorySnapshot {
        MemorySnapshot {
            name: name.to_string(),
            memory: vec!["[09:30:00] User said: hi...".to_string()],
            conversation_history: (0..entries)
                .map(|i| HistoryEntry {
                    timestamp: "2024-03-01T09:30:00".to_string(),
                    user_message: format!("q{i}"),
                    response: "x".repeat(120),
                })
                .collect(),
        }
    }

    #[test]
    fn memory_success_opens_overlay() {
        let mut app = test_app_with_roster();
        assert_eq!(
            update(&mut app, Action::ViewMemory("Alex Chen".to_string())),
            Effect::FetchMemory("Alex Chen".to_string())
        );
        update(
            &mut app,
            Action::MemoryLoaded {
                name: "Alex Chen".to_string(),
                result: Ok(snapshot("Alex Chen", 7)),
            },
        );

        let view = app.memory.as_ref().unwrap();
        assert_eq!(view.history.len(), 5);
        assert_eq!(view.history[0].user_message, "q2");
        assert!(view.history[0].response.ends_with("..."));
        assert!(app.pending_memory.is_none());

        update(&mut app, Action::CloseMemory);
        assert!(app.memory.is_none());
    }

    #[test]
    fn memory_failure_reports_and_stays_closed() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::ViewMemory("Nobody".to_string()));
        update(
            &mut app,
            Action::MemoryLoaded {
                name: "Nobody".to_string(),
                result: Err(ApiError::Api {
                    status: 404,
                    message: "Member not found".to_string(),
                }),
            },
        );
        assert!(app.memory.is_none());
        assert_eq!(
            last_text(&app),
            "Failed to load memory for Nobody: Member not found"
        );
        assert_eq!(app.transcript.entries().last().unwrap().kind, EntryKind::Error);
    }

    #[test]
    fn stale_memory_response_is_ignored() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::ViewMemory("Alex Chen".to_string()));
        update(&mut app, Action::ViewMemory("Maria Rodriguez".to_string()));
        update(
            &mut app,
            Action::MemoryLoaded {
                name: "Alex Chen".to_string(),
                result: Ok(snapshot("Alex Chen", 1)),
            },
        );
        assert!(app.memory.is_none());
        assert_eq!(app.pending_memory.as_deref(), Some("Maria Rodriguez"));
    }

    // ==========================================================================
    // Quit guard
    // ==========================================================================

    #[test]
    fn quit_without_history_is_immediate() {
        let mut app = test_app_with_roster();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }

    #[test]
    fn quit_with_history_asks_first() {
        let mut app = test_app_with_roster();
        update(&mut app, Action::Submit("hello".to_string()));

        assert_eq!(update(&mut app, Action::Quit), Effect::None);
        assert!(app.confirm_quit);

        update(&mut app, Action::CancelQuit);
        assert!(!app.confirm_quit);

        update(&mut app, Action::Quit);
        assert_eq!(update(&mut app, Action::ConfirmQuit), Effect::Quit);
    }
}
