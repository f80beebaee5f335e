//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::backend::{
    ApiError, ChatReply, ChatRequest, MeetingBackend, MemorySnapshot, Participant,
};
use crate::core::config::MeetingSettings;
use crate::core::roster::Roster;
use crate::core::state::App;

/// A backend for tests that never touch the network.
pub struct NoopBackend;

#[async_trait]
impl MeetingBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    async fn team_members(&self) -> Result<Vec<Participant>, ApiError> {
        Ok(Vec::new())
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatReply, ApiError> {
        Ok(ChatReply::default())
    }

    async fn member_memory(&self, name: &str) -> Result<MemorySnapshot, ApiError> {
        Ok(MemorySnapshot {
            name: name.to_string(),
            ..Default::default()
        })
    }
}

pub fn participant(name: &str, role: &str) -> Participant {
    Participant {
        name: name.to_string(),
        role: role.to_string(),
        expertise: format!("{role} things"),
        personality: None,
    }
}

pub fn sample_participants() -> Vec<Participant> {
    vec![
        participant("Sarah Mitchell", "IT Supervisor"),
        participant("Alex Chen", "Senior Systems Administrator"),
        participant("Maria Rodriguez", "Database Administrator"),
        participant("James Wilson", "Network Security Specialist"),
    ]
}

/// The four-person IT team, everyone selected.
pub fn sample_roster() -> Roster {
    Roster::from_participants(sample_participants())
}

/// Creates a test App with a NoopBackend and no roster loaded yet.
pub fn test_app() -> App {
    App::new(Arc::new(NoopBackend), MeetingSettings::default())
}

/// Creates a test App whose roster has already loaded.
pub fn test_app_with_roster() -> App {
    let mut app = test_app();
    app.roster = sample_roster();
    app.roster_status = crate::core::state::RosterStatus::Ready;
    app
}
