//! # Roster
//!
//! The loaded participants plus the set of names currently selected.
//!
//! The selection set is the source of truth. Checkbox rows, the tri-state
//! "select all" header and the participant counter are all derived from it
//! on every frame.

use std::collections::HashSet;

use crate::backend::Participant;

/// Derived state of the "select all" control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl SelectAllState {
    /// Checkbox glyph used by the roster panel.
    pub fn marker(self) -> &'static str {
        match self {
            SelectAllState::Unchecked => "[ ]",
            SelectAllState::Indeterminate => "[-]",
            SelectAllState::Checked => "[x]",
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    selected: HashSet<String>,
}

impl Roster {
    /// Build a roster from a freshly loaded list. Everyone starts selected.
    /// Later duplicates of a name are dropped so `name` stays a unique key.
    pub fn from_participants(participants: Vec<Participant>) -> Self {
        let mut seen = HashSet::new();
        let participants: Vec<Participant> = participants
            .into_iter()
            .filter(|p| seen.insert(p.name.clone()))
            .collect();
        let selected = participants.iter().map(|p| p.name.clone()).collect();
        Self {
            participants,
            selected,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// Add or remove a single participant. Unknown names are ignored.
    /// Returns true if the selection changed.
    pub fn toggle(&mut self, name: &str, checked: bool) -> bool {
        if self.get(name).is_none() {
            return false;
        }
        if checked {
            self.selected.insert(name.to_string())
        } else {
            self.selected.remove(name)
        }
    }

    pub fn select_all(&mut self, checked: bool) {
        self.selected.clear();
        if checked {
            self.selected
                .extend(self.participants.iter().map(|p| p.name.clone()));
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected names in roster order.
    pub fn selected_names(&self) -> Vec<String> {
        self.participants
            .iter()
            .filter(|p| self.selected.contains(&p.name))
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn select_all_state(&self) -> SelectAllState {
        let count = self.selected.len();
        if count == 0 {
            SelectAllState::Unchecked
        } else if count < self.participants.len() {
            SelectAllState::Indeterminate
        } else {
            SelectAllState::Checked
        }
    }

    pub fn counter_label(&self) -> String {
        format!("Participants: {}", self.selected.len())
    }
}
