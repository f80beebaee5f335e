//! # TitleBar Component
//!
//! Top status bar: app name, meeting status, the participant counter and a
//! `↓ New` indicator when the transcript has content below the scroll
//! position.
//!
//! Stateless. All props are set by the parent each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub const APP_TITLE: &str = "Roundtable: IT Department Meeting";

pub struct TitleBar {
    pub status: String,
    /// `Participants: N`
    pub counter: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(status: String, counter: String, has_unseen_content: bool) -> Self {
        Self {
            status,
            counter,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let mut parts = vec![APP_TITLE.to_string(), self.counter.clone()];
        if !self.status.is_empty() {
            parts.push(self.status.clone());
        }
        if self.has_unseen_content {
            parts.push("↓ New".to_string());
        }
        parts.join(" | ")
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(line, area);
    }
}
