use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{MemoryPanel, MessageList, RosterPanel, TitleBar};
use crate::tui::{Focus, TuiState};

const ROSTER_WIDTH: u16 = 34;
pub const QUIT_PROMPT: &str = "Leave the meeting? (y/n)";

/// Screen regions for one frame. Shared by drawing and mouse hit testing so
/// the two never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub title: Rect,
    pub roster: Rect,
    pub transcript: Rect,
    pub input: Rect,
}

impl AppLayout {
    pub fn new(frame_area: Rect, input_height: u16) -> Self {
        use Constraint::{Length, Min};
        let [title, body, input] =
            Layout::vertical([Length(1), Min(0), Length(input_height)]).areas(frame_area);
        let roster_width = ROSTER_WIDTH.min(body.width / 2);
        let [roster, transcript] = Layout::horizontal([Length(roster_width), Min(0)]).areas(body);
        Self {
            title,
            roster,
            transcript,
            input,
        }
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let input_height = tui.input_box.calculate_height(frame.area().width);
    let layout = AppLayout::new(frame.area(), input_height);

    TitleBar::new(
        app.status_label().to_string(),
        app.roster.counter_label(),
        tui.message_list.has_unseen_content,
    )
    .render(frame, layout.title);

    RosterPanel {
        state: &mut tui.roster_panel,
        roster: &app.roster,
        status: app.roster_status,
        focused: tui.focus == Focus::Roster && app.memory.is_none(),
    }
    .render(frame, layout.roster);

    MessageList::new(&mut tui.message_list, &app.transcript).render(frame, layout.transcript);

    tui.input_box.busy = app.is_sending();
    tui.input_box.focused =
        tui.focus == Focus::Input && app.memory.is_none() && !app.confirm_quit;
    tui.input_box.render(frame, layout.input);

    if let Some(view) = &app.memory {
        MemoryPanel::new(view, &mut tui.memory_panel).render(frame, frame.area());
    }

    if app.confirm_quit {
        draw_quit_prompt(frame);
    }
}

fn draw_quit_prompt(frame: &mut Frame) {
    let width = QUIT_PROMPT.len() as u16 + 4;
    let [row] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::styled(
            QUIT_PROMPT,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered()
        .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::core::memory::MemoryView;
    use crate::test_support::{sample_participants, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn layout_splits_roster_and_transcript() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30), 3);
        assert_eq!(layout.title.height, 1);
        assert_eq!(layout.input.height, 3);
        assert_eq!(layout.roster.width, ROSTER_WIDTH);
        assert_eq!(layout.transcript.x, ROSTER_WIDTH);
        assert_eq!(layout.transcript.width, 100 - ROSTER_WIDTH);
    }

    #[test]
    fn narrow_terminal_halves_roster() {
        let layout = AppLayout::new(Rect::new(0, 0, 40, 20), 3);
        assert_eq!(layout.roster.width, 20);
    }

    #[test]
    fn draws_meeting_after_roster_load() {
        let mut app = test_app();
        update(&mut app, Action::RosterLoaded(Ok(sample_participants())));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Participants: 4"));
        assert!(text.contains("[x] Select all"));
        assert!(text.contains("Welcome"));
    }

    #[test]
    fn draws_typing_placeholder_while_sending() {
        let mut app = test_app();
        update(&mut app, Action::RosterLoaded(Ok(sample_participants())));
        update(&mut app, Action::Submit("Can we automate onboarding?".to_string()));
        let mut tui = TuiState::new();
        let text = render(&app, &mut tui);
        assert!(text.contains("Can we automate onboarding?"));
        assert!(text.contains("Typing..."));
        assert!(text.contains("Sending..."));
    }

    #[test]
    fn memory_overlay_and_quit_prompt() {
        let mut app = test_app();
        app.memory = Some(MemoryView {
            name: "James Wilson".to_string(),
            memory_items: vec![],
            history: vec![],
        });
        let mut tui = TuiState::new();
        assert!(render(&app, &mut tui).contains("Memory: James Wilson"));

        app.memory = None;
        app.confirm_quit = true;
        assert!(render(&app, &mut tui).contains(QUIT_PROMPT));
    }
}
