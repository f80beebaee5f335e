//! # RosterPanel Component
//!
//! Left-hand sidebar: the "select all" header, the participant counter and
//! one checkbox row per participant with a memory button.
//!
//! ```text
//! ┌ Team (Ctrl+L reload) ┐
//! │[-] Select all        │  row 0
//! │Participants: 3       │  row 1
//! │[x] Sarah Mitchell [m]│  row 2 + 2i
//! │    IT Supervisor     │  row 3 + 2i
//! │[ ] Alex Chen      [m]│
//! │    Senior Systems .. │
//! └──────────────────────┘
//! ```
//!
//! Every glyph is derived from the `Roster` each frame. The panel only owns
//! the keyboard cursor and the scroll offset of the participant rows. The two
//! header rows never scroll.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::roster::{Roster, SelectAllState};
use crate::core::state::RosterStatus;
use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

const HEADER_ROWS: u16 = 2;
const ROWS_PER_PARTICIPANT: u16 = 2;
const MEMORY_BUTTON: &str = "[m]";

/// What the user asked the roster to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    SetParticipant { name: String, checked: bool },
    SelectAll(bool),
    ViewMemory(String),
}

/// Where a click landed inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterHit {
    SelectAll,
    Participant(usize),
    Memory(usize),
}

/// Keyboard cursor over the rows. Row 0 is "select all", row `i + 1` is the
/// i-th participant.
#[derive(Debug, Default)]
pub struct RosterPanelState {
    pub cursor: usize,
    /// Index of the first participant drawn below the header.
    pub offset: usize,
    /// Participant slots that fit in the last rendered area.
    pub visible: usize,
}

impl RosterPanelState {
    /// Move `offset` so the highlighted participant is on screen.
    pub fn scroll_to_cursor(&mut self, roster_len: usize) {
        let visible = self.visible.max(1);
        self.offset = self.offset.min(roster_len.saturating_sub(visible));
        let Some(index) = self.cursor.checked_sub(1) else {
            return;
        };
        if index < self.offset {
            self.offset = index;
        } else if index >= self.offset + visible {
            self.offset = index + 1 - visible;
        }
    }

    /// Handle a key while the roster has focus.
    pub fn handle_event(&mut self, event: &TuiEvent, roster: &Roster) -> Option<RosterEvent> {
        self.cursor = self.cursor.min(roster.len());
        match event {
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                self.scroll_to_cursor(roster.len());
                None
            }
            TuiEvent::CursorDown => {
                self.cursor = (self.cursor + 1).min(roster.len());
                self.scroll_to_cursor(roster.len());
                None
            }
            TuiEvent::InputChar(' ') | TuiEvent::Submit => self.activate(RowTarget::Toggle, roster),
            TuiEvent::InputChar('a') => Some(toggle_all(roster)),
            TuiEvent::InputChar('m') => self.activate(RowTarget::Memory, roster),
            _ => None,
        }
    }

    /// Handle a click already resolved by [`hit_test`].
    pub fn handle_hit(&mut self, hit: RosterHit, roster: &Roster) -> Option<RosterEvent> {
        match hit {
            RosterHit::SelectAll => {
                self.cursor = 0;
                Some(toggle_all(roster))
            }
            RosterHit::Participant(i) => {
                self.cursor = i + 1;
                self.activate(RowTarget::Toggle, roster)
            }
            RosterHit::Memory(i) => {
                self.cursor = i + 1;
                self.activate(RowTarget::Memory, roster)
            }
        }
    }

    fn activate(&self, target: RowTarget, roster: &Roster) -> Option<RosterEvent> {
        if self.cursor == 0 {
            return match target {
                RowTarget::Toggle => Some(toggle_all(roster)),
                RowTarget::Memory => None,
            };
        }
        let p = roster.participants().get(self.cursor - 1)?;
        Some(match target {
            RowTarget::Toggle => RosterEvent::SetParticipant {
                name: p.name.clone(),
                checked: !roster.is_selected(&p.name),
            },
            RowTarget::Memory => RosterEvent::ViewMemory(p.name.clone()),
        })
    }
}

enum RowTarget {
    Toggle,
    Memory,
}

/// Clicking the header selects everyone unless everyone already is selected.
fn toggle_all(roster: &Roster) -> RosterEvent {
    RosterEvent::SelectAll(roster.select_all_state() != SelectAllState::Checked)
}

fn inner(area: Rect) -> Rect {
    Block::bordered().inner(area)
}

/// Participant rows that fit below the header in `area`.
fn visible_slots(area: Rect) -> usize {
    (inner(area).height.saturating_sub(HEADER_ROWS) / ROWS_PER_PARTICIPANT) as usize
}

/// Map a screen position to the roster row under it. `offset` is the first
/// participant currently drawn.
pub fn hit_test(
    area: Rect,
    roster: &Roster,
    offset: usize,
    col: u16,
    row: u16,
) -> Option<RosterHit> {
    let inner = inner(area);
    if !inner.contains((col, row).into()) {
        return None;
    }
    let line = row - inner.y;
    if line == 0 {
        return Some(RosterHit::SelectAll);
    }
    if line < HEADER_ROWS {
        return None;
    }
    let slot = ((line - HEADER_ROWS) / ROWS_PER_PARTICIPANT) as usize;
    if slot >= visible_slots(area) {
        return None;
    }
    let index = offset + slot;
    if index >= roster.len() {
        return None;
    }
    let button_start = inner.right().saturating_sub(MEMORY_BUTTON.len() as u16);
    let on_name_row = (line - HEADER_ROWS) % ROWS_PER_PARTICIPANT == 0;
    if on_name_row && col >= button_start {
        Some(RosterHit::Memory(index))
    } else {
        Some(RosterHit::Participant(index))
    }
}

fn marker(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub struct RosterPanel<'a> {
    pub state: &'a mut RosterPanelState,
    pub roster: &'a Roster,
    pub status: RosterStatus,
    pub focused: bool,
}

impl<'a> RosterPanel<'a> {
    fn lines(&self, width: u16) -> Vec<Line<'a>> {
        let highlight = |row: usize| {
            if self.focused && self.state.cursor == row {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            }
        };

        match self.status {
            RosterStatus::Idle | RosterStatus::Loading => {
                return vec![Line::from("Loading team...")];
            }
            RosterStatus::Failed => {
                return vec![
                    Line::styled("No team members", Style::default().fg(Color::Red)),
                    Line::from("Ctrl+L to retry"),
                ];
            }
            RosterStatus::Ready => {}
        }

        let mut lines = vec![
            Line::styled(
                format!("{} Select all", self.roster.select_all_state().marker()),
                highlight(0),
            ),
            Line::styled(
                self.roster.counter_label(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ];

        let rows = self
            .roster
            .participants()
            .iter()
            .enumerate()
            .skip(self.state.offset)
            .take(self.state.visible);
        for (i, p) in rows {
            let label = format!("{} {}", marker(self.roster.is_selected(&p.name)), p.name);
            let pad = (width as usize)
                .saturating_sub(label.chars().count() + MEMORY_BUTTON.len());
            lines.push(Line::from(vec![
                Span::styled(label, highlight(i + 1)),
                Span::raw(" ".repeat(pad)),
                Span::styled(MEMORY_BUTTON, Style::default().fg(Color::Magenta)),
            ]));
            lines.push(Line::styled(
                format!("    {}", p.role),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines
    }
}

impl<'a> Component for RosterPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Team ")
            .title_bottom(Line::from(" Tab/Space/a/m ").alignment(Alignment::Right));

        self.state.visible = visible_slots(area);
        self.state.cursor = self.state.cursor.min(self.roster.len());
        self.state.scroll_to_cursor(self.roster.len());

        let width = inner(area).width;
        let more_below = self.state.offset + self.state.visible < self.roster.len();
        let block = if self.state.offset > 0 || more_below {
            block.title(
                Line::from(format!(
                    " {}-{}/{} ",
                    self.state.offset + 1,
                    (self.state.offset + self.state.visible).min(self.roster.len()),
                    self.roster.len()
                ))
                .alignment(Alignment::Right),
            )
        } else {
            block
        };
        frame.render_widget(Paragraph::new(self.lines(width)).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{participant, sample_roster};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn area() -> Rect {
        Rect::new(0, 1, 30, 20)
    }

    fn render(state: &mut RosterPanelState, roster: &Roster, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                RosterPanel {
                    state: &mut *state,
                    roster,
                    status: RosterStatus::Ready,
                    focused: true,
                }
                .render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn large_roster() -> Roster {
        Roster::from_participants(
            (0..21)
                .map(|i| participant(&format!("Member{i:02}"), "Engineer"))
                .collect(),
        )
    }

    #[test]
    fn space_toggles_highlighted_participant() {
        let roster = sample_roster();
        let mut state = RosterPanelState::default();
        state.handle_event(&TuiEvent::CursorDown, &roster);
        state.handle_event(&TuiEvent::CursorDown, &roster);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar(' '), &roster),
            Some(RosterEvent::SetParticipant {
                name: "Alex Chen".to_string(),
                checked: false,
            })
        );
    }

    #[test]
    fn cursor_is_clamped_to_rows() {
        let roster = sample_roster();
        let mut state = RosterPanelState::default();
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown, &roster);
        }
        assert_eq!(state.cursor, roster.len());
        state.handle_event(&TuiEvent::CursorUp, &roster);
        assert_eq!(state.cursor, roster.len() - 1);
    }

    #[test]
    fn select_all_flips_from_tri_state() {
        let mut roster = sample_roster();
        let mut state = RosterPanelState::default();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('a'), &roster),
            Some(RosterEvent::SelectAll(false))
        );
        roster.toggle("Alex Chen", false);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('a'), &roster),
            Some(RosterEvent::SelectAll(true))
        );
    }

    #[test]
    fn m_on_header_does_nothing() {
        let roster = sample_roster();
        let mut state = RosterPanelState::default();
        assert_eq!(state.handle_event(&TuiEvent::InputChar('m'), &roster), None);
        state.handle_event(&TuiEvent::CursorDown, &roster);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('m'), &roster),
            Some(RosterEvent::ViewMemory("Sarah Mitchell".to_string()))
        );
    }

    #[test]
    fn hit_test_maps_rows() {
        let roster = sample_roster();
        // inner area starts at (1, 2)
        assert_eq!(hit_test(area(), &roster, 0, 3, 2), Some(RosterHit::SelectAll));
        assert_eq!(hit_test(area(), &roster, 0, 3, 3), None); // counter
        assert_eq!(hit_test(area(), &roster, 0, 3, 4), Some(RosterHit::Participant(0)));
        assert_eq!(hit_test(area(), &roster, 0, 3, 5), Some(RosterHit::Participant(0)));
        assert_eq!(hit_test(area(), &roster, 0, 3, 6), Some(RosterHit::Participant(1)));
        assert_eq!(hit_test(area(), &roster, 0, 27, 6), Some(RosterHit::Memory(1)));
        assert_eq!(hit_test(area(), &roster, 0, 3, 12), None); // below the list
        assert_eq!(hit_test(area(), &roster, 0, 0, 4), None); // border
    }

    #[test]
    fn click_on_row_toggles() {
        let roster = sample_roster();
        let mut state = RosterPanelState::default();
        assert_eq!(
            state.handle_hit(RosterHit::Participant(3), &roster),
            Some(RosterEvent::SetParticipant {
                name: "James Wilson".to_string(),
                checked: false,
            })
        );
        assert_eq!(state.cursor, 4);
    }

    #[test]
    fn renders_tri_state_and_counter() {
        let mut roster = sample_roster();
        roster.toggle("Maria Rodriguez", false);
        let mut state = RosterPanelState::default();
        let text = render(&mut state, &roster, 40, 14);
        assert!(text.contains("[-] Select all"));
        assert!(text.contains("Participants: 3"));
        assert!(text.contains("[ ] Maria Rodriguez"));
        assert!(text.contains("[x] James Wilson"));
    }

    #[test]
    fn long_roster_scrolls_to_keep_cursor_visible() {
        let roster = large_roster();
        let mut state = RosterPanelState::default();
        // 24 inner rows: the header plus 11 participants
        let first = render(&mut state, &roster, 34, 26);
        assert_eq!(state.visible, 11);
        assert!(first.contains("Member10"));
        assert!(!first.contains("Member11"));

        for _ in 0..roster.len() {
            state.handle_event(&TuiEvent::CursorDown, &roster);
        }
        assert_eq!(state.cursor, 21);
        let text = render(&mut state, &roster, 34, 26);
        assert!(text.contains("Member20"));
        assert!(!text.contains("Member09"));
        assert!(text.contains("[x] Select all"));
        assert_eq!(state.offset, 10);

        // Header stays pinned and scrolling back up follows the cursor
        for _ in 0..21 {
            state.handle_event(&TuiEvent::CursorUp, &roster);
        }
        let text = render(&mut state, &roster, 34, 26);
        assert_eq!(state.offset, 0);
        assert!(text.contains("Member00"));
    }

    #[test]
    fn hit_test_accounts_for_scroll_offset() {
        let roster = large_roster();
        // 24 inner rows hold 11 slots
        let panel = Rect::new(0, 0, 34, 26);
        assert_eq!(hit_test(panel, &roster, 10, 3, 3), Some(RosterHit::Participant(10)));
        assert_eq!(hit_test(panel, &roster, 10, 3, 23), Some(RosterHit::Participant(20)));
        assert_eq!(hit_test(panel, &roster, 0, 3, 23), Some(RosterHit::Participant(10)));
        assert_eq!(hit_test(panel, &roster, 0, 3, 24), Some(RosterHit::Participant(10)));
        assert_eq!(hit_test(panel, &roster, 0, 3, 25), None); // border
    }
}
