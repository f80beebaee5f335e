//! # MemoryPanel Component
//!
//! Modal overlay with one participant's memory and recent conversation log.
//! Dismissed with Esc, `q`, or a click outside [`overlay_area`].
//!
//! A full snapshot is taller than most terminals, so the body scrolls with
//! the arrow keys, PgUp/PgDn, Home/End and the mouse wheel. The scroll bound
//! is recomputed on every render from the wrapped line count.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::memory::{MemoryView, NO_MEMORY_PLACEHOLDER};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const WIDTH_PERCENT: u16 = 70;
const HEIGHT_PERCENT: u16 = 80;

/// Centered rectangle the overlay occupies within `frame_area`.
pub fn overlay_area(frame_area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(HEIGHT_PERCENT)])
        .flex(Flex::Center)
        .areas(frame_area);
    let [area] = Layout::horizontal([Constraint::Percentage(WIDTH_PERCENT)])
        .flex(Flex::Center)
        .areas(row);
    area
}

/// Scroll position of the open overlay. Reset whenever the overlay closes.
#[derive(Debug, Default)]
pub struct MemoryPanelState {
    pub scroll: u16,
    /// Largest useful `scroll` for the last rendered size.
    pub max_scroll: u16,
    viewport_height: u16,
}

impl MemoryPanelState {
    fn page(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }
}

impl EventHandler for MemoryPanelState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        self.scroll = match event {
            TuiEvent::CursorUp | TuiEvent::ScrollUp => self.scroll.saturating_sub(1),
            TuiEvent::CursorDown | TuiEvent::ScrollDown => self.scroll.saturating_add(1),
            TuiEvent::ScrollPageUp => self.scroll.saturating_sub(self.page()),
            TuiEvent::ScrollPageDown => self.scroll.saturating_add(self.page()),
            TuiEvent::CursorHome => 0,
            TuiEvent::CursorEnd => self.max_scroll,
            _ => return None,
        }
        .min(self.max_scroll);
        None
    }
}

pub struct MemoryPanel<'a> {
    pub view: &'a MemoryView,
    pub state: &'a mut MemoryPanelState,
}

impl<'a> MemoryPanel<'a> {
    pub fn new(view: &'a MemoryView, state: &'a mut MemoryPanelState) -> Self {
        Self { view, state }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let heading = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(Color::DarkGray);

        let mut lines = vec![Line::styled("Memory", heading)];
        if self.view.has_memory() {
            lines.extend(
                self.view
                    .memory_items
                    .iter()
                    .map(|item| Line::from(format!("• {item}"))),
            );
        } else {
            lines.push(Line::styled(NO_MEMORY_PLACEHOLDER, dim));
        }

        lines.push(Line::default());
        lines.push(Line::styled("Recent conversations", heading));
        if self.view.history.is_empty() {
            lines.push(Line::styled("No conversations yet.", dim));
        }
        for entry in &self.view.history {
            lines.push(Line::styled(entry.timestamp.clone(), dim));
            lines.push(Line::from(vec![
                Span::styled("You: ", Style::default().fg(Color::Green)),
                Span::raw(entry.user_message.clone()),
            ]));
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", self.view.name),
                    Style::default().fg(Color::Blue),
                ),
                Span::raw(entry.response.clone()),
            ]));
            lines.push(Line::default());
        }
        lines
    }
}

/// Rows `lines` occupy once wrapped to `width`, matching `Paragraph`'s
/// word wrapping closely enough to bound the scroll.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return lines.len() as u16;
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    lines
        .iter()
        .map(|line| {
            let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
            textwrap::wrap(&text, &options).len().max(1) as u16
        })
        .sum()
}

impl<'a> Component for MemoryPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let area = overlay_area(area);
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Magenta))
            .title(format!(" Memory: {} ", self.view.name))
            .padding(Padding::horizontal(1));

        let body = block.inner(area);
        let lines = self.lines();
        let content_height = wrapped_height(&lines, body.width);
        self.state.viewport_height = body.height;
        self.state.max_scroll = content_height.saturating_sub(body.height);
        self.state.scroll = self.state.scroll.min(self.state.max_scroll);

        let hint = if self.state.max_scroll > 0 {
            " ↑/↓ scroll · Esc/q to close "
        } else {
            " Esc/q to close "
        };
        let block = block.title_bottom(Line::from(hint).alignment(Alignment::Right));

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false })
                .scroll((self.state.scroll, 0)),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::HistoryExcerpt;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render(view: &MemoryView) -> String {
        render_sized(view, &mut MemoryPanelState::default(), 100, 40)
    }

    fn render_sized(
        view: &MemoryView,
        state: &mut MemoryPanelState,
        width: u16,
        height: u16,
    ) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| MemoryPanel::new(view, &mut *state).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn overlay_is_centered_and_smaller() {
        let frame = Rect::new(0, 0, 100, 50);
        let area = overlay_area(frame);
        assert_eq!(area.width, 70);
        assert_eq!(area.height, 40);
        assert_eq!(area.x, 15);
        assert_eq!(area.y, 5);
    }

    #[test]
    fn empty_memory_shows_placeholder() {
        let view = MemoryView {
            name: "Alex Chen".to_string(),
            memory_items: vec![],
            history: vec![],
        };
        let text = render(&view);
        assert!(text.contains("Memory: Alex Chen"));
        assert!(text.contains(NO_MEMORY_PLACEHOLDER));
    }

    #[test]
    fn history_shows_timestamp_and_both_sides() {
        let view = MemoryView {
            name: "Maria Rodriguez".to_string(),
            memory_items: vec!["Prefers nightly backups".to_string()],
            history: vec![HistoryExcerpt {
                timestamp: "2024-03-01 09:30:00".to_string(),
                user_message: "How are backups run?".to_string(),
                response: "With pg_dump.".to_string(),
            }],
        };
        let text = render(&view);
        assert!(text.contains("Prefers nightly backups"));
        assert!(text.contains("2024-03-01 09:30:00"));
        assert!(text.contains("You: How are backups run?"));
        assert!(text.contains("Maria Rodriguez: With pg_dump."));
        assert!(!text.contains(NO_MEMORY_PLACEHOLDER));
    }

    fn full_view() -> MemoryView {
        MemoryView {
            name: "Alex Chen".to_string(),
            memory_items: (0..10).map(|i| format!("NOTE{i}")).collect(),
            history: (0..5)
                .map(|i| HistoryExcerpt {
                    timestamp: format!("2024-03-01 09:3{i}:00"),
                    user_message: format!("QUESTION{i}"),
                    response: format!("ANSWER{i}"),
                })
                .collect(),
        }
    }

    #[test]
    fn full_snapshot_scrolls_to_newest_history() {
        let view = full_view();
        let mut state = MemoryPanelState::default();

        // 24-row overlay leaves 22 body rows for 33 lines of content
        let top = render_sized(&view, &mut state, 100, 30);
        assert_eq!(state.max_scroll, 11);
        assert!(top.contains("NOTE0"));
        assert!(!top.contains("ANSWER4"));
        assert!(top.contains("scroll"));

        state.handle_event(&TuiEvent::CursorEnd);
        let bottom = render_sized(&view, &mut state, 100, 30);
        assert!(bottom.contains("ANSWER3"));
        assert!(bottom.contains("ANSWER4"));
        assert!(!bottom.contains("NOTE0"));

        state.handle_event(&TuiEvent::ScrollPageUp);
        state.handle_event(&TuiEvent::ScrollPageUp);
        assert_eq!(state.scroll, 0);
    }

    #[test]
    fn scroll_is_bounded_by_content() {
        let view = full_view();
        let mut state = MemoryPanelState::default();
        render_sized(&view, &mut state, 100, 30);
        for _ in 0..50 {
            state.handle_event(&TuiEvent::ScrollDown);
        }
        assert_eq!(state.scroll, state.max_scroll);

        // Short content never scrolls
        let mut state = MemoryPanelState::default();
        let text = render_sized(
            &MemoryView {
                name: "Alex Chen".to_string(),
                memory_items: vec![],
                history: vec![],
            },
            &mut state,
            100,
            30,
        );
        assert_eq!(state.max_scroll, 0);
        state.handle_event(&TuiEvent::CursorDown);
        assert_eq!(state.scroll, 0);
        assert!(!text.contains("scroll"));
    }
}
