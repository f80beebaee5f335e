//! # InputBox Component
//!
//! The message field. Enter submits, Ctrl+J / Shift+Enter insert a newline.
//!
//! The buffer is internal state. `busy` and `focused` are props set by the
//! parent every frame. Submitting does not clear the buffer: the parent
//! clears it only once the send has actually been accepted, so a rejected
//! send keeps the text for another try.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Content lines shown before older lines scroll out of view
const MAX_VISIBLE_LINES: u16 = 5;

const READY_TITLE: &str = " Message (Enter to send, Ctrl+J for newline) ";
const BUSY_TITLE: &str = " Sending... ";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// A send is in flight (prop)
    pub busy: bool,
    /// Keyboard focus (prop)
    pub focused: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            busy: false,
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Height for the current buffer, between 1 and MAX_VISIBLE_LINES rows of content.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = wrapped_lines(&self.buffer, inner_width(area_width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// Cursor row and column within the wrapped buffer.
    fn cursor_row_col(&self, width: u16) -> (u16, u16) {
        let before = wrapped_lines(&self.buffer[..self.cursor], width);
        let row = before.len().saturating_sub(1) as u16;
        let col = before.last().map_or(0, |l| l.chars().count()) as u16;
        (row, col.min(width.saturating_sub(1)))
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wrap `text` the way the rendered paragraph does. A trailing newline opens
/// an empty last line so the cursor has somewhere to sit.
fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);
    let mut lines: Vec<String> = text
        .split('\n')
        .flat_map(|para| {
            let wrapped = textwrap::wrap(para, &options);
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped.into_iter().map(|l| l.into_owned()).collect()
            }
        })
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(text.len(), |c| pos + c.len_utf8())
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        let lines = wrapped_lines(&self.buffer, width);
        let (cursor_row, cursor_col) = self.cursor_row_col(width);

        // Keep the cursor's line in view
        let first_visible = (cursor_row + 1).saturating_sub(MAX_VISIBLE_LINES);
        let visible: Vec<&str> = lines
            .iter()
            .skip(first_visible as usize)
            .take(MAX_VISIBLE_LINES as usize)
            .map(String::as_str)
            .collect();

        let (title, border_style) = match (self.busy, self.focused) {
            (true, _) => (BUSY_TITLE, Style::default().fg(Color::DarkGray)),
            (false, true) => (READY_TITLE, Style::default().fg(Color::Green)),
            (false, false) => (
                READY_TITLE,
                Style::default().fg(Color::Green).add_modifier(Modifier::DIM),
            ),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title)
            .padding(Padding::horizontal(1));

        let input = Paragraph::new(visible.join("\n"))
            .block(block)
            .style(Style::default().fg(Color::Green));
        frame.render_widget(input, area);

        if self.focused {
            let x = area.x + 2 + cursor_col;
            let y = area.y + 1 + cursor_row - first_visible;
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut tmp));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Terminals send CR for newlines inside pastes
                self.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorHome => {
                self.cursor = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                None
            }
            TuiEvent::CursorEnd => {
                self.cursor = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                None
            }
            TuiEvent::Submit => Some(InputEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}
