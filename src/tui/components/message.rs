use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::format::{Emphasis, FormattedLine};
use crate::core::transcript::{ConversationEntry, EntryKind};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders one transcript entry.
///
/// `Message` is a **transient component**: it's created fresh each frame with
/// the entry it renders. The border title carries the sender label and the
/// local time the entry was rendered.
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) predicts rendered height using
/// `textwrap` with options that match Ratatui's `Paragraph` wrapping, so the
/// parent `MessageList` can lay out the scroll canvas before rendering.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a ConversationEntry,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a ConversationEntry) -> Self {
        Self { entry }
    }

    pub fn calculate_height(entry: &ConversationEntry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal too narrow for borders + padding
            return 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines: usize = entry
            .lines
            .iter()
            .map(|line| {
                let text: String = line.iter().map(|f| f.text.as_str()).collect();
                textwrap::wrap(&text, &options).len().max(1)
            })
            .sum();
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }
}

pub fn kind_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::User => Style::default().fg(Color::Green),
        EntryKind::Participant => Style::default().fg(Color::Blue),
        EntryKind::System => Style::default().fg(Color::Yellow),
        EntryKind::Error => Style::default().fg(Color::Red),
        EntryKind::Typing => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

fn emphasis_style(base: Style, emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Plain => base,
        Emphasis::Bold => base.add_modifier(Modifier::BOLD),
        Emphasis::Italic => base.add_modifier(Modifier::ITALIC),
        Emphasis::Code => base.fg(Color::Magenta).bg(Color::Black),
    }
}

fn to_line(line: &FormattedLine, base: Style) -> Line<'_> {
    Line::from(
        line.iter()
            .map(|f| Span::styled(f.text.as_str(), emphasis_style(base, f.emphasis)))
            .collect::<Vec<_>>(),
    )
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let style = kind_style(self.entry.kind);
        let border_style = style.add_modifier(Modifier::DIM);
        let title = format!(
            " {} · {} ",
            self.entry.sender,
            self.entry.timestamp.format("%H:%M:%S")
        );

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self.entry.lines.iter().map(|l| to_line(l, style)).collect();
        Paragraph::new(lines)
            .style(style)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
