//! # MessageList Component
//!
//! Scrollable view of the meeting transcript.
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//!
//! Entries never change after they are appended, but they can be removed
//! from the middle (the typing placeholder, expired errors). Heights are
//! therefore cached per `EntryId`, not per index, and the prefix sums are
//! rebuilt every frame.

use std::collections::HashMap;
use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{EntryId, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the current scroll position
    pub has_unseen_content: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout.total_height().saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user scrolls back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
#[derive(Default)]
pub struct LayoutCache {
    heights: HashMap<EntryId, u16>,
    content_width: u16,
    /// Running bottom edge of each entry, in transcript order
    pub prefix_heights: Vec<u16>,
}

impl LayoutCache {
    /// Measure every entry at `content_width`, reusing cached heights.
    pub fn update(&mut self, transcript: &Transcript, content_width: u16) {
        if self.content_width != content_width {
            self.heights.clear();
            self.content_width = content_width;
        }
        // Drop heights of entries that are gone
        self.heights.retain(|id, _| transcript.contains(*id));

        let mut acc = 0u16;
        self.prefix_heights.clear();
        for entry in transcript.entries() {
            let h = *self
                .heights
                .entry(entry.id)
                .or_insert_with(|| Message::calculate_height(entry, content_width));
            acc = acc.saturating_add(h);
            self.prefix_heights.push(acc);
        }
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    pub fn cached_len(&self) -> usize {
        self.heights.len()
    }

    /// Entries overlapping the viewport, plus half a screen of slack each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
}

impl<'a> MessageList<'a> {
    pub fn new(state: &'a mut MessageListState, transcript: &'a Transcript) -> Self {
        Self { state, transcript }
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        self.state.layout.update(self.transcript, content_width);
        let total_height = self.state.layout.total_height();

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);

        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let entries = self.transcript.entries();
        let prefix = &self.state.layout.prefix_heights;
        for i in visible {
            let top = if i == 0 { 0 } else { prefix[i - 1] };
            let height = prefix[i] - top;
            let rect = Rect::new(0, top, content_width, height);
            scroll_view.render_widget(Message::new(&entries[i]), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content =
            total_height > area.height && offset < total_height.saturating_sub(area.height);
    }
}
