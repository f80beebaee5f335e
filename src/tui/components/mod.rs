//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: status line with the participant counter
//! - `Message`: one transcript entry
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state across frames and emit events:
//! - `InputBox`: the message field
//! - `MessageList`: scrollable transcript with a per-entry height cache
//! - `RosterPanel`: participant checkboxes, the keyboard cursor and row scrolling
//! - `MemoryPanel`: the memory overlay and its scroll position
//!
//! Stateful components split into a persistent `...State` held by
//! `TuiState` and a transient wrapper built each frame around it.
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! TitleBar::new(app.status_label().to_string(), app.roster.counter_label(), unseen)
//!     .render(frame, area);
//! ```

pub mod input_box;
pub mod memory_panel;
pub mod message;
pub mod message_list;
pub mod roster_panel;
mod title_bar;

pub use input_box::{InputBox, InputEvent};
pub use memory_panel::{MemoryPanel, MemoryPanelState};
pub use message_list::{MessageList, MessageListState};
pub use roster_panel::{RosterEvent, RosterPanel, RosterPanelState};
pub use title_bar::TitleBar;
