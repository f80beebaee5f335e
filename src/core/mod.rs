//! # Core Application Logic
//!
//! This module contains Roundtable's meeting logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │    TUI     │          │  Backend   │
//!             │  Adapter   │          │   (HTTP)   │
//!             │ (ratatui)  │          │            │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all meeting state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`roster`]: Participants and the selection set
//! - [`dispatch`]: Send preconditions and reply fan-out
//! - [`transcript`]: Conversation entries and transient errors
//! - [`format`]: Inline emphasis markup
//! - [`memory`]: The memory overlay's presentation model
//! - [`session`]: Periodic session summary
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod dispatch;
pub mod format;
pub mod memory;
pub mod roster;
pub mod session;
pub mod state;
pub mod transcript;
