//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Loop
//!
//! Each iteration:
//! 1. Tick the core clock (expires transient errors).
//! 2. Draw if anything changed.
//! 3. Poll terminal events, then drain every pending one before the next draw.
//! 4. Drain actions sent by background tasks (roster, chat, memory fetches).
//! 5. Write the session summary when its interval has elapsed.
//!
//! Network calls run as tokio tasks that report back over an `mpsc` channel.
//! `App` never leaves this thread.

mod component;
mod components;
mod event;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::backend::{ChatRequest, HttpBackend, MeetingBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::session;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::memory_panel::overlay_area;
use crate::tui::components::roster_panel::hit_test as roster_hit_test;
use crate::tui::components::{
    InputBox, InputEvent, MemoryPanelState, MessageListState, RosterEvent, RosterPanelState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::AppLayout;

/// Which panel receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Roster,
}

/// TUI-specific presentation state (not part of core meeting logic)
pub struct TuiState {
    pub message_list: MessageListState,
    pub input_box: InputBox,
    pub roster_panel: RosterPanelState,
    pub memory_panel: MemoryPanelState,
    pub focus: Focus,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            message_list: MessageListState::new(),
            input_box: InputBox::new(),
            roster_panel: RosterPanelState::default(),
            memory_panel: MemoryPanelState::default(),
            focus: Focus::Input, // User expects to type immediately
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Roster,
            Focus::Roster => Focus::Input,
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals without
        // it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            SetCursorStyle::DefaultUserShape
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn MeetingBackend> =
        match HttpBackend::new(&config.base_url, config.request_timeout) {
            Ok(b) => Arc::new(b),
            Err(e) => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    e.to_string(),
                ));
            }
        };
    info!("Using backend {} at {}", backend.name(), config.base_url);

    let mut app = App::new(backend, config.meeting.clone());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // The summary and terminal restore run even when the loop bails out
    let result = session::saving_on_exit(&mut app, &config.data_dir, |app| {
        event_loop(&mut terminal, app, &config)
    });
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    config: &ResolvedConfig,
) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut needs_redraw = true;
    let mut last_summary = Instant::now();
    let mut should_quit = dispatch(app, &mut tui, Action::LoadRoster, &tx);

    while !should_quit {
        let entries_before = app.transcript.len();
        update(app, Action::Tick(Instant::now()));
        if app.transcript.len() != entries_before {
            needs_redraw = true;
        }

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, app, &mut tui))?;
            needs_redraw = false;
        }

        // Wake often enough to expire errors on time; otherwise idle
        let timeout = if app.transcript.has_expiring() || app.is_sending() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        let frame_area = terminal.get_frame().area();
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(app, &mut tui, event, frame_area, &tx) {
                should_quit = true;
                break;
            }
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(app, &mut tui, action, &tx) {
                should_quit = true;
            }
        }

        if last_summary.elapsed() >= config.summary_interval {
            session::save_summary(app, &config.data_dir);
            last_summary = Instant::now();
        }
    }

    Ok(())
}

/// Run one action through the reducer and start whatever I/O it asks for.
/// Returns true when the app should exit.
fn dispatch(app: &mut App, tui: &mut TuiState, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::None => false,
        Effect::Quit => true,
        Effect::FetchRoster => {
            spawn_roster_load(app, tx.clone());
            false
        }
        Effect::SendChat(request) => {
            tui.input_box.clear();
            tui.message_list.stick_to_bottom = true;
            spawn_chat(app, request, tx.clone());
            false
        }
        Effect::FetchMemory(name) => {
            spawn_memory_fetch(app, name, tx.clone());
            false
        }
    }
}

/// Route one terminal event. Returns true when the app should exit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    frame_area: ratatui::layout::Rect,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        // Ctrl+C/Ctrl+Q always reaches the quit guard
        TuiEvent::ForceQuit => return dispatch(app, tui, Action::Quit, tx),
        _ => {}
    }

    // Quit confirmation is modal
    if app.confirm_quit {
        return match event {
            TuiEvent::InputChar('y' | 'Y') => dispatch(app, tui, Action::ConfirmQuit, tx),
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => {
                dispatch(app, tui, Action::CancelQuit, tx)
            }
            _ => false,
        };
    }

    // Memory overlay is modal too
    if app.memory.is_some() {
        let close = match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => true,
            TuiEvent::MouseClick(col, row) => {
                !overlay_area(frame_area).contains((col, row).into())
            }
            _ => {
                tui.memory_panel.handle_event(&event);
                false
            }
        };
        if !close {
            return false;
        }
        tui.memory_panel = MemoryPanelState::default();
        return dispatch(app, tui, Action::CloseMemory, tx);
    }

    match event {
        TuiEvent::ReloadRoster => dispatch(app, tui, Action::LoadRoster, tx),
        TuiEvent::FocusNext => {
            tui.toggle_focus();
            false
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown => {
            tui.message_list.handle_event(&event);
            false
        }
        TuiEvent::MouseClick(col, row) => {
            let layout = AppLayout::new(frame_area, tui.input_box.calculate_height(frame_area.width));
            if layout.input.contains((col, row).into()) {
                tui.focus = Focus::Input;
                return false;
            }
            if !layout.roster.contains((col, row).into()) {
                return false;
            }
            tui.focus = Focus::Roster;
            let roster_event = roster_hit_test(
                layout.roster,
                &app.roster,
                tui.roster_panel.offset,
                col,
                row,
            )
            .and_then(|hit| tui.roster_panel.handle_hit(hit, &app.roster));
            apply_roster_event(app, tui, roster_event, tx)
        }
        _ => match tui.focus {
            Focus::Input => match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(text)) => dispatch(app, tui, Action::Submit(text), tx),
                _ => false,
            },
            Focus::Roster => {
                let roster_event = tui.roster_panel.handle_event(&event, &app.roster);
                apply_roster_event(app, tui, roster_event, tx)
            }
        },
    }
}

fn apply_roster_event(
    app: &mut App,
    tui: &mut TuiState,
    event: Option<RosterEvent>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let action = match event {
        Some(RosterEvent::SetParticipant { name, checked }) => {
            Action::SetParticipant { name, checked }
        }
        Some(RosterEvent::SelectAll(checked)) => Action::SelectAll(checked),
        Some(RosterEvent::ViewMemory(name)) => Action::ViewMemory(name),
        None => return false,
    };
    dispatch(app, tui, action, tx)
}

fn spawn_roster_load(app: &App, tx: mpsc::Sender<Action>) {
    info!("Spawning roster load");
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let result = backend.team_members().await;
        if tx.send(Action::RosterLoaded(result)).is_err() {
            warn!("Failed to deliver roster: receiver dropped");
        }
    });
}

fn spawn_chat(app: &App, request: ChatRequest, tx: mpsc::Sender<Action>) {
    info!(
        "Spawning chat request to {} participants",
        request.selected_members.len()
    );
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let started = Instant::now();
        let result = backend.chat(&request).await;
        debug!("Chat request finished in {}ms", started.elapsed().as_millis());
        if tx.send(Action::ChatCompleted(result)).is_err() {
            warn!("Failed to deliver chat reply: receiver dropped");
        }
    });
}

fn spawn_memory_fetch(app: &App, name: String, tx: mpsc::Sender<Action>) {
    info!("Spawning memory fetch for {}", name);
    let backend = app.backend.clone();
    tokio::spawn(async move {
        let result = backend.member_memory(&name).await;
        if tx.send(Action::MemoryLoaded { name, result }).is_err() {
            warn!("Failed to deliver memory snapshot: receiver dropped");
        }
    });
}
