use std::time::Instant;

use crossterm::event::KeyEvent;

use crate::backend::BackendEvent;
use crate::ui::components::StreamStats;
use crate::ui::effect::Tick;

/// Events handled by the chat panel.
///
/// Mouse coordinates are panel-relative cells (the border is included).
#[derive(Debug, Clone)]
pub enum PanelEvent {
    /// Scheduled animation tick came due
    Tick(Tick),

    /// Key press routed to the panel
    Key(KeyEvent),

    /// Left button pressed
    MouseDown { x: u16, y: u16, at: Instant },

    /// Pointer moved with the left button held
    MouseDrag { x: u16, y: u16 },

    /// Left button released
    MouseUp { x: u16, y: u16 },

    /// Streamed assistant text chunk
    AppendText(String),

    /// Backend finished streaming the current reply
    StreamFinished,

    /// Usage statistics snapshot (replaces the previous one)
    Stats(StreamStats),

    /// Active subagent model, empty when none
    SubagentModel(String),

    /// Native clipboard write failed
    ClipboardFailed(String),
}

/// Application-level events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Input(crossterm::event::Event),

    /// Event from the backend stream
    Backend(BackendEvent),

    /// Backend stream closed
    BackendEnded,

    /// Scheduled tick came due
    Tick(Tick),

    /// Native clipboard write failed
    ClipboardFailed(String),

    /// Sandbox container finished booting
    ContainerReady,

    /// Request to quit the application
    Quit,
}

impl From<BackendEvent> for PanelEvent {
    fn from(event: BackendEvent) -> Self {
        match event {
            BackendEvent::Text(text) => PanelEvent::AppendText(text),
            BackendEvent::Stats(stats) => PanelEvent::Stats(stats),
            BackendEvent::SubagentModel(model) => PanelEvent::SubagentModel(model),
            BackendEvent::Finished => PanelEvent::StreamFinished,
        }
    }
}
