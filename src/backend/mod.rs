//! Content source for the chat panel.
//!
//! The real model backend lives outside this crate; the panel only sees the
//! [`BackendEvent`] stream. [`ScriptedBackend`] replays a canned reply with
//! realistic pacing so the panel can be driven end to end.

mod scripted;

pub use scripted::{ScriptBuilder, ScriptedBackend, DEMO_SCRIPT};

use crate::ui::components::StreamStats;

/// Event delivered by the backend while a reply streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    /// Next chunk of assistant text
    Text(String),
    /// Usage snapshot replacing the previous one
    Stats(StreamStats),
    /// Active subagent model, empty when none
    SubagentModel(String),
    /// Reply complete
    Finished,
}
