//! Chat message types and helpers.

use ratatui::style::{Color, Modifier, Style};

use super::ansi::paint;
use super::theme::{ROLE_ASSISTANT, ROLE_USER};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn label(self) -> &'static str {
        match self {
            MessageRole::User => "You",
            MessageRole::Assistant => "Assistant",
        }
    }

    pub fn color(self) -> Color {
        match self {
            MessageRole::User => ROLE_USER,
            MessageRole::Assistant => ROLE_ASSISTANT,
        }
    }

    /// Styled label line shown above each message
    pub fn label_line(self) -> String {
        paint(
            self.label(),
            Style::default().fg(self.color()).add_modifier(Modifier::BOLD),
        )
    }
}

/// A single chat message; immutable once appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}
