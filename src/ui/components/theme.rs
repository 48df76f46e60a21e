//! Shared UI color constants.

use ratatui::style::Color;

/// Steady selection highlight.
pub const SELECTION_FG: Color = Color::Rgb(235, 235, 235);
pub const SELECTION_BG: Color = Color::Rgb(40, 60, 80);

/// Copy-confirmation flash over the selection.
pub const SELECTION_FLASH_FG: Color = Color::Rgb(20, 20, 20);
pub const SELECTION_FLASH_BG: Color = Color::Rgb(255, 180, 80);

pub const ROLE_USER: Color = Color::Green;
pub const ROLE_ASSISTANT: Color = Color::Rgb(215, 119, 87);

pub const STATUS_META: Color = Color::DarkGray;
pub const STATUS_VALUE: Color = Color::Gray;

pub const COMPLETION_BRIGHT: Color = Color::LightGreen;
pub const COMPLETION_DIM: Color = Color::Green;

pub const CODE_RULE: Color = Color::DarkGray;

pub const PERMISSION_ACCENT: Color = Color::Yellow;

pub const PROGRESS_FILLED: Color = Color::Cyan;
pub const PROGRESS_EMPTY: Color = Color::DarkGray;

/// Inline markdown in prose lines.
pub const MARKDOWN_CODE_FG: Color = Color::Yellow;
pub const MARKDOWN_CODE_BG: Color = Color::Rgb(40, 40, 40);
pub const MARKDOWN_BULLET: Color = Color::Cyan;
pub const MARKDOWN_LINK: Color = Color::Blue;
pub const MARKDOWN_QUOTE_BAR: Color = Color::DarkGray;
pub const MARKDOWN_QUOTE_TEXT: Color = Color::Gray;
