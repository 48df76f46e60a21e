pub mod ansi;
mod chat_message;
mod chat_view;
pub mod column_map;
mod flash;
mod markdown;
mod prose;
mod selection;
mod spinner;
pub mod theme;
mod thinking_indicator;
mod turn_summary;
mod viewport;

pub use chat_message::{ChatMessage, MessageRole};
pub use chat_view::{ChatView, PanelConfig, PendingPermission, BORDER_OFFSET};
pub use flash::{Flash, FLASH_FRAMES};
pub use markdown::MarkdownRenderer;
pub use selection::{CellPos, ClickOutcome, ClickSettings, ClickTracker, Selection};
pub use spinner::{Spinner, SpinnerFrames, DEFAULT_FRAMES, DEFAULT_HOLDS};
pub use thinking_indicator::{
    container_progress, FixedVerb, RandomVerbs, StatusConfig, ThinkingIndicator, VerbSource,
    CONTAINER_MESSAGE, CONTAINER_PROGRESS_CAP, PROCESSING_WORDS,
};
pub use turn_summary::{format_duration, format_tokens, ModelUsage, StreamStats};
pub use viewport::Viewport;
