pub mod app;
pub mod clipboard;
pub mod components;
pub mod effect;
pub mod events;
pub mod terminal_guard;

pub use app::App;
pub use effect::{Effect, Tick, TickKind};
pub use events::{AppEvent, PanelEvent};
