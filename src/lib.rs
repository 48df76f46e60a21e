pub mod backend;
pub mod config;
pub mod ui;
pub mod util;

pub use backend::{BackendEvent, ScriptedBackend};
pub use config::Config;
pub use ui::components::ChatView;
pub use ui::App;
