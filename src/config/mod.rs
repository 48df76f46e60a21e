mod settings;

pub use settings::{BackendConfig, Config, SelectionConfig, StatusSettings, EXAMPLE_CONFIG};
