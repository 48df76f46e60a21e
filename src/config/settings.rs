use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ui::components::{ClickSettings, PanelConfig, StatusConfig};
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Status line animation
    pub status: StatusSettings,
    /// Selection and clipboard configuration
    pub selection: SelectionConfig,
    /// Scripted backend pacing
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSettings {
    pub tick_ms: u64,
    pub flash_tick_ms: u64,
    pub container_estimate_secs: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlStatusConfig {
    pub tick_ms: Option<u64>,
    pub flash_tick_ms: Option<u64>,
    pub container_estimate_secs: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionConfig {
    pub auto_copy_on_release: bool,
    pub double_click_ms: u64,
    pub click_tolerance: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlSelectionConfig {
    pub auto_copy_on_release: Option<bool>,
    pub double_click_ms: Option<u64>,
    pub click_tolerance: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendConfig {
    pub chunk_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBackendConfig {
    pub chunk_delay_ms: Option<u64>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub status: Option<TomlStatusConfig>,
    pub selection: Option<TomlSelectionConfig>,
    pub backend: Option<TomlBackendConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            status: StatusSettings {
                tick_ms: 80,
                flash_tick_ms: 150,
                container_estimate_secs: 45.0,
            },
            selection: SelectionConfig {
                auto_copy_on_release: true,
                double_click_ms: 500,
                click_tolerance: 2,
            },
            backend: BackendConfig { chunk_delay_ms: 30 },
        }
    }
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load from an explicit path; a missing or malformed file yields defaults
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed config");
                Config::default()
            }),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No config file");
                Config::default()
            }
        }
    }

    /// Parse TOML and merge it over the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config = toml::from_str::<TomlConfig>(contents)?;
        let mut config = Config::default();

        if let Some(status) = toml_config.status {
            if let Some(tick_ms) = status.tick_ms {
                config.status.tick_ms = tick_ms.max(1);
            }
            if let Some(flash_tick_ms) = status.flash_tick_ms {
                config.status.flash_tick_ms = flash_tick_ms.max(1);
            }
            if let Some(secs) = status.container_estimate_secs {
                if secs.is_finite() && secs >= 0.0 {
                    config.status.container_estimate_secs = secs;
                }
            }
        }

        if let Some(selection) = toml_config.selection {
            if let Some(auto_copy) = selection.auto_copy_on_release {
                config.selection.auto_copy_on_release = auto_copy;
            }
            if let Some(double_click_ms) = selection.double_click_ms {
                config.selection.double_click_ms = double_click_ms;
            }
            if let Some(tolerance) = selection.click_tolerance {
                config.selection.click_tolerance = tolerance;
            }
        }

        if let Some(backend) = toml_config.backend {
            if let Some(delay) = backend.chunk_delay_ms {
                config.backend.chunk_delay_ms = delay;
            }
        }

        Ok(config)
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    /// Panel settings derived from this config
    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            status: StatusConfig {
                tick_interval: Duration::from_millis(self.status.tick_ms),
                flash_interval: Duration::from_millis(self.status.flash_tick_ms),
                container_estimate: Duration::from_secs_f64(self.status.container_estimate_secs),
                ..StatusConfig::default()
            },
            clicks: ClickSettings {
                window: Duration::from_millis(self.selection.double_click_ms),
                tolerance: self.selection.click_tolerance,
            },
            auto_copy_on_release: self.selection.auto_copy_on_release,
        }
    }

    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.backend.chunk_delay_ms)
    }
}
