use std::path::{Path, PathBuf};

use crossterm::event::KeyCode;
use serde::Deserialize;

use crate::view::ViewId;
use crate::view::filter::FilterMode;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub filters: FiltersConfig,
    pub colors: ColorsConfig,
    pub logging: LoggingConfig,
    pub keybinds: KeybindsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_rate_ms: u64,
    /// Services are listed on every Nth tick.
    pub service_refresh_every: u32,
    pub terminate_timeout_ms: u64,
    pub start_paused: bool,
    pub default_view: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_rate_ms: 2000,
            service_refresh_every: 5,
            terminate_timeout_ms: 3000,
            start_paused: false,
            default_view: "processes".to_string(),
        }
    }
}

/// Initial filter mode for each filterable view.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FiltersConfig {
    pub processes: String,
    pub details: String,
    pub services: String,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        FiltersConfig {
            processes: "name".to_string(),
            details: "name".to_string(),
            services: "name".to_string(),
        }
    }
}

impl FiltersConfig {
    pub fn mode_for(&self, view: ViewId) -> FilterMode {
        let mode = match view {
            ViewId::Processes => FilterMode::from_str_config(&self.processes),
            ViewId::Details => FilterMode::from_str_config(&self.details),
            ViewId::Services => FilterMode::from_str_config(&self.services),
            ViewId::Users => FilterMode::default(),
        };
        view.supported_filter_mode(mode)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub theme: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        ColorsConfig {
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub enabled: bool,
    pub level: String,
    /// Overrides the default log location under the data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            enabled: true,
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub terminate: String,
    pub filter: String,
    pub filter_mode: String,
    pub pause: String,
    pub theme: String,
    pub refresh: String,
    pub help: String,
    pub start_service: String,
    pub stop_service: String,
    pub restart_service: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            terminate: "k".to_string(),
            filter: "/".to_string(),
            filter_mode: "m".to_string(),
            pause: "p".to_string(),
            theme: "t".to_string(),
            refresh: "r".to_string(),
            help: "?".to_string(),
            start_service: "s".to_string(),
            stop_service: "x".to_string(),
            restart_service: "R".to_string(),
        }
    }
}

/// Parses a keybind string: a single character, a named key, or `F1`..`F12`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    match lower.as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        _ => lower
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("taskboard").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Config::default()
            }
        },
        Err(_) => Config::default(),
    }
}
