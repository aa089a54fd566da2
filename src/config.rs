//! Configuration file support for tvmaze-browser.
//!
//! This module provides functionality for loading and saving user preferences
//! from a TOML configuration file.

use crate::error::{AppError, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "tvmaze-browser";

/// Placeholder substituted with the show identifier in `episodes_url`.
pub const SHOW_ID_PLACEHOLDER: &str = "{id}";

/// User configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Catalog endpoint returning every show
    #[serde(default = "default_shows_url")]
    pub shows_url: String,

    /// Per-show episodes endpoint, `{id}` is replaced by the show identifier
    #[serde(default = "default_episodes_url")]
    pub episodes_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub keybindings: Keybindings,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn default_shows_url() -> String {
    "https://api.tvmaze.com/shows".to_string()
}

fn default_episodes_url() -> String {
    "https://api.tvmaze.com/shows/{id}/episodes".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("tvmaze-browser/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self {
            shows_url: default_shows_url(),
            episodes_url: default_episodes_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            keybindings: Keybindings::default(),
        }
    }

    /// Get the path to the config file.
    ///
    /// Returns ~/.config/tvmaze-browser/config.toml on Linux,
    /// or a platform-appropriate location on other systems.
    pub fn get_config_path() -> std::result::Result<PathBuf, io::Error> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
            })?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Default location of the log file.
    pub fn get_log_path() -> std::result::Result<PathBuf, io::Error> {
        let data_dir = dirs::data_local_dir()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Could not find data directory"))?
            .join(APP_DIR);

        Ok(data_dir.join("tvmaze-browser.log"))
    }

    /// Load config from disk.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::get_config_path()?;

        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default config path.
    ///
    /// Returns the path written to.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::get_config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating its directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check the endpoint templates.
    pub fn validate(&self) -> Result<()> {
        if !self.episodes_url.contains(SHOW_ID_PLACEHOLDER) {
            return Err(AppError::Config(format!(
                "episodes_url must contain {}: {}",
                SHOW_ID_PLACEHOLDER, self.episodes_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AppError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Substitute `show_id` into an episodes endpoint template.
pub fn expand_episodes_url(template: &str, show_id: u32) -> String {
    template.replace(SHOW_ID_PLACEHOLDER, &show_id.to_string())
}

/// Key names bound to each action.
///
/// Names are single characters (`"k"`, `"/"`), special keys (`"Up"`,
/// `"Enter"`, `"Esc"`, `"Tab"`, `"Backspace"`), or a `Ctrl+` prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub select: Vec<String>,
    /// Back to the show list
    pub back: Vec<String>,
    /// Focus the filter input
    pub filter: Vec<String>,
    /// Open the picker for the active list
    pub pick_item: Vec<String>,
    /// Open the show picker
    pub pick_show: Vec<String>,
    /// Clear filter and selection
    pub reset: Vec<String>,
    pub help: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            up: keys(&["k", "Up"]),
            down: keys(&["j", "Down"]),
            select: keys(&["Enter"]),
            back: keys(&["Backspace", "b"]),
            filter: keys(&["/"]),
            pick_item: keys(&["p"]),
            pick_show: keys(&["s"]),
            reset: keys(&["r"]),
            help: keys(&["?"]),
            quit: keys(&["q", "Ctrl+c"]),
        }
    }
}

impl Keybindings {
    /// Whether `key` matches any name in `binding`.
    pub fn matches(&self, binding: &[String], key: &KeyEvent) -> bool {
        binding.iter().any(|name| key_matches(name, key))
    }
}

fn key_matches(name: &str, key: &KeyEvent) -> bool {
    let (ctrl, base) = match name.strip_prefix("Ctrl+") {
        Some(rest) => (true, rest),
        None => (false, name),
    };
    if ctrl != key.modifiers.contains(KeyModifiers::CONTROL) {
        return false;
    }

    let code = match base {
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return false,
            }
        }
    };
    key.code == code
}
