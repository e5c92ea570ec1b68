/// Runtime configuration loaded from `config.toml`.
///
/// [`GameConfig`] mirrors the defaults in [`crate::rules`].  Any subset of
/// keys may be present in the file; missing keys keep their defaults.
///
/// ```toml
/// variant = "deluxe"
/// width = 480.0
/// starting_health = 3
/// ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::rules::{Rules, Variant, DEFAULT_HEALTH, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    /// Play-field size in world units.
    pub width: f32,
    pub height: f32,
    pub starting_health: u32,
    /// Target frame length of the terminal loop.
    pub frame_ms: u64,
    /// Fixed RNG seed; a random seed is drawn when absent.
    pub seed: Option<u64>,
    pub save_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            starting_health: DEFAULT_HEALTH,
            frame_ms: 16,
            seed: None,
            save_dir: None,
        }
    }
}

impl GameConfig {
    /// `$HOME/.upgrade_shooter/config.toml`
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".upgrade_shooter").join("config.toml")
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `path`.  A missing file yields the defaults; unreadable or
    /// malformed files are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load `path`, falling back to the defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }

    pub fn rules(&self) -> Rules {
        Rules::for_variant(
            self.variant,
            self.width.max(1.0),
            self.height.max(1.0),
            self.starting_health.max(1),
        )
    }
}
