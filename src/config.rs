//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/hyprnear/config.json`.
//! Every section is optional, so a missing file or an empty `{}` yields the
//! compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "focus": {
//!     "denylist": ["Kodi"],
//!     "warp_pointer": false
//!   },
//!   "arrival": {
//!     "fullscreen_handoff": true
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Directional focus settings.
    #[serde(default)]
    pub focus: FocusConfig,

    /// New-window policy settings.
    #[serde(default)]
    pub arrival: ArrivalConfig,
}

/// Directional focus settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    /// Window titles or classes that focus never moves to.  Default:
    /// `["Kodi"]`.
    pub denylist: Vec<String>,
    /// Move the pointer along when focus jumps to another screen.
    /// Default: `false`.
    pub warp_pointer: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            denylist: vec!["Kodi".to_string()],
            warp_pointer: false,
        }
    }
}

/// What happens when a window is opened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    /// A new window takes over fullscreen from the window already
    /// fullscreen on the current screen.  Default: `true`.
    pub fullscreen_handoff: bool,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            fullscreen_handoff: true,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
