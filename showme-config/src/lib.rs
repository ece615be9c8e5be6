use std::{fmt, path::Path, str::FromStr};

/// Environment variable naming a JSON file with [`ToastConfig`] overrides.
pub const CONFIG_ENV: &str = "SHOWME_CONFIG";

/// Screen corner a toast stack is anchored to.
///
/// Every position owns an independent queue with its own capacity.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl Position {
    pub const ALL: [Position; 4] = [
        Position::TopRight,
        Position::TopLeft,
        Position::BottomRight,
        Position::BottomLeft,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::TopRight => "top-right",
            Position::TopLeft => "top-left",
            Position::BottomRight => "bottom-right",
            Position::BottomLeft => "bottom-left",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPosition(s.to_string()))
    }
}

/// Process-wide default option set.
///
/// Only [`ToastConfig::merge`] mutates it; options passed to a single toast are
/// resolved against a copy and never written back.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ToastConfig {
    /// The maximum number of toasts that can be displayed at once per position.
    #[serde(default = "default_max_visible")]
    pub max_visible: u32,
    /// Time in milliseconds a toast stays up when the caller gives no duration.
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u32,
    #[serde(default)]
    pub default_position: Position,
    /// Whether hosts should run enter/exit transitions (default: false)
    #[serde(default)]
    pub animation_enabled: bool,
    /// Horizontal travel in pixels that turns a gesture into a dismissal (default: 50)
    #[serde(default = "default_swipe_threshold_px")]
    pub swipe_threshold_px: u32,
    #[serde(default = "default_corner_radius")]
    pub corner_radius: u32,
    /// How long an animated exit transition runs before the host confirms it (default: 300)
    #[serde(default = "default_exit_transition_ms")]
    pub exit_transition_ms: u32,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            max_visible: default_max_visible(),
            default_duration_ms: default_duration_ms(),
            default_position: Position::default(),
            animation_enabled: false,
            swipe_threshold_px: default_swipe_threshold_px(),
            corner_radius: default_corner_radius(),
            exit_transition_ms: default_exit_transition_ms(),
        }
    }
}

impl ToastConfig {
    /// Merge a partial set of defaults into this config.
    ///
    /// Fields left as `None` in the patch keep their current value.
    pub fn merge(&mut self, patch: &ConfigPatch) {
        if let Some(max_visible) = patch.max_visible {
            self.max_visible = max_visible;
        }
        if let Some(duration) = patch.default_duration_ms {
            self.default_duration_ms = duration;
        }
        if let Some(position) = patch.default_position {
            self.default_position = position;
        }
        if let Some(animation) = patch.animation_enabled {
            self.animation_enabled = animation;
        }
        if let Some(threshold) = patch.swipe_threshold_px {
            self.swipe_threshold_px = threshold;
        }
        if let Some(radius) = patch.corner_radius {
            self.corner_radius = radius;
        }
        if let Some(exit) = patch.exit_transition_ms {
            self.exit_transition_ms = exit;
        }
    }

    /// Effective queue capacity. A configured zero is treated as one.
    pub fn capacity(&self) -> usize {
        self.max_visible.max(1) as usize
    }

    /// Load a config from a JSON file. Missing fields fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        let config = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tracing::debug!("Loaded toast config from {}", path.display());
        Ok(config)
    }
}

/// Partial defaults accepted by the `config` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub max_visible: Option<u32>,
    pub default_duration_ms: Option<u32>,
    pub default_position: Option<Position>,
    pub animation_enabled: Option<bool>,
    pub swipe_threshold_px: Option<u32>,
    pub corner_radius: Option<u32>,
    pub exit_transition_ms: Option<u32>,
}

/// Config loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read
    Io(String),
    /// The config file is not valid JSON for [`ToastConfig`]
    Parse(String),
    /// A position name that is not one of the four corners
    UnknownPosition(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Parse(e) => write!(f, "Invalid config: {}", e),
            ConfigError::UnknownPosition(name) => write!(f, "Unknown position '{}'", name),
        }
    }
}

impl std::error::Error for ConfigError {}

// Default value helpers for serde
const fn default_max_visible() -> u32 {
    5
}

const fn default_duration_ms() -> u32 {
    4000
}

const fn default_swipe_threshold_px() -> u32 {
    50
}

const fn default_corner_radius() -> u32 {
    4
}

const fn default_exit_transition_ms() -> u32 {
    300
}
