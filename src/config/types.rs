use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hotkey::{Hotkey, DEFAULT_COMBO};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub status_bar: StatusBarConfig,
    #[serde(default)]
    pub hotkey: HotkeyConfig,
}

/// Preferences read by the expand/collapse state machine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StatusBarConfig {
    /// Collapse automatically some time after expanding
    #[serde(default = "default_true")]
    pub auto_collapse_enabled: bool,
    /// Seconds to wait before auto-collapsing: 5, 10, 15, 30 or 60
    #[serde(default)]
    pub auto_collapse_delay_seconds: AutoCollapseDelay,
    /// Show a dock icon and an empty app menu while expanded, freeing menu
    /// bar space for status items
    #[serde(default)]
    pub full_expand_enabled: bool,
    /// Collapse one second after launch
    #[serde(default = "default_true")]
    pub collapse_on_launch: bool,
}

impl Default for StatusBarConfig {
    fn default() -> Self {
        Self {
            auto_collapse_enabled: true,
            auto_collapse_delay_seconds: AutoCollapseDelay::default(),
            full_expand_enabled: false,
            collapse_on_launch: true,
        }
    }
}

impl StatusBarConfig {
    /// `None` when auto-collapse is turned off.
    pub fn auto_collapse_delay(&self) -> Option<Duration> {
        self.auto_collapse_enabled
            .then(|| self.auto_collapse_delay_seconds.duration())
    }
}

/// The delays offered for auto-collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(try_from = "u64", into = "u64")]
pub enum AutoCollapseDelay {
    Five,
    #[default]
    Ten,
    Fifteen,
    Thirty,
    Sixty,
}

impl AutoCollapseDelay {
    pub const ALL: [Self; 5] = [
        Self::Five,
        Self::Ten,
        Self::Fifteen,
        Self::Thirty,
        Self::Sixty,
    ];

    pub fn seconds(self) -> u64 {
        match self {
            Self::Five => 5,
            Self::Ten => 10,
            Self::Fifteen => 15,
            Self::Thirty => 30,
            Self::Sixty => 60,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs(self.seconds())
    }
}

impl TryFrom<u64> for AutoCollapseDelay {
    type Error = String;

    fn try_from(seconds: u64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|d| d.seconds() == seconds)
            .ok_or_else(|| {
                format!(
                    "invalid auto_collapse_delay_seconds {}, expected one of 5, 10, 15, 30, 60",
                    seconds
                )
            })
    }
}

impl From<AutoCollapseDelay> for u64 {
    fn from(delay: AutoCollapseDelay) -> Self {
        delay.seconds()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct HotkeyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Key combination, e.g. "cmd+alt+b"
    #[serde(default = "default_combo")]
    pub combo: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            combo: default_combo(),
        }
    }
}

impl HotkeyConfig {
    /// The parsed combo, or `None` when disabled or unparseable.
    pub fn hotkey(&self) -> Option<Hotkey> {
        if !self.enabled {
            return None;
        }
        self.combo.parse().ok()
    }
}

fn default_true() -> bool {
    true
}

fn default_combo() -> String {
    DEFAULT_COMBO.to_string()
}

/// A problem found while validating a loaded config.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub message: String,
    pub is_error: bool,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{}: {}", level, self.message)
    }
}

impl Config {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.hotkey.enabled {
            match self.hotkey.combo.parse::<Hotkey>() {
                Ok(hotkey) if hotkey.modifiers.is_empty() => issues.push(ConfigIssue {
                    message: format!(
                        "hotkey '{}' has no modifiers and will fire on every '{}' keystroke",
                        self.hotkey.combo, hotkey.key
                    ),
                    is_error: false,
                }),
                Ok(_) => {}
                Err(e) => issues.push(ConfigIssue {
                    message: format!("hotkey.combo: {}", e),
                    is_error: true,
                }),
            }
        }

        issues
    }
}
