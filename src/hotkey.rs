//! Global hotkey combinations.
//!
//! Combos are written the way users type them in the config file, e.g.
//! `cmd+alt+b`. Registration itself is platform plumbing (see
//! `platform::hotkey`); this module parses, matches, and decides where a
//! registered combo can be heard.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_COMBO: &str = "cmd+alt+b";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey is empty")]
    Empty,
    #[error("unknown modifier '{0}'")]
    UnknownModifier(String),
    #[error("hotkey '{0}' must end with a single key character")]
    MissingKey(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub command: bool,
    pub option: bool,
    pub control: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.command || self.option || self.control || self.shift)
    }
}

/// A single key plus the modifiers that must be held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub modifiers: Modifiers,
    /// Lowercased key character
    pub key: char,
}

impl Hotkey {
    /// Returns true if a key press with exactly these modifiers triggers the hotkey.
    pub fn matches(&self, key: char, modifiers: Modifiers) -> bool {
        self.key == key.to_ascii_lowercase() && self.modifiers == modifiers
    }
}

impl Default for Hotkey {
    fn default() -> Self {
        Self {
            modifiers: Modifiers {
                command: true,
                option: true,
                ..Modifiers::default()
            },
            key: 'b',
        }
    }
}

impl FromStr for Hotkey {
    type Err = HotkeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(HotkeyParseError::Empty);
        }

        let mut parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();
        let key_part = parts.pop().unwrap_or_default();
        let mut chars = key_part.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_whitespace() => c.to_ascii_lowercase(),
            _ => return Err(HotkeyParseError::MissingKey(trimmed.to_string())),
        };

        let mut modifiers = Modifiers::default();
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "cmd" | "command" => modifiers.command = true,
                "alt" | "opt" | "option" => modifiers.option = true,
                "ctrl" | "control" => modifiers.control = true,
                "shift" => modifiers.shift = true,
                other => return Err(HotkeyParseError::UnknownModifier(other.to_string())),
            }
        }

        Ok(Self { modifiers, key })
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.modifiers;
        for (held, name) in [
            (m.control, "ctrl"),
            (m.option, "alt"),
            (m.shift, "shift"),
            (m.command, "cmd"),
        ] {
            if held {
                write!(f, "{}+", name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

/// Where a registered hotkey is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyReach {
    /// Whichever app is frontmost
    Everywhere,
    /// Only while stowbar itself is frontmost
    OwnAppOnly,
}

impl HotkeyReach {
    /// Global key monitors stay silent without accessibility access, even
    /// though installing one succeeds.
    pub fn for_accessibility(trusted: bool) -> Self {
        if trusted {
            Self::Everywhere
        } else {
            Self::OwnAppOnly
        }
    }

    pub fn is_global(self) -> bool {
        self == Self::Everywhere
    }
}
