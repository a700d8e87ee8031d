//! Error types shared by the status bar and display components.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which half of the notch toggle a display-mode search was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchDirection {
    /// Same width, smaller height (letterboxed, notch hidden)
    Hide,
    /// Same width, larger height (native, notch visible)
    Show,
}

impl fmt::Display for NotchDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hide => write!(f, "notch-less"),
            Self::Show => write!(f, "notched"),
        }
    }
}

/// Phase of the display configuration transaction that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPhase {
    Begin,
    Apply,
    Commit,
}

impl fmt::Display for ConfigPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => write!(f, "begin"),
            Self::Apply => write!(f, "apply"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// Every failure is non-fatal; callers log it and keep the last valid state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// One of the status items has no on-screen frame yet.
    #[error("status item position not available yet")]
    PositionUnavailable,
    /// The divider sits on or right of the arrow.
    #[error("divider (x={divider_x}) is not left of the arrow (x={arrow_x})")]
    InvalidOrdering { divider_x: f64, arrow_x: f64 },
    /// No sibling resolution exists for the requested direction.
    #[error("no {0} display mode found")]
    DisplayModeNotFound(NotchDirection),
    /// The OS did not report a current display mode.
    #[error("current display mode unavailable")]
    CurrentModeUnavailable,
    /// A display configuration transaction failed and was cancelled.
    #[error("display configuration failed during {phase} (CGError {code})")]
    DisplayConfiguration { phase: ConfigPhase, code: i32 },
}
