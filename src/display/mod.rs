//! Switching the main display between its notched native resolution and the
//! letterboxed notch-less sibling.
//!
//! Only the main display is considered. The mode found at startup is kept so
//! it can be put back on shutdown; every change is applied for the login
//! session only.

mod mode;

pub use mode::{select_sibling, toggle_direction, DisplayMode};

use crate::error::{ConfigPhase, Error, NotchDirection, Result};

/// OS display API for the main display.
///
/// Error values are raw OS status codes.
pub trait DisplayBackend {
    /// Opaque OS mode handle
    type Mode;
    /// An open configuration transaction
    type Transaction;

    fn describe(&self, mode: &Self::Mode) -> DisplayMode;
    fn current_mode(&self) -> Option<Self::Mode>;
    /// Every advertised mode, including duplicate low-resolution entries.
    fn list_modes(&self) -> Vec<Self::Mode>;
    fn is_builtin_active(&self) -> bool;

    fn begin(&mut self) -> std::result::Result<Self::Transaction, i32>;
    fn apply(&mut self, tx: &mut Self::Transaction, mode: &Self::Mode)
        -> std::result::Result<(), i32>;
    /// Completes the change for the current login session only.
    fn commit(&mut self, tx: &mut Self::Transaction) -> std::result::Result<(), i32>;
    fn cancel(&mut self, tx: Self::Transaction);
}

pub struct DisplayModeSelector<D: DisplayBackend> {
    backend: D,
    original: Option<D::Mode>,
}

impl<D: DisplayBackend> DisplayModeSelector<D> {
    /// Captures the current mode as the one to restore on shutdown.
    pub fn new(backend: D) -> Self {
        let original = backend.current_mode();
        match &original {
            Some(mode) => {
                let m = backend.describe(mode);
                log::info!(
                    "Original display mode {}x{} @{:.0}Hz",
                    m.width,
                    m.height,
                    m.refresh_rate
                );
            }
            None => log::warn!("Could not read the current display mode at startup"),
        }
        Self { backend, original }
    }

    pub fn current(&self) -> Option<DisplayMode> {
        self.backend
            .current_mode()
            .map(|m| self.backend.describe(&m))
    }

    pub fn original(&self) -> Option<DisplayMode> {
        self.original.as_ref().map(|m| self.backend.describe(m))
    }

    /// True when the current mode is the notch-less 16:10 profile.
    pub fn is_notch_hidden(&self) -> bool {
        self.current().map(|m| m.is_notchless()).unwrap_or(false)
    }

    pub fn is_builtin_active(&self) -> bool {
        self.backend.is_builtin_active()
    }

    pub fn toggle(&mut self) -> Result<DisplayMode> {
        let current = self.current().ok_or(Error::CurrentModeUnavailable)?;
        match toggle_direction(&current) {
            NotchDirection::Show => self.show_notch(),
            NotchDirection::Hide => self.hide_notch(),
        }
    }

    pub fn hide_notch(&mut self) -> Result<DisplayMode> {
        self.switch(NotchDirection::Hide)
    }

    pub fn show_notch(&mut self) -> Result<DisplayMode> {
        self.switch(NotchDirection::Show)
    }

    /// Puts the startup mode back if the size has changed since. Returns
    /// true if a mode switch happened.
    pub fn restore_original_mode_if_needed(&mut self) -> Result<bool> {
        let Some(original) = self.original.take() else {
            return Ok(false);
        };
        let result = self.restore_to(&original);
        self.original = Some(original);
        result
    }

    fn restore_to(&mut self, original: &D::Mode) -> Result<bool> {
        let current = self.current().ok_or(Error::CurrentModeUnavailable)?;
        let wanted = self.backend.describe(original);
        if current.same_size(&wanted) {
            return Ok(false);
        }

        log::info!(
            "Restoring display mode {}x{} (currently {}x{})",
            wanted.width,
            wanted.height,
            current.width,
            current.height
        );
        self.apply_mode(original)?;
        Ok(true)
    }

    fn switch(&mut self, direction: NotchDirection) -> Result<DisplayMode> {
        let current = self.current().ok_or(Error::CurrentModeUnavailable)?;
        let modes = self.backend.list_modes();
        let described: Vec<DisplayMode> = modes.iter().map(|m| self.backend.describe(m)).collect();

        let index = select_sibling(&described, &current, direction)
            .ok_or(Error::DisplayModeNotFound(direction))?;
        let target = described[index];

        log::info!(
            "Switching to {} mode {}x{} @{:.0}Hz",
            direction,
            target.width,
            target.height,
            target.refresh_rate
        );
        self.apply_mode(&modes[index])?;
        Ok(target)
    }

    /// Begin, configure, commit. Any failure cancels the transaction so the
    /// previous mode stays in effect.
    fn apply_mode(&mut self, mode: &D::Mode) -> Result<()> {
        let mut tx = self.backend.begin().map_err(|code| Error::DisplayConfiguration {
            phase: ConfigPhase::Begin,
            code,
        })?;

        if let Err(code) = self.backend.apply(&mut tx, mode) {
            self.backend.cancel(tx);
            return Err(Error::DisplayConfiguration {
                phase: ConfigPhase::Apply,
                code,
            });
        }

        if let Err(code) = self.backend.commit(&mut tx) {
            self.backend.cancel(tx);
            return Err(Error::DisplayConfiguration {
                phase: ConfigPhase::Commit,
                code,
            });
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &D {
        &self.backend
    }
}
