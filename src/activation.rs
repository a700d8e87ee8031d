//! Temporary foreground promotion while the bar is expanded.
//!
//! stowbar normally runs background-only (no dock icon, no app menu). With
//! full expand enabled, expanding promotes it to a regular foreground app with
//! a one-item menu, so the app menus of whatever was frontmost stop competing
//! with status items for menu bar space. Collapsing, or losing focus, demotes
//! it again.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationMode {
    /// Dock icon, app switcher entry and main menu
    Foreground,
    /// Status items only
    BackgroundOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub i32);

/// OS process and activation API.
pub trait ProcessActivation {
    fn activation_mode(&self) -> ActivationMode;
    fn set_activation_mode(&mut self, mode: ActivationMode);
    fn current_process(&self) -> ProcessId;
    fn frontmost_process(&self) -> Option<ProcessId>;
    /// Running processes in the order the shell reports them.
    fn running_processes(&self) -> Vec<ProcessId>;
    /// The shell's own foreground process (the Dock on macOS).
    fn shell_process(&self) -> Option<ProcessId>;
    fn activate(&mut self, process: ProcessId);
    /// Brings this process forward, taking activation from `from` if given.
    fn activate_self(&mut self, from: Option<ProcessId>);
    fn yield_activation(&mut self, to: ProcessId);
    fn resign_activation(&mut self);
    /// Replaces the main menu with a single app menu holding Quit.
    fn install_minimal_menu(&mut self);
}

/// Gap between activating the shell process and activating ourselves on the
/// first promotion.
pub const FIRST_ACTIVATION_DELAY: Duration = Duration::from_millis(200);

pub struct ForegroundActivationManager<P> {
    os: P,
    has_activated_before: bool,
    /// Second half of the first activation, due at this instant
    pending_activation: Option<Instant>,
}

impl<P: ProcessActivation> ForegroundActivationManager<P> {
    pub fn new(os: P) -> Self {
        Self {
            os,
            has_activated_before: false,
            pending_activation: None,
        }
    }

    /// Always asks the OS; the activation mode can change behind our back.
    pub fn is_active(&self) -> bool {
        self.os.activation_mode() == ActivationMode::Foreground
    }

    pub fn is_activation_pending(&self) -> bool {
        self.pending_activation.is_some()
    }

    pub fn activate_if_enabled(&mut self, enabled: bool) {
        self.activate_if_enabled_at(enabled, Instant::now());
    }

    pub fn activate_if_enabled_at(&mut self, enabled: bool, now: Instant) {
        if !enabled || self.is_active() || self.pending_activation.is_some() {
            return;
        }

        if self.has_activated_before {
            self.perform_activation();
            return;
        }

        // A background-only process asking to be promoted is ignored by the
        // window server the first time. Activating the Dock first and
        // promoting ourselves shortly after works around it.
        self.has_activated_before = true;
        match self.os.shell_process() {
            Some(shell) => self.os.activate(shell),
            None => log::warn!("Shell process not found; first activation may be ignored"),
        }
        self.pending_activation = Some(now + FIRST_ACTIVATION_DELAY);
        log::debug!("First activation deferred by {:?}", FIRST_ACTIVATION_DELAY);
    }

    /// Completes a deferred first activation once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) {
        match self.pending_activation {
            Some(due) if now >= due => {
                self.pending_activation = None;
                self.perform_activation();
            }
            _ => {}
        }
    }

    /// Drops a deferred first activation that has not completed yet.
    pub fn cancel_pending(&mut self) {
        if self.pending_activation.take().is_some() {
            log::debug!("Deferred activation cancelled");
        }
    }

    /// Leaves a deferred first activation alone: activating the shell
    /// process makes us resign active, which lands here mid-promotion.
    pub fn deactivate(&mut self) {
        if !self.is_active() {
            return;
        }

        let current = self.os.current_process();
        let next = self
            .os
            .running_processes()
            .into_iter()
            .find(|p| *p != current);
        match next {
            Some(process) => self.os.yield_activation(process),
            None => self.os.resign_activation(),
        }
        self.os.set_activation_mode(ActivationMode::BackgroundOnly);
        log::info!("Returned to background-only mode");
    }

    fn perform_activation(&mut self) {
        self.os.install_minimal_menu();
        let front = self.os.frontmost_process();
        self.os.activate_self(front);
        self.os.set_activation_mode(ActivationMode::Foreground);
        log::info!("Promoted to foreground");
    }

    #[cfg(test)]
    pub fn os(&self) -> &P {
        &self.os
    }
}
