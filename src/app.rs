//! Composition root: owns every component and reacts to control events.
//!
//! Platform code builds an [`App`], calls [`App::launch`] once, then feeds it
//! events and clock ticks from the control loop until an event returns
//! [`Flow::Exit`], and finally calls [`App::shutdown`].

use std::time::{Duration, Instant};

use crate::activation::ProcessActivation;
use crate::config::{status_bar_prefs, SharedConfig};
use crate::display::{DisplayBackend, DisplayMode, DisplayModeSelector};
use crate::error::Result;
use crate::event::ControlEvent;
use crate::presence::{ClickOutcome, CollapseState, StatusBarPresence};
use crate::shell::{Interaction, MenuModel, NotchMenuEntry, SlotHandle};

/// Gives the shell time to lay out the status items before the first collapse.
pub const LAUNCH_COLLAPSE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct App<H, P, I, D: DisplayBackend> {
    presence: StatusBarPresence<H, P, I>,
    display: DisplayModeSelector<D>,
    config: SharedConfig,
    /// Whether the machine's built-in display has a notch
    notched_device: bool,
    launch_collapse_at: Option<Instant>,
    shut_down: bool,
}

impl<H, P, I, D> App<H, P, I, D>
where
    H: SlotHandle,
    P: ProcessActivation,
    I: Interaction,
    D: DisplayBackend,
{
    pub fn new(
        presence: StatusBarPresence<H, P, I>,
        display: DisplayModeSelector<D>,
        config: SharedConfig,
        notched_device: bool,
    ) -> Self {
        Self {
            presence,
            display,
            config,
            notched_device,
            launch_collapse_at: None,
            shut_down: false,
        }
    }

    pub fn presence(&self) -> &StatusBarPresence<H, P, I> {
        &self.presence
    }

    pub fn display(&self) -> &DisplayModeSelector<D> {
        &self.display
    }

    pub fn launch(&mut self, now: Instant) {
        if status_bar_prefs(&self.config).collapse_on_launch {
            self.launch_collapse_at = Some(now + LAUNCH_COLLAPSE_DELAY);
        }
        log::info!("stowbar ready (notched display: {})", self.notched_device);
    }

    pub fn handle(&mut self, event: ControlEvent) -> Flow {
        log::debug!("Control event: {:?}", event);
        match event {
            ControlEvent::ArrowClicked(click) => {
                self.launch_collapse_at = None;
                if self.presence.handle_click(click) == ClickOutcome::ShowMenu {
                    let menu = self.menu_model();
                    self.presence.interaction_mut().show_context_menu(menu);
                }
            }
            ControlEvent::Hotkey => {
                self.launch_collapse_at = None;
                if let Err(e) = self.presence.toggle() {
                    log::debug!("Hotkey toggle rejected: {}", e);
                }
            }
            ControlEvent::ToggleNotch => report_display_change(self.display.toggle()),
            ControlEvent::ResignedActive => self.presence.resigned_active(),
            ControlEvent::Quit => return Flow::Exit,
        }
        Flow::Continue
    }

    pub fn tick(&mut self, now: Instant) {
        if let Some(due) = self.launch_collapse_at {
            if now >= due {
                self.launch_collapse_at = None;
                if self.presence.state() == CollapseState::Expanded {
                    if let Err(e) = self.presence.collapse() {
                        log::info!("Launch collapse skipped: {}", e);
                    }
                }
            }
        }
        self.presence.tick(now);
    }

    /// The notch entry is only offered on a notched machine whose built-in
    /// display is on.
    pub fn menu_model(&self) -> MenuModel {
        let notch = (self.notched_device && self.display.is_builtin_active()).then(|| {
            if self.display.is_notch_hidden() {
                NotchMenuEntry::ShowNotch
            } else {
                NotchMenuEntry::HideNotch
            }
        });
        MenuModel { notch }
    }

    /// Leaves no display change behind and removes the status items.
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        match self.display.restore_original_mode_if_needed() {
            Ok(true) => log::info!("Display mode restored"),
            Ok(false) => {}
            Err(e) => log::error!("Failed to restore display mode: {}", e),
        }
        self.presence.teardown();
        log::info!("stowbar stopped");
    }
}

fn report_display_change(result: Result<DisplayMode>) {
    match result {
        Ok(mode) => log::info!(
            "Display mode now {}x{} @{:.0}Hz",
            mode.width,
            mode.height,
            mode.refresh_rate
        ),
        Err(e) => log::warn!("Display mode unchanged: {}", e),
    }
}
