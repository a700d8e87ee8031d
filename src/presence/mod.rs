//! The expand/collapse state machine over the divider and arrow status items.
//!
//! Collapsing works by growing the divider far wider than any screen. The
//! shell then has no room left for the items registered before it (everything
//! to its left), so they are pushed off-screen. Expanding shrinks it back.

mod position;
mod scheduler;

pub use position::{check_ordering, is_valid_ordering};
pub use scheduler::{AutoCollapseScheduler, TimerToken};

use std::time::Instant;

use crate::activation::{ForegroundActivationManager, ProcessActivation};
use crate::config::{status_bar_prefs, SharedConfig};
use crate::error::{Error, Result};
use crate::shell::{Glyph, Interaction, ScreenPoint, SlotHandle, SlotId, StatusArea};

/// Divider width while expanded.
pub const DIVIDER_VISIBLE_WIDTH: f64 = 20.0;
/// Divider width while collapsed; wider than any real display.
pub const DIVIDER_COLLAPSED_WIDTH: f64 = 10_000.0;
/// Lets the shell size the item to its content.
pub const VARIABLE_WIDTH: f64 = -1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollapseState {
    Expanded,
    Collapsed,
}

/// A mouse click on the arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Click {
    /// Left click; `modifier` is true when control was held
    Primary { modifier: bool },
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Toggled,
    ShowMenu,
}

/// One registered status item and what we last asked the shell to show.
pub struct IndicatorSlot<H> {
    id: SlotId,
    handle: H,
    width: f64,
    glyph: Glyph,
    visible: bool,
}

impl<H: SlotHandle> IndicatorSlot<H> {
    fn register<A>(area: &mut A, id: SlotId, width: f64, glyph: Glyph) -> Self
    where
        A: StatusArea<Handle = H>,
    {
        let mut handle = area.register(id, width);
        handle.set_icon(glyph);
        handle.set_visible(true);
        Self {
            id,
            handle,
            width,
            glyph,
            visible: true,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn glyph(&self) -> Glyph {
        self.glyph
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Option<ScreenPoint> {
        self.handle.screen_position()
    }

    fn set_width(&mut self, width: f64) {
        self.width = width;
        self.handle.set_width(width);
    }

    fn set_glyph(&mut self, glyph: Glyph) {
        self.glyph = glyph;
        self.handle.set_icon(glyph);
    }

    fn remove(&mut self) {
        self.visible = false;
        self.handle.remove();
    }
}

pub struct StatusBarPresence<H, P, I> {
    divider: IndicatorSlot<H>,
    arrow: IndicatorSlot<H>,
    state: CollapseState,
    scheduler: AutoCollapseScheduler,
    activation: ForegroundActivationManager<P>,
    interaction: I,
    config: SharedConfig,
    /// Set once the wrong-position warning has been shown; cleared by the
    /// next successful collapse.
    ordering_warning_shown: bool,
}

impl<H, P, I> StatusBarPresence<H, P, I>
where
    H: SlotHandle,
    P: ProcessActivation,
    I: Interaction,
{
    /// Registers the divider, then the arrow, so the divider lands on the
    /// arrow's left by default.
    pub fn new<A>(area: &mut A, processes: P, interaction: I, config: SharedConfig) -> Self
    where
        A: StatusArea<Handle = H>,
    {
        let divider = IndicatorSlot::register(
            area,
            SlotId::Divider,
            DIVIDER_VISIBLE_WIDTH,
            Glyph::Separator,
        );
        let arrow = IndicatorSlot::register(area, SlotId::Arrow, VARIABLE_WIDTH, Glyph::Collapse);

        Self {
            divider,
            arrow,
            state: CollapseState::Expanded,
            scheduler: AutoCollapseScheduler::new(),
            activation: ForegroundActivationManager::new(processes),
            interaction,
            config,
            ordering_warning_shown: false,
        }
    }

    pub fn state(&self) -> CollapseState {
        self.state
    }

    pub fn divider(&self) -> &IndicatorSlot<H> {
        &self.divider
    }

    pub fn arrow(&self) -> &IndicatorSlot<H> {
        &self.arrow
    }

    pub fn scheduler(&self) -> &AutoCollapseScheduler {
        &self.scheduler
    }

    pub fn activation(&self) -> &ForegroundActivationManager<P> {
        &self.activation
    }

    pub fn interaction_mut(&mut self) -> &mut I {
        &mut self.interaction
    }

    pub fn is_valid_position(&self) -> bool {
        is_valid_ordering(self.divider.position(), self.arrow.position())
    }

    pub fn handle_click(&mut self, click: Click) -> ClickOutcome {
        match click {
            Click::Primary { modifier: false } => {
                if let Err(e) = self.toggle() {
                    log::debug!("Toggle rejected: {}", e);
                }
                ClickOutcome::Toggled
            }
            Click::Primary { modifier: true } | Click::Secondary => ClickOutcome::ShowMenu,
        }
    }

    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            CollapseState::Collapsed => {
                self.expand();
                Ok(())
            }
            CollapseState::Expanded => self.collapse(),
        }
    }

    /// Hides everything left of the divider. Rejected, with the scheduler
    /// re-armed for another try, when the divider is not left of the arrow.
    pub fn collapse(&mut self) -> Result<()> {
        if self.state == CollapseState::Collapsed {
            return Ok(());
        }

        if let Err(err) = check_ordering(self.divider.position(), self.arrow.position()) {
            match err {
                Error::InvalidOrdering { .. } => {
                    log::warn!("Not collapsing: {}", err);
                    if !self.ordering_warning_shown {
                        self.ordering_warning_shown = true;
                        self.interaction.warn_invalid_ordering();
                    }
                }
                _ => log::debug!("Not collapsing: {}", err),
            }
            self.arm_auto_collapse();
            return Err(err);
        }

        self.divider.set_width(DIVIDER_COLLAPSED_WIDTH);
        self.arrow.set_glyph(Glyph::Expand);
        self.activation.cancel_pending();
        self.activation.deactivate();
        self.state = CollapseState::Collapsed;
        self.scheduler.disarm();
        self.ordering_warning_shown = false;
        log::info!("Collapsed");
        Ok(())
    }

    /// Shows the hidden items again. Returns false if already expanded.
    pub fn expand(&mut self) -> bool {
        if self.state == CollapseState::Expanded {
            return false;
        }

        let prefs = status_bar_prefs(&self.config);
        self.divider.set_width(DIVIDER_VISIBLE_WIDTH);
        self.arrow.set_glyph(Glyph::Collapse);
        self.activation.activate_if_enabled(prefs.full_expand_enabled);
        self.state = CollapseState::Expanded;
        self.arm_auto_collapse();
        log::info!("Expanded");
        true
    }

    /// Fires due timers: the deferred half of a first activation and the
    /// auto-collapse.
    pub fn tick(&mut self, now: Instant) {
        self.activation.poll(now);
        if self.scheduler.take_due(now) {
            log::debug!("Auto-collapse timer fired");
            if let Err(e) = self.collapse() {
                log::debug!("Auto-collapse rejected: {}", e);
            }
        }
    }

    /// The app lost focus; never keep foreground prominence past that.
    pub fn resigned_active(&mut self) {
        self.activation.deactivate();
    }

    /// Removes both status items. Called once on shutdown.
    pub fn teardown(&mut self) {
        self.scheduler.disarm();
        self.activation.cancel_pending();
        self.activation.deactivate();
        self.arrow.remove();
        self.divider.remove();
    }

    fn arm_auto_collapse(&mut self) {
        let delay = match self.state {
            CollapseState::Expanded => status_bar_prefs(&self.config).auto_collapse_delay(),
            CollapseState::Collapsed => None,
        };
        self.scheduler.arm(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::{ActivationMode, ProcessId};
    use crate::config::{self, AutoCollapseDelay, Config};
    use crate::testing::{FakeInteraction, FakeProcesses, FakeSlot, FakeStatusArea};
    use std::time::Duration;

    type Presence = StatusBarPresence<FakeSlot, FakeProcesses, FakeInteraction>;

    struct Harness {
        area: FakeStatusArea,
        config: SharedConfig,
        presence: Presence,
    }

    fn harness_with(config: Config) -> Harness {
        let mut area = FakeStatusArea::new();
        let config = config::shared(config);
        let presence = StatusBarPresence::new(
            &mut area,
            FakeProcesses::new(ProcessId(100), Some(ProcessId(7))),
            FakeInteraction::default(),
            config.clone(),
        );
        area.set_position(SlotId::Divider, 800.0);
        area.set_position(SlotId::Arrow, 850.0);
        Harness {
            area,
            config,
            presence,
        }
    }

    fn harness() -> Harness {
        harness_with(Config::default())
    }

    #[test]
    fn test_registration_order_and_initial_state() {
        let h = harness();
        assert_eq!(h.area.registered(), vec![SlotId::Divider, SlotId::Arrow]);
        assert_eq!(h.presence.state(), CollapseState::Expanded);
        assert_eq!(h.area.width(SlotId::Divider), DIVIDER_VISIBLE_WIDTH);
        assert_eq!(h.area.glyph(SlotId::Arrow), Some(Glyph::Collapse));
        assert_eq!(h.area.glyph(SlotId::Divider), Some(Glyph::Separator));
    }

    #[test]
    fn test_valid_toggle_collapses() {
        let mut h = harness();
        h.presence.toggle().unwrap();

        assert_eq!(h.presence.state(), CollapseState::Collapsed);
        assert_eq!(h.area.width(SlotId::Divider), DIVIDER_COLLAPSED_WIDTH);
        assert_eq!(h.area.glyph(SlotId::Arrow), Some(Glyph::Expand));
        assert!(!h.presence.scheduler().is_armed());
    }

    #[test]
    fn test_toggle_back_expands_and_arms_timer() {
        let mut h = harness();
        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();

        assert_eq!(h.presence.state(), CollapseState::Expanded);
        assert_eq!(h.area.width(SlotId::Divider), DIVIDER_VISIBLE_WIDTH);
        assert_eq!(h.presence.divider().width(), DIVIDER_VISIBLE_WIDTH);
        assert_eq!(h.area.glyph(SlotId::Arrow), Some(Glyph::Collapse));
        assert_eq!(
            h.presence.scheduler().pending_delay(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_toggles_strictly_alternate() {
        let mut h = harness();
        let mut expected = CollapseState::Expanded;
        for _ in 0..7 {
            h.presence.toggle().unwrap();
            expected = match expected {
                CollapseState::Expanded => CollapseState::Collapsed,
                CollapseState::Collapsed => CollapseState::Expanded,
            };
            assert_eq!(h.presence.state(), expected);
        }
    }

    #[test]
    fn test_invalid_ordering_warns_once_and_stays_expanded() {
        let mut h = harness();
        h.area.set_position(SlotId::Divider, 900.0);

        let err = h.presence.toggle().unwrap_err();
        assert!(matches!(err, Error::InvalidOrdering { .. }));
        assert_eq!(h.presence.state(), CollapseState::Expanded);
        assert_eq!(h.area.width(SlotId::Divider), DIVIDER_VISIBLE_WIDTH);
        assert!(h.presence.scheduler().is_armed());

        assert!(h.presence.toggle().is_err());
        assert_eq!(h.presence.interaction_mut().warnings(), 1);
    }

    #[test]
    fn test_warning_latch_resets_after_successful_collapse() {
        let mut h = harness();
        h.area.set_position(SlotId::Divider, 900.0);
        assert!(h.presence.collapse().is_err());

        h.area.set_position(SlotId::Divider, 800.0);
        h.presence.collapse().unwrap();
        h.presence.expand();

        h.area.set_position(SlotId::Divider, 900.0);
        assert!(h.presence.collapse().is_err());
        assert_eq!(h.presence.interaction_mut().warnings(), 2);
    }

    #[test]
    fn test_invalid_ordering_never_changes_state() {
        let mut h = harness();
        for divider_x in [850.0, 851.0, 2000.0] {
            h.area.set_position(SlotId::Divider, divider_x);
            assert!(h.presence.collapse().is_err());
            assert_eq!(h.presence.state(), CollapseState::Expanded);
        }
    }

    #[test]
    fn test_unavailable_position_rejects_without_warning() {
        let mut h = harness();
        h.area.clear_position(SlotId::Arrow);

        assert_eq!(h.presence.collapse(), Err(Error::PositionUnavailable));
        assert_eq!(h.presence.state(), CollapseState::Expanded);
        assert_eq!(h.presence.interaction_mut().warnings(), 0);
        assert!(h.presence.scheduler().is_armed());
    }

    #[test]
    fn test_rejected_collapse_retries_once_repositioned() {
        let mut h = harness();
        h.area.set_position(SlotId::Divider, 900.0);
        assert!(h.presence.collapse().is_err());

        h.area.set_position(SlotId::Divider, 700.0);
        h.presence.tick(Instant::now() + Duration::from_secs(11));
        assert_eq!(h.presence.state(), CollapseState::Collapsed);
    }

    #[test]
    fn test_auto_collapse_fires_after_delay() {
        let mut h = harness();
        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();

        h.presence.tick(Instant::now());
        assert_eq!(h.presence.state(), CollapseState::Expanded);

        h.presence.tick(Instant::now() + Duration::from_secs(11));
        assert_eq!(h.presence.state(), CollapseState::Collapsed);
    }

    #[test]
    fn test_auto_collapse_disabled_never_arms() {
        let mut config = Config::default();
        config.status_bar.auto_collapse_enabled = false;
        let mut h = harness_with(config);

        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();
        assert!(!h.presence.scheduler().is_armed());

        h.presence.tick(Instant::now() + Duration::from_secs(3600));
        assert_eq!(h.presence.state(), CollapseState::Expanded);
    }

    #[test]
    fn test_delay_preference_is_read_on_each_expand() {
        let mut h = harness();
        h.presence.toggle().unwrap();
        h.config.write().unwrap().status_bar.auto_collapse_delay_seconds =
            AutoCollapseDelay::Sixty;
        h.presence.toggle().unwrap();
        assert_eq!(
            h.presence.scheduler().pending_delay(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn test_full_expand_promotes_and_collapse_demotes() {
        let mut config = Config::default();
        config.status_bar.full_expand_enabled = true;
        let mut h = harness_with(config);

        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();
        h.presence
            .tick(Instant::now() + crate::activation::FIRST_ACTIVATION_DELAY);
        assert!(h.presence.activation().is_active());

        h.presence.toggle().unwrap();
        assert!(!h.presence.activation().is_active());
        assert_eq!(
            h.presence.activation().os().mode(),
            ActivationMode::BackgroundOnly
        );
    }

    #[test]
    fn test_resigned_active_demotes_even_when_expanded() {
        let mut config = Config::default();
        config.status_bar.full_expand_enabled = true;
        let mut h = harness_with(config);
        h.presence.activation().os().force_mode(ActivationMode::Foreground);

        h.presence.resigned_active();
        assert!(!h.presence.activation().is_active());
        assert_eq!(h.presence.state(), CollapseState::Expanded);
    }

    #[test]
    fn test_resign_mid_promotion_ends_in_foreground() {
        let mut config = Config::default();
        config.status_bar.full_expand_enabled = true;
        let mut h = harness_with(config);

        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();
        assert!(h.presence.activation().is_activation_pending());

        h.presence.resigned_active();
        h.presence
            .tick(Instant::now() + crate::activation::FIRST_ACTIVATION_DELAY);
        assert!(h.presence.activation().is_active());
    }

    #[test]
    fn test_collapse_cancels_pending_promotion() {
        let mut config = Config::default();
        config.status_bar.full_expand_enabled = true;
        let mut h = harness_with(config);

        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();
        h.presence.toggle().unwrap();
        assert!(!h.presence.activation().is_activation_pending());

        h.presence
            .tick(Instant::now() + crate::activation::FIRST_ACTIVATION_DELAY);
        assert!(!h.presence.activation().is_active());
    }

    #[test]
    fn test_click_semantics() {
        let mut h = harness();
        assert_eq!(
            h.presence.handle_click(Click::Secondary),
            ClickOutcome::ShowMenu
        );
        assert_eq!(
            h.presence.handle_click(Click::Primary { modifier: true }),
            ClickOutcome::ShowMenu
        );
        assert_eq!(h.presence.state(), CollapseState::Expanded);

        assert_eq!(
            h.presence.handle_click(Click::Primary { modifier: false }),
            ClickOutcome::Toggled
        );
        assert_eq!(h.presence.state(), CollapseState::Collapsed);
    }

    #[test]
    fn test_teardown_removes_both_slots() {
        let mut h = harness();
        h.presence.teardown();
        assert!(h.area.removed(SlotId::Divider));
        assert!(h.area.removed(SlotId::Arrow));
        assert!(!h.presence.divider().is_visible());
    }
}
