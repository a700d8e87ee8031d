//! Interfaces to the desktop shell's status area and user-facing surfaces.
//!
//! The core never talks to AppKit directly. The macOS implementations live in
//! `platform`; tests use in-memory fakes.

/// Identity of the two indicator slots this app registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    /// The separator whose width is ballooned to hide icons left of it
    Divider,
    /// The expand/collapse button
    Arrow,
}

impl SlotId {
    /// Name the shell uses to remember the slot's position across launches.
    pub fn autosave_name(self) -> &'static str {
        match self {
            Self::Divider => "stowbar_separator",
            Self::Arrow => "stowbar_arrow",
        }
    }
}

/// Icons shown by the slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Separator,
    /// Shown while expanded; clicking collapses
    Collapse,
    /// Shown while collapsed; clicking expands
    Expand,
}

/// Screen coordinates of a slot's origin, bottom-left based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Shell-side handle of a registered status item.
pub trait SlotHandle {
    fn set_width(&mut self, width: f64);
    fn set_icon(&mut self, glyph: Glyph);
    /// `None` until the shell has laid the item out.
    fn screen_position(&self) -> Option<ScreenPoint>;
    fn set_visible(&mut self, visible: bool);
    /// Removes the item from the status area. The handle is dead afterwards.
    fn remove(&mut self);
}

/// The shell's status-area registry.
pub trait StatusArea {
    type Handle: SlotHandle;

    /// Registers a slot. Slots registered earlier are laid out further left.
    fn register(&mut self, slot: SlotId, initial_width: f64) -> Self::Handle;
}

/// Entry offered by the context menu for the display toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotchMenuEntry {
    HideNotch,
    ShowNotch,
}

impl NotchMenuEntry {
    pub fn title(self) -> &'static str {
        match self {
            Self::HideNotch => "Hide Notch",
            Self::ShowNotch => "Show Notch",
        }
    }
}

/// What the context menu should contain when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuModel {
    pub notch: Option<NotchMenuEntry>,
}

/// Alerts and menus the core asks the user-facing layer to present.
pub trait Interaction {
    /// Tells the user to drag the divider left of the arrow.
    fn warn_invalid_ordering(&mut self);
    fn show_context_menu(&mut self, menu: MenuModel);
}

/// Message shown when the divider is on the wrong side of the arrow.
pub const INVALID_ORDERING_TITLE: &str = "Separator in Wrong Position";
pub const INVALID_ORDERING_MESSAGE: &str = "The separator is on the wrong side. \
Please drag the separator (|) to the left of the arrow icon in your menu bar \
for stowbar to work correctly.";
