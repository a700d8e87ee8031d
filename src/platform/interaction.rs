//! Alert and context menu presentation.

use objc2::rc::Retained;
use objc2::{sel, MainThreadMarker};
use objc2_app_kit::{NSAlert, NSAlertStyle, NSApplication, NSMenu, NSMenuItem};
use objc2_foundation::NSString;

use super::menu::MenuTarget;
use super::status_item::ArrowItemCell;
use crate::shell::{Interaction, MenuModel, INVALID_ORDERING_MESSAGE, INVALID_ORDERING_TITLE};

pub struct AppKitInteraction {
    mtm: MainThreadMarker,
    arrow_item: ArrowItemCell,
    target: Retained<MenuTarget>,
}

impl AppKitInteraction {
    pub fn new(mtm: MainThreadMarker, arrow_item: ArrowItemCell, target: Retained<MenuTarget>) -> Self {
        Self {
            mtm,
            arrow_item,
            target,
        }
    }

    fn build_menu(&self, model: MenuModel) -> Retained<NSMenu> {
        let menu = NSMenu::new(self.mtm);
        // The title says which way the toggle goes right now.
        if let Some(entry) = model.notch {
            menu.addItem(&self.target.item(self.mtm, entry.title(), sel!(toggleNotch:), ""));
            menu.addItem(&NSMenuItem::separatorItem(self.mtm));
        }
        menu.addItem(&self.target.quit_item(self.mtm));
        menu
    }
}

impl Interaction for AppKitInteraction {
    // Runs modally; the control loop resumes when the user dismisses it.
    fn warn_invalid_ordering(&mut self) {
        let alert = NSAlert::new(self.mtm);
        alert.setMessageText(&NSString::from_str(INVALID_ORDERING_TITLE));
        alert.setInformativeText(&NSString::from_str(INVALID_ORDERING_MESSAGE));
        alert.setAlertStyle(NSAlertStyle::Warning);
        alert.addButtonWithTitle(&NSString::from_str("OK"));

        let app = NSApplication::sharedApplication(self.mtm);
        unsafe {
            let _: () = objc2::msg_send![&app, activate];
        }
        alert.runModal();
    }

    fn show_context_menu(&mut self, model: MenuModel) {
        let Some(item) = self.arrow_item.borrow().clone() else {
            log::warn!("Context menu requested without an arrow item");
            return;
        };
        let menu = self.build_menu(model);

        // Attaching the menu makes the click below open it; detach afterwards
        // so the next primary click toggles again.
        item.setMenu(Some(&menu));
        if let Some(button) = item.button(self.mtm) {
            unsafe { button.performClick(None) };
        }
        item.setMenu(None);
    }
}
