//! Action target shared by every menu stowbar builds.

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, NSObject, NSObjectProtocol, Sel};
use objc2::{define_class, msg_send, sel, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{NSMenu, NSMenuItem};
use objc2_foundation::NSString;

use crate::event::{ControlEvent, ControlSender};

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "StowbarMenuTarget"]
    #[ivars = ControlSender]
    pub struct MenuTarget;

    unsafe impl NSObjectProtocol for MenuTarget {}

    impl MenuTarget {
        #[unsafe(method(toggleNotch:))]
        fn toggle_notch(&self, _sender: Option<&AnyObject>) {
            self.ivars().send(ControlEvent::ToggleNotch);
        }

        #[unsafe(method(quit:))]
        fn quit(&self, _sender: Option<&AnyObject>) {
            self.ivars().send(ControlEvent::Quit);
        }
    }
);

impl MenuTarget {
    pub fn new(mtm: MainThreadMarker, sender: ControlSender) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(sender);
        unsafe { msg_send![super(this), init] }
    }

    /// Builds an item whose action is delivered to this target.
    pub fn item(
        &self,
        mtm: MainThreadMarker,
        title: &str,
        action: Sel,
        key: &str,
    ) -> Retained<NSMenuItem> {
        let item = unsafe {
            NSMenuItem::initWithTitle_action_keyEquivalent(
                NSMenuItem::alloc(mtm),
                &NSString::from_str(title),
                Some(action),
                &NSString::from_str(key),
            )
        };
        unsafe {
            let _: () = msg_send![&item, setTarget: self];
        }
        item
    }

    pub fn quit_item(&self, mtm: MainThreadMarker) -> Retained<NSMenuItem> {
        self.item(mtm, "Quit stowbar", sel!(quit:), "q")
    }
}

/// Menu with a single Quit entry, used as the main menu while foreground.
pub fn minimal_main_menu(mtm: MainThreadMarker, target: &MenuTarget) -> Retained<NSMenu> {
    let main_menu = NSMenu::new(mtm);
    let app_item = NSMenuItem::new(mtm);
    let app_menu = NSMenu::new(mtm);
    app_menu.addItem(&target.quit_item(mtm));
    app_item.setSubmenu(Some(&app_menu));
    main_menu.addItem(&app_item);
    main_menu
}

