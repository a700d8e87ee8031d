//! NSStatusItem-backed indicator slots

use std::cell::RefCell;
use std::rc::Rc;

use objc2::rc::Retained;
use objc2::runtime::{AnyObject, NSObject, NSObjectProtocol};
use objc2::{define_class, msg_send, sel, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{
    NSApplication, NSEvent, NSEventMask, NSEventModifierFlags, NSEventType, NSImage,
    NSStatusBar, NSStatusItem,
};
use objc2_foundation::NSString;

use crate::event::{ControlEvent, ControlSender};
use crate::presence::Click;
use crate::shell::{Glyph, ScreenPoint, SlotHandle, SlotId, StatusArea};

define_class!(
    #[unsafe(super(NSObject))]
    #[thread_kind = MainThreadOnly]
    #[name = "StowbarArrowTarget"]
    #[ivars = ControlSender]
    struct ArrowTarget;

    unsafe impl NSObjectProtocol for ArrowTarget {}

    impl ArrowTarget {
        #[unsafe(method(arrowClicked:))]
        fn arrow_clicked(&self, _sender: Option<&AnyObject>) {
            let app = NSApplication::sharedApplication(self.mtm());
            let click = app
                .currentEvent()
                .map(|event| click_from_event(&event))
                .unwrap_or(Click::Primary { modifier: false });
            self.ivars().send(ControlEvent::ArrowClicked(click));
        }
    }
);

impl ArrowTarget {
    fn new(mtm: MainThreadMarker, sender: ControlSender) -> Retained<Self> {
        let this = Self::alloc(mtm).set_ivars(sender);
        unsafe { msg_send![super(this), init] }
    }
}

fn click_from_event(event: &NSEvent) -> Click {
    let event_type = event.r#type();
    if event_type == NSEventType::RightMouseUp || event_type == NSEventType::RightMouseDown {
        return Click::Secondary;
    }
    Click::Primary {
        modifier: event.modifierFlags().contains(NSEventModifierFlags::Control),
    }
}

fn symbol_name(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Separator => "poweron",
        Glyph::Collapse => "chevron.right",
        Glyph::Expand => "chevron.left",
    }
}

/// The arrow item, shared with the menu presenter which anchors to it.
pub type ArrowItemCell = Rc<RefCell<Option<Retained<NSStatusItem>>>>;

pub struct AppKitStatusArea {
    mtm: MainThreadMarker,
    status_bar: Retained<NSStatusBar>,
    arrow_target: Retained<ArrowTarget>,
    arrow_item: ArrowItemCell,
}

impl AppKitStatusArea {
    pub fn new(mtm: MainThreadMarker, sender: ControlSender) -> Self {
        Self {
            mtm,
            status_bar: NSStatusBar::systemStatusBar(),
            arrow_target: ArrowTarget::new(mtm, sender),
            arrow_item: Rc::new(RefCell::new(None)),
        }
    }

    pub fn arrow_item(&self) -> ArrowItemCell {
        self.arrow_item.clone()
    }
}

impl StatusArea for AppKitStatusArea {
    type Handle = AppKitSlot;

    fn register(&mut self, slot: SlotId, initial_width: f64) -> AppKitSlot {
        let item = self.status_bar.statusItemWithLength(initial_width);
        item.setAutosaveName(Some(&NSString::from_str(slot.autosave_name())));

        if slot == SlotId::Arrow {
            if let Some(button) = item.button(self.mtm) {
                unsafe {
                    let _: () = msg_send![&button, setTarget: &*self.arrow_target];
                    let _: () = msg_send![&button, setAction: sel!(arrowClicked:)];
                }
                button.sendActionOn(NSEventMask::LeftMouseUp | NSEventMask::RightMouseUp);
            }
            *self.arrow_item.borrow_mut() = Some(item.clone());
        }
        log::debug!("Registered status item {:?}", slot);

        AppKitSlot {
            mtm: self.mtm,
            id: slot,
            status_bar: self.status_bar.clone(),
            item: Some(item),
            arrow_item: self.arrow_item.clone(),
        }
    }
}

pub struct AppKitSlot {
    mtm: MainThreadMarker,
    id: SlotId,
    status_bar: Retained<NSStatusBar>,
    item: Option<Retained<NSStatusItem>>,
    arrow_item: ArrowItemCell,
}

impl SlotHandle for AppKitSlot {
    fn set_width(&mut self, width: f64) {
        if let Some(item) = &self.item {
            item.setLength(width);
        }
    }

    fn set_icon(&mut self, glyph: Glyph) {
        let Some(button) = self.item.as_ref().and_then(|item| item.button(self.mtm)) else {
            return;
        };
        let image = NSImage::imageWithSystemSymbolName_accessibilityDescription(
            &NSString::from_str(symbol_name(glyph)),
            None,
        );
        match image {
            Some(image) => {
                image.setTemplate(true);
                button.setImage(Some(&image));
            }
            None => log::warn!("Missing symbol for {:?}", glyph),
        }
    }

    fn screen_position(&self) -> Option<ScreenPoint> {
        let button = self.item.as_ref()?.button(self.mtm)?;
        let frame = button.window()?.frame();
        Some(ScreenPoint {
            x: frame.origin.x,
            y: frame.origin.y,
        })
    }

    fn set_visible(&mut self, visible: bool) {
        if let Some(item) = &self.item {
            item.setVisible(visible);
        }
    }

    fn remove(&mut self) {
        if let Some(item) = self.item.take() {
            self.status_bar.removeStatusItem(&item);
            if self.id == SlotId::Arrow {
                *self.arrow_item.borrow_mut() = None;
            }
            log::debug!("Removed status item {:?}", self.id);
        }
    }
}
