//! Key-down monitors that post the toggle hotkey to the control loop.
//!
//! The global monitor sees keys typed into other apps and needs the
//! accessibility permission; without it the monitor installs fine but never
//! fires, so trust is checked up front. The local one covers the moments
//! stowbar itself is frontmost.

use std::ptr::{self, NonNull};

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::AnyObject;
use objc2_app_kit::{NSEvent, NSEventMask, NSEventModifierFlags};

use crate::event::{ControlEvent, ControlSender};
use crate::hotkey::{Hotkey, HotkeyReach, Modifiers};

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
}

fn accessibility_trusted() -> bool {
    unsafe { AXIsProcessTrusted() }
}

/// Keeps the monitors installed until dropped.
pub struct HotkeyMonitor {
    monitors: Vec<Retained<AnyObject>>,
}

fn event_matches(hotkey: &Hotkey, event: &NSEvent) -> bool {
    let flags = event.modifierFlags();
    let modifiers = Modifiers {
        command: flags.contains(NSEventModifierFlags::Command),
        option: flags.contains(NSEventModifierFlags::Option),
        control: flags.contains(NSEventModifierFlags::Control),
        shift: flags.contains(NSEventModifierFlags::Shift),
    };
    let Some(chars) = event.charactersIgnoringModifiers() else {
        return false;
    };
    match chars.to_string().chars().next() {
        Some(key) => hotkey.matches(key, modifiers),
        None => false,
    }
}

impl HotkeyMonitor {
    pub fn start(hotkey: Hotkey, sender: ControlSender) -> Option<Self> {
        let mut monitors = Vec::new();

        let reach = HotkeyReach::for_accessibility(accessibility_trusted());
        if reach.is_global() {
            let global_sender = sender.clone();
            let global = RcBlock::new(move |event: NonNull<NSEvent>| {
                let event = unsafe { event.as_ref() };
                if event_matches(&hotkey, event) {
                    global_sender.send(ControlEvent::Hotkey);
                }
            });
            match NSEvent::addGlobalMonitorForEventsMatchingMask_handler(
                NSEventMask::KeyDown,
                &global,
            ) {
                Some(monitor) => monitors.push(monitor),
                None => log::warn!("Failed to install global hotkey monitor"),
            }
        } else {
            log::warn!(
                "Accessibility not granted (AXIsProcessTrusted=false); hotkey {} only works \
                 while stowbar is frontmost. Allow it under System Settings > Privacy & \
                 Security > Accessibility and relaunch.",
                hotkey
            );
        }

        let local = RcBlock::new(move |event: NonNull<NSEvent>| -> *mut NSEvent {
            if event_matches(&hotkey, unsafe { event.as_ref() }) {
                sender.send(ControlEvent::Hotkey);
                return ptr::null_mut();
            }
            event.as_ptr()
        });
        let local = unsafe {
            NSEvent::addLocalMonitorForEventsMatchingMask_handler(NSEventMask::KeyDown, &local)
        };
        monitors.extend(local);

        if monitors.is_empty() {
            log::error!("Failed to install hotkey monitors");
            return None;
        }
        log::info!("Hotkey {} registered ({:?})", hotkey, reach);
        Some(Self { monitors })
    }
}

impl Drop for HotkeyMonitor {
    fn drop(&mut self) {
        for monitor in self.monitors.drain(..) {
            unsafe { NSEvent::removeMonitor(&monitor) };
        }
    }
}
