//! NSApplication / NSRunningApplication process control.

use std::ptr::NonNull;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::{NSObjectProtocol, ProtocolObject};
use objc2::{msg_send, MainThreadMarker};
use objc2_app_kit::{
    NSApplication, NSApplicationActivationOptions, NSApplicationActivationPolicy, NSMenu,
    NSRunningApplication, NSWorkspace,
};
use objc2_foundation::{NSNotification, NSNotificationCenter, NSString};

use super::menu::{minimal_main_menu, MenuTarget};
use crate::activation::{ActivationMode, ProcessActivation, ProcessId};
use crate::event::{ControlEvent, ControlSender};

const DOCK_BUNDLE_ID: &str = "com.apple.dock";

pub struct AppKitProcesses {
    mtm: MainThreadMarker,
    app: Retained<NSApplication>,
    menu_target: Retained<MenuTarget>,
    main_menu: Option<Retained<NSMenu>>,
}

impl AppKitProcesses {
    pub fn new(mtm: MainThreadMarker, menu_target: Retained<MenuTarget>) -> Self {
        Self {
            mtm,
            app: NSApplication::sharedApplication(mtm),
            menu_target,
            main_menu: None,
        }
    }
}

fn running_app(pid: ProcessId) -> Option<Retained<NSRunningApplication>> {
    NSRunningApplication::runningApplicationWithProcessIdentifier(pid.0)
}

impl ProcessActivation for AppKitProcesses {
    fn activation_mode(&self) -> ActivationMode {
        if self.app.activationPolicy() == NSApplicationActivationPolicy::Regular {
            ActivationMode::Foreground
        } else {
            ActivationMode::BackgroundOnly
        }
    }

    fn set_activation_mode(&mut self, mode: ActivationMode) {
        let policy = match mode {
            ActivationMode::Foreground => NSApplicationActivationPolicy::Regular,
            ActivationMode::BackgroundOnly => NSApplicationActivationPolicy::Accessory,
        };
        if !self.app.setActivationPolicy(policy) {
            log::warn!("Activation policy change to {:?} refused", mode);
        }
    }

    fn current_process(&self) -> ProcessId {
        ProcessId(std::process::id() as i32)
    }

    fn frontmost_process(&self) -> Option<ProcessId> {
        NSWorkspace::sharedWorkspace()
            .frontmostApplication()
            .map(|app| ProcessId(app.processIdentifier()))
    }

    fn running_processes(&self) -> Vec<ProcessId> {
        let apps = NSWorkspace::sharedWorkspace().runningApplications();
        (0..apps.count())
            .map(|i| ProcessId(apps.objectAtIndex(i).processIdentifier()))
            .collect()
    }

    fn shell_process(&self) -> Option<ProcessId> {
        NSRunningApplication::runningApplicationsWithBundleIdentifier(&NSString::from_str(
            DOCK_BUNDLE_ID,
        ))
        .firstObject()
        .map(|app| ProcessId(app.processIdentifier()))
    }

    fn activate(&mut self, process: ProcessId) {
        match running_app(process) {
            Some(app) => {
                app.activateWithOptions(NSApplicationActivationOptions(0));
            }
            None => log::debug!("Process {} is gone, not activating", process.0),
        }
    }

    fn activate_self(&mut self, from: Option<ProcessId>) {
        // Cooperative activation needs the current owner of focus to hand it over.
        if let Some(front) = from.and_then(running_app) {
            let me = NSRunningApplication::currentApplication();
            let _: bool = unsafe {
                msg_send![
                    &me,
                    activateFromApplication: &*front,
                    options: NSApplicationActivationOptions(0)
                ]
            };
        } else {
            unsafe {
                let _: () = msg_send![&self.app, activate];
            }
        }
    }

    fn yield_activation(&mut self, to: ProcessId) {
        if let Some(target) = running_app(to) {
            unsafe {
                let _: () = msg_send![&self.app, yieldActivationToApplication: &*target];
            }
        }
    }

    fn resign_activation(&mut self) {
        unsafe {
            let _: () = msg_send![&self.app, deactivate];
        }
    }

    fn install_minimal_menu(&mut self) {
        let menu = self
            .main_menu
            .get_or_insert_with(|| minimal_main_menu(self.mtm, &self.menu_target));
        self.app.setMainMenu(Some(menu));
    }
}

/// Posts [`ControlEvent::ResignedActive`] whenever the app loses focus.
/// The observer is removed on drop.
pub struct ResignActiveObserver {
    token: Retained<ProtocolObject<dyn NSObjectProtocol>>,
}

impl ResignActiveObserver {
    pub fn install(sender: ControlSender) -> Self {
        let center = NSNotificationCenter::defaultCenter();
        let name = NSString::from_str("NSApplicationDidResignActiveNotification");

        let block = RcBlock::new(move |_notification: NonNull<NSNotification>| {
            sender.send(ControlEvent::ResignedActive);
        });

        let token = unsafe {
            center.addObserverForName_object_queue_usingBlock(Some(&name), None, None, &block)
        };
        log::debug!("Resign-active observer installed");
        Self { token }
    }
}

impl Drop for ResignActiveObserver {
    fn drop(&mut self) {
        unsafe {
            NSNotificationCenter::defaultCenter().removeObserver(&self.token);
        }
    }
}
