//! AppKit and CoreGraphics backends, and the main-thread control loop.

mod activation;
mod display;
mod hotkey;
mod interaction;
mod menu;
mod status_item;

use std::time::Instant;

use objc2::MainThreadMarker;
use objc2_app_kit::{NSApplication, NSApplicationActivationPolicy, NSEventMask};
use objc2_foundation::NSDate;

use crate::app::{App, Flow};
use crate::config::SharedConfig;
use crate::device;
use crate::display::DisplayModeSelector;
use crate::event::ControlBus;
use crate::presence::StatusBarPresence;

use activation::{AppKitProcesses, ResignActiveObserver};
use display::CgDisplayBackend;
use hotkey::HotkeyMonitor;
use interaction::AppKitInteraction;
use menu::MenuTarget;
use status_item::AppKitStatusArea;

/// Longest the loop waits for an AppKit event before checking the bus and
/// deadlines again.
const PUMP_INTERVAL_SECS: f64 = 0.05;

/// Builds every component and runs until a Quit event arrives.
pub fn run(config: SharedConfig, bus: ControlBus) {
    let Some(mtm) = MainThreadMarker::new() else {
        log::error!("stowbar must run on the main thread");
        return;
    };

    let app = NSApplication::sharedApplication(mtm);
    // Accessory policy: no dock icon, no app menu
    app.setActivationPolicy(NSApplicationActivationPolicy::Accessory);
    unsafe { app.finishLaunching() };

    let sender = bus.sender();
    let menu_target = MenuTarget::new(mtm, sender.clone());
    let mut area = AppKitStatusArea::new(mtm, sender.clone());
    let interaction = AppKitInteraction::new(mtm, area.arrow_item(), menu_target.clone());
    let processes = AppKitProcesses::new(mtm, menu_target);

    let presence = StatusBarPresence::new(&mut area, processes, interaction, config.clone());
    let display = DisplayModeSelector::new(CgDisplayBackend::main());
    let hotkey = config.read().ok().and_then(|c| c.hotkey.hotkey());
    let mut stowbar = App::new(presence, display, config, device::has_notch());

    let _resign_observer = ResignActiveObserver::install(sender.clone());
    // Registered once; a changed combo takes effect on the next launch.
    let _hotkey_monitor = hotkey.and_then(|hotkey| HotkeyMonitor::start(hotkey, sender));

    stowbar.launch(Instant::now());

    loop {
        let date = NSDate::dateWithTimeIntervalSinceNow(PUMP_INTERVAL_SECS);
        while let Some(event) = unsafe {
            app.nextEventMatchingMask_untilDate_inMode_dequeue(
                NSEventMask::Any,
                Some(&date),
                objc2_foundation::NSDefaultRunLoopMode,
                true,
            )
        } {
            log::trace!("Event type: {:?}", event.r#type());
            app.sendEvent(&event);
            app.updateWindows();
        }

        while let Some(event) = bus.try_next() {
            if stowbar.handle(event) == Flow::Exit {
                stowbar.shutdown();
                return;
            }
        }
        stowbar.tick(Instant::now());
    }
}
