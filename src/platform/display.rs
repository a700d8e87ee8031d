//! CoreGraphics display configuration for the main display.

use std::ffi::c_void;
use std::ptr;

use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_graphics::display::{CGDirectDisplayID, CGDisplay, CGDisplayMode};
use foreign_types::ForeignType;

use crate::display::{DisplayBackend, DisplayMode};

type CGDisplayConfigRef = *mut c_void;
type CGError = i32;

const K_CG_ERROR_SUCCESS: CGError = 0;

/// `kCGConfigureForSession`: the change lasts until logout.
const K_CG_CONFIGURE_FOR_SESSION: u32 = 1;

#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGBeginDisplayConfiguration(config: *mut CGDisplayConfigRef) -> CGError;
    fn CGConfigureDisplayWithDisplayMode(
        config: CGDisplayConfigRef,
        display: CGDirectDisplayID,
        mode: *mut c_void,
        options: *const c_void,
    ) -> CGError;
    fn CGCompleteDisplayConfiguration(config: CGDisplayConfigRef, option: u32) -> CGError;
    fn CGCancelDisplayConfiguration(config: CGDisplayConfigRef) -> CGError;
    fn CGDisplayModeIsUsableForDesktopGUI(mode: *mut c_void) -> bool;
}

pub struct CgDisplayBackend {
    display: CGDisplay,
}

impl CgDisplayBackend {
    pub fn main() -> Self {
        Self {
            display: CGDisplay::main(),
        }
    }
}

/// An open `CGDisplayConfigRef`. Cancelled on drop unless completed.
pub struct CgTransaction {
    config: CGDisplayConfigRef,
}

impl CgTransaction {
    fn close(&mut self) -> Option<CGDisplayConfigRef> {
        let config = std::mem::replace(&mut self.config, ptr::null_mut());
        (!config.is_null()).then_some(config)
    }
}

impl Drop for CgTransaction {
    fn drop(&mut self) {
        if let Some(config) = self.close() {
            unsafe { CGCancelDisplayConfiguration(config) };
        }
    }
}

fn check(err: CGError) -> Result<(), i32> {
    if err == K_CG_ERROR_SUCCESS {
        Ok(())
    } else {
        Err(err)
    }
}

impl DisplayBackend for CgDisplayBackend {
    type Mode = CGDisplayMode;
    type Transaction = CgTransaction;

    fn describe(&self, mode: &CGDisplayMode) -> DisplayMode {
        DisplayMode {
            width: mode.width() as u32,
            height: mode.height() as u32,
            refresh_rate: mode.refresh_rate(),
            usable_for_desktop: unsafe {
                CGDisplayModeIsUsableForDesktopGUI(mode.as_ptr() as *mut c_void)
            },
        }
    }

    fn current_mode(&self) -> Option<CGDisplayMode> {
        self.display.display_mode()
    }

    fn list_modes(&self) -> Vec<CGDisplayMode> {
        // Without this option the scaled "looks like" modes are missing.
        let key = CFString::from_static_string("kCGDisplayShowDuplicateLowResolutionModes");
        let options =
            CFDictionary::from_CFType_pairs(&[(key.as_CFType(), CFBoolean::true_value().as_CFType())]);
        CGDisplayMode::all_display_modes(self.display.id, options.as_concrete_TypeRef())
            .unwrap_or_default()
    }

    fn is_builtin_active(&self) -> bool {
        match CGDisplay::active_displays() {
            Ok(ids) => ids.into_iter().any(|id| CGDisplay::new(id).is_builtin()),
            Err(err) => {
                log::warn!("Failed to list active displays: {}", err);
                false
            }
        }
    }

    fn begin(&mut self) -> Result<CgTransaction, i32> {
        let mut config: CGDisplayConfigRef = ptr::null_mut();
        check(unsafe { CGBeginDisplayConfiguration(&mut config) })?;
        Ok(CgTransaction { config })
    }

    fn apply(&mut self, tx: &mut CgTransaction, mode: &CGDisplayMode) -> Result<(), i32> {
        check(unsafe {
            CGConfigureDisplayWithDisplayMode(
                tx.config,
                self.display.id,
                mode.as_ptr() as *mut c_void,
                ptr::null(),
            )
        })
    }

    fn commit(&mut self, tx: &mut CgTransaction) -> Result<(), i32> {
        // Completion releases the configuration whether or not it succeeds.
        let Some(config) = tx.close() else {
            return Err(-1);
        };
        check(unsafe { CGCompleteDisplayConfiguration(config, K_CG_CONFIGURE_FOR_SESSION) })
    }

    fn cancel(&mut self, tx: CgTransaction) {
        drop(tx);
    }
}
