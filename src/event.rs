//! Events delivered to the control thread.
//!
//! Anything that originates outside the control loop (signal handler, key
//! monitor, notification observers, button and menu actions) is turned into
//! a [`ControlEvent`] and pushed onto the bus. Only the control loop drains it
//! and touches state.

use async_channel::{Receiver, Sender, TryRecvError};

use crate::presence::Click;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// The arrow status item was clicked.
    ArrowClicked(Click),
    /// The global hotkey was pressed.
    Hotkey,
    /// The context menu's notch entry was chosen.
    ToggleNotch,
    /// The app stopped being the active application.
    ResignedActive,
    Quit,
}

/// Channel pair owned by the composition root.
pub struct ControlBus {
    tx: Sender<ControlEvent>,
    rx: Receiver<ControlEvent>,
}

impl ControlBus {
    pub fn new() -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self { tx, rx }
    }

    /// A handle producers keep to post events.
    pub fn sender(&self) -> ControlSender {
        ControlSender(self.tx.clone())
    }

    /// Returns the next queued event without blocking.
    pub fn try_next(&self) -> Option<ControlEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            // The bus holds its own sender, so it never closes while alive.
            Err(TryRecvError::Closed) => None,
        }
    }
}

impl Default for ControlBus {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct ControlSender(Sender<ControlEvent>);

impl ControlSender {
    pub fn send(&self, event: ControlEvent) {
        if let Err(e) = self.0.try_send(event) {
            log::debug!("Dropping {:?}: control loop is gone", e.into_inner());
        }
    }
}
