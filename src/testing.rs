//! In-memory stand-ins for the shell, process and display APIs.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::activation::{ActivationMode, ProcessActivation, ProcessId};
use crate::display::{DisplayBackend, DisplayMode};
use crate::error::ConfigPhase;
use crate::shell::{Glyph, Interaction, MenuModel, ScreenPoint, SlotHandle, SlotId, StatusArea};

#[derive(Debug, Default, Clone)]
struct SlotState {
    width: f64,
    glyph: Option<Glyph>,
    position: Option<ScreenPoint>,
    visible: bool,
    removed: bool,
}

#[derive(Default)]
struct AreaState {
    slots: HashMap<SlotId, SlotState>,
    order: Vec<SlotId>,
}

/// Status area whose item positions the test controls.
#[derive(Clone, Default)]
pub struct FakeStatusArea {
    state: Rc<RefCell<AreaState>>,
}

impl FakeStatusArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_position(&self, slot: SlotId, x: f64) {
        self.with_slot(slot, |s| s.position = Some(ScreenPoint { x, y: 0.0 }));
    }

    pub fn clear_position(&self, slot: SlotId) {
        self.with_slot(slot, |s| s.position = None);
    }

    pub fn registered(&self) -> Vec<SlotId> {
        self.state.borrow().order.clone()
    }

    pub fn width(&self, slot: SlotId) -> f64 {
        self.read(slot, |s| s.width)
    }

    pub fn glyph(&self, slot: SlotId) -> Option<Glyph> {
        self.read(slot, |s| s.glyph)
    }

    pub fn removed(&self, slot: SlotId) -> bool {
        self.read(slot, |s| s.removed)
    }

    fn read<T>(&self, slot: SlotId, f: impl FnOnce(&SlotState) -> T) -> T {
        let state = self.state.borrow();
        f(state.slots.get(&slot).expect("slot not registered"))
    }

    fn with_slot(&self, slot: SlotId, f: impl FnOnce(&mut SlotState)) {
        let mut state = self.state.borrow_mut();
        f(state.slots.entry(slot).or_default());
    }
}

pub struct FakeSlot {
    id: SlotId,
    area: FakeStatusArea,
}

impl SlotHandle for FakeSlot {
    fn set_width(&mut self, width: f64) {
        self.area.with_slot(self.id, |s| s.width = width);
    }

    fn set_icon(&mut self, glyph: Glyph) {
        self.area.with_slot(self.id, |s| s.glyph = Some(glyph));
    }

    fn screen_position(&self) -> Option<ScreenPoint> {
        self.area.read(self.id, |s| s.position)
    }

    fn set_visible(&mut self, visible: bool) {
        self.area.with_slot(self.id, |s| s.visible = visible);
    }

    fn remove(&mut self) {
        self.area.with_slot(self.id, |s| {
            s.removed = true;
            s.visible = false;
        });
    }
}

impl StatusArea for FakeStatusArea {
    type Handle = FakeSlot;

    fn register(&mut self, slot: SlotId, initial_width: f64) -> FakeSlot {
        {
            let mut state = self.state.borrow_mut();
            state.order.push(slot);
            state.slots.insert(
                slot,
                SlotState {
                    width: initial_width,
                    ..SlotState::default()
                },
            );
        }
        FakeSlot {
            id: slot,
            area: self.clone(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeInteraction {
    warnings: Rc<RefCell<usize>>,
    menus: Rc<RefCell<Vec<MenuModel>>>,
}

impl FakeInteraction {
    pub fn warnings(&self) -> usize {
        *self.warnings.borrow()
    }

    pub fn menus(&self) -> Vec<MenuModel> {
        self.menus.borrow().clone()
    }
}

impl Interaction for FakeInteraction {
    fn warn_invalid_ordering(&mut self) {
        *self.warnings.borrow_mut() += 1;
    }

    fn show_context_menu(&mut self, menu: MenuModel) {
        self.menus.borrow_mut().push(menu);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessCall {
    SetMode(ActivationMode),
    Activate(ProcessId),
    ActivateSelf(Option<ProcessId>),
    Yield(ProcessId),
    Resign,
    InstallMenu,
}

struct ProcessState {
    mode: ActivationMode,
    frontmost: Option<ProcessId>,
    running: Vec<ProcessId>,
    calls: Vec<ProcessCall>,
}

/// Process API that records every call. Activating a process makes it
/// frontmost, as the real one does.
#[derive(Clone)]
pub struct FakeProcesses {
    me: ProcessId,
    shell: Option<ProcessId>,
    state: Rc<RefCell<ProcessState>>,
}

impl FakeProcesses {
    pub fn new(me: ProcessId, shell: Option<ProcessId>) -> Self {
        let mut running = vec![me];
        running.extend(shell);
        Self {
            me,
            shell,
            state: Rc::new(RefCell::new(ProcessState {
                mode: ActivationMode::BackgroundOnly,
                frontmost: None,
                running,
                calls: Vec::new(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<ProcessCall> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn mode(&self) -> ActivationMode {
        self.state.borrow().mode
    }

    /// Changes the mode without recording a call.
    pub fn force_mode(&self, mode: ActivationMode) {
        self.state.borrow_mut().mode = mode;
    }

    pub fn set_running(&self, running: Vec<ProcessId>) {
        self.state.borrow_mut().running = running;
    }

    fn record(&self, call: ProcessCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl ProcessActivation for FakeProcesses {
    fn activation_mode(&self) -> ActivationMode {
        self.state.borrow().mode
    }

    fn set_activation_mode(&mut self, mode: ActivationMode) {
        self.state.borrow_mut().mode = mode;
        self.record(ProcessCall::SetMode(mode));
    }

    fn current_process(&self) -> ProcessId {
        self.me
    }

    fn frontmost_process(&self) -> Option<ProcessId> {
        self.state.borrow().frontmost
    }

    fn running_processes(&self) -> Vec<ProcessId> {
        self.state.borrow().running.clone()
    }

    fn shell_process(&self) -> Option<ProcessId> {
        self.shell
    }

    fn activate(&mut self, process: ProcessId) {
        self.state.borrow_mut().frontmost = Some(process);
        self.record(ProcessCall::Activate(process));
    }

    fn activate_self(&mut self, from: Option<ProcessId>) {
        self.state.borrow_mut().frontmost = Some(self.me);
        self.record(ProcessCall::ActivateSelf(from));
    }

    fn yield_activation(&mut self, to: ProcessId) {
        self.state.borrow_mut().frontmost = Some(to);
        self.record(ProcessCall::Yield(to));
    }

    fn resign_activation(&mut self) {
        self.state.borrow_mut().frontmost = None;
        self.record(ProcessCall::Resign);
    }

    fn install_minimal_menu(&mut self) {
        self.record(ProcessCall::InstallMenu);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Begin,
    Apply(DisplayMode),
    Commit,
    Cancel,
}

struct DisplayState {
    modes: Vec<DisplayMode>,
    current: Option<DisplayMode>,
    builtin_active: bool,
    fail: Option<(ConfigPhase, i32)>,
    calls: Vec<DisplayCall>,
}

/// Display whose mode list is fixed and whose failures the test injects.
#[derive(Clone)]
pub struct FakeDisplay {
    state: Rc<RefCell<DisplayState>>,
}

pub struct FakeTransaction {
    staged: Option<DisplayMode>,
}

impl FakeDisplay {
    pub fn new(modes: Vec<DisplayMode>, current: DisplayMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(DisplayState {
                modes,
                current: Some(current),
                builtin_active: true,
                fail: None,
                calls: Vec::new(),
            })),
        }
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.state.borrow().calls.clone()
    }

    pub fn fail_at(&self, phase: ConfigPhase, code: i32) {
        self.state.borrow_mut().fail = Some((phase, code));
    }

    pub fn set_current(&self, mode: DisplayMode) {
        self.state.borrow_mut().current = Some(mode);
    }

    pub fn set_builtin_active(&self, active: bool) {
        self.state.borrow_mut().builtin_active = active;
    }

    fn check(&self, phase: ConfigPhase) -> Result<(), i32> {
        match self.state.borrow().fail {
            Some((p, code)) if p == phase => Err(code),
            _ => Ok(()),
        }
    }

    fn record(&self, call: DisplayCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl DisplayBackend for FakeDisplay {
    type Mode = DisplayMode;
    type Transaction = FakeTransaction;

    fn describe(&self, mode: &DisplayMode) -> DisplayMode {
        *mode
    }

    fn current_mode(&self) -> Option<DisplayMode> {
        self.state.borrow().current
    }

    fn list_modes(&self) -> Vec<DisplayMode> {
        self.state.borrow().modes.clone()
    }

    fn is_builtin_active(&self) -> bool {
        self.state.borrow().builtin_active
    }

    fn begin(&mut self) -> Result<FakeTransaction, i32> {
        self.check(ConfigPhase::Begin)?;
        self.record(DisplayCall::Begin);
        Ok(FakeTransaction { staged: None })
    }

    fn apply(&mut self, tx: &mut FakeTransaction, mode: &DisplayMode) -> Result<(), i32> {
        self.record(DisplayCall::Apply(*mode));
        self.check(ConfigPhase::Apply)?;
        tx.staged = Some(*mode);
        Ok(())
    }

    fn commit(&mut self, tx: &mut FakeTransaction) -> Result<(), i32> {
        self.record(DisplayCall::Commit);
        self.check(ConfigPhase::Commit)?;
        if let Some(mode) = tx.staged.take() {
            self.state.borrow_mut().current = Some(mode);
        }
        Ok(())
    }

    fn cancel(&mut self, _tx: FakeTransaction) {
        self.record(DisplayCall::Cancel);
    }
}
