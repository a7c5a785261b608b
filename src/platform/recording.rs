//! In-memory window manager for tests
//!
//! Keeps a fake desktop and records every call so tests can assert on the
//! exact sequence of mutations.

use std::cell::{Cell, RefCell};

use super::{Monitor, WindowId, WindowInfo, WindowManager, WmError};
use crate::domain::core::{Point, Rect};

/// A recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Move(WindowId, i32, i32),
    Resize(WindowId, i32, i32),
    SetBounds(WindowId, Rect),
}

#[derive(Debug)]
pub struct RecordingWindowManager {
    monitors: Vec<Monitor>,
    windows: RefCell<Vec<WindowInfo>>,
    active: Cell<Option<WindowId>>,
    pointer: Cell<Point>,
    calls: RefCell<Vec<Call>>,
    fail_mutations: Cell<bool>,
}

impl RecordingWindowManager {
    pub fn new(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors,
            windows: RefCell::new(Vec::new()),
            active: Cell::new(None),
            pointer: Cell::new(Point::new(0, 0)),
            calls: RefCell::new(Vec::new()),
            fail_mutations: Cell::new(false),
        }
    }

    pub fn add_window(&self, id: u64, class: &str, bounds: Rect) -> WindowId {
        let id = WindowId(id);
        self.windows.borrow_mut().push(WindowInfo {
            id,
            title: format!("{class} window"),
            class: class.to_string(),
            bounds,
        });
        id
    }

    pub fn set_active(&self, id: Option<WindowId>) {
        self.active.set(id);
    }

    pub fn set_pointer(&self, at: Point) {
        self.pointer.set(at);
    }

    pub fn set_fail_mutations(&self, fail: bool) {
        self.fail_mutations.set(fail);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn mutate(&self, id: WindowId, call: Call) -> Result<(), WmError> {
        if self.fail_mutations.get() {
            return Err(WmError::PositionFailed(id));
        }

        let mut windows = self.windows.borrow_mut();
        let window = windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(WmError::InvalidWindow(id))?;
        match call {
            Call::Move(_, x, y) => {
                window.bounds.x = x;
                window.bounds.y = y;
            }
            Call::Resize(_, w, h) => {
                window.bounds.w = w;
                window.bounds.h = h;
            }
            Call::SetBounds(_, bounds) => window.bounds = bounds,
        }
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl WindowManager for RecordingWindowManager {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn active_window(&self) -> Result<WindowId, WmError> {
        self.active.get().ok_or(WmError::NoActiveWindow)
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, WmError> {
        Ok(self.windows.borrow().clone())
    }

    fn window_bounds(&self, id: WindowId) -> Result<Rect, WmError> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.bounds)
            .ok_or(WmError::InvalidWindow(id))
    }

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), WmError> {
        self.mutate(id, Call::Move(id, x, y))
    }

    fn resize_window(&self, id: WindowId, w: i32, h: i32) -> Result<(), WmError> {
        self.mutate(id, Call::Resize(id, w, h))
    }

    fn set_window_bounds(&self, id: WindowId, bounds: Rect) -> Result<(), WmError> {
        self.mutate(id, Call::SetBounds(id, bounds))
    }

    fn monitors(&self) -> Result<Vec<Monitor>, WmError> {
        Ok(self.monitors.clone())
    }

    fn pointer_position(&self) -> Result<Point, WmError> {
        Ok(self.pointer.get())
    }
}
