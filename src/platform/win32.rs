//! Win32 backend
//!
//! Talks to the desktop through the Win32 API. The process is made
//! per-monitor DPI aware on construction so every rectangle here is in real
//! pixels, including on secondary monitors with negative coordinates.

use tracing::{debug, warn};
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::HiDpi::*;
use windows::Win32::UI::WindowsAndMessaging::*;

use super::{Monitor, WindowId, WindowInfo, WindowManager, WmError};
use crate::domain::core::{Point, Rect};

fn to_rect(rect: &RECT) -> Rect {
    Rect::new(
        rect.left,
        rect.top,
        rect.right - rect.left,
        rect.bottom - rect.top,
    )
}

fn to_hwnd(id: WindowId) -> HWND {
    HWND(id.0 as isize)
}

fn utf16_text(buffer: &[u16], len: i32) -> String {
    if len <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buffer[..len as usize])
}

/// Backend for Windows desktops
#[derive(Debug)]
pub struct Win32WindowManager;

impl Win32WindowManager {
    pub fn new() -> Self {
        unsafe {
            // Fails harmlessly if the manifest already set an awareness mode
            if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_err() {
                debug!("DPI awareness already set for this process");
            }
        }
        Self
    }

    fn window_info(&self, hwnd: HWND) -> Result<WindowInfo, WmError> {
        let id = WindowId(hwnd.0 as u64);
        unsafe {
            if !IsWindow(hwnd).as_bool() {
                return Err(WmError::InvalidWindow(id));
            }

            let mut title = [0u16; 512];
            let title_len = GetWindowTextW(hwnd, &mut title);
            let mut class = [0u16; 256];
            let class_len = GetClassNameW(hwnd, &mut class);

            Ok(WindowInfo {
                id,
                title: utf16_text(&title, title_len),
                class: utf16_text(&class, class_len),
                bounds: self.window_bounds(id)?,
            })
        }
    }

    fn set_window_pos(
        &self,
        id: WindowId,
        bounds: Rect,
        flags: SET_WINDOW_POS_FLAGS,
    ) -> Result<(), WmError> {
        let hwnd = to_hwnd(id);
        unsafe {
            if !IsWindow(hwnd).as_bool() {
                return Err(WmError::InvalidWindow(id));
            }

            // SWP_NOZORDER makes the insert-after handle irrelevant
            SetWindowPos(
                hwnd,
                HWND(0),
                bounds.x,
                bounds.y,
                bounds.w,
                bounds.h,
                SWP_NOACTIVATE | SWP_NOZORDER | flags,
            )
            .map_err(|_| WmError::PositionFailed(id))
        }
    }
}

impl Default for Win32WindowManager {
    fn default() -> Self {
        Self::new()
    }
}

unsafe extern "system" fn enum_monitor_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    unsafe {
        let monitors = &mut *(lparam.0 as *mut Vec<Monitor>);

        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };

        // Keep going past a monitor we can't query
        if GetMonitorInfoW(hmonitor, &mut info) == FALSE {
            warn!(?hmonitor, "failed to query monitor info");
            return TRUE;
        }

        monitors.push(Monitor::with_available(
            to_rect(&info.rcMonitor),
            to_rect(&info.rcWork),
        ));
        TRUE
    }
}

unsafe extern "system" fn enum_window_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
    unsafe {
        let handles = &mut *(lparam.0 as *mut Vec<HWND>);
        if IsWindowVisible(hwnd).as_bool() && GetWindowTextLengthW(hwnd) > 0 {
            handles.push(hwnd);
        }
        TRUE
    }
}

impl WindowManager for Win32WindowManager {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn active_window(&self) -> Result<WindowId, WmError> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.0 == 0 {
            return Err(WmError::NoActiveWindow);
        }
        Ok(WindowId(hwnd.0 as u64))
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, WmError> {
        let mut handles: Vec<HWND> = Vec::new();
        unsafe {
            EnumWindows(
                Some(enum_window_proc),
                LPARAM(&mut handles as *mut _ as isize),
            )
            .map_err(|e| WmError::CommandFailed {
                command: "EnumWindows".into(),
                status: format!("{:?}", e.code()),
                stderr: e.message().to_string(),
            })?;
        }

        let mut windows = Vec::with_capacity(handles.len());
        for hwnd in handles {
            match self.window_info(hwnd) {
                Ok(info) => windows.push(info),
                // Windows can close between enumeration and query
                Err(err) => debug!(?hwnd, %err, "skipping window"),
            }
        }
        Ok(windows)
    }

    fn window_bounds(&self, id: WindowId) -> Result<Rect, WmError> {
        let mut rect = RECT::default();
        unsafe {
            GetWindowRect(to_hwnd(id), &mut rect).map_err(|_| WmError::InvalidWindow(id))?;
        }
        Ok(to_rect(&rect))
    }

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), WmError> {
        self.set_window_pos(id, Rect::new(x, y, 0, 0), SWP_NOSIZE)
    }

    fn resize_window(&self, id: WindowId, w: i32, h: i32) -> Result<(), WmError> {
        self.set_window_pos(id, Rect::new(0, 0, w, h), SWP_NOMOVE)
    }

    fn set_window_bounds(&self, id: WindowId, bounds: Rect) -> Result<(), WmError> {
        self.set_window_pos(id, bounds, SET_WINDOW_POS_FLAGS(0))
    }

    fn monitors(&self) -> Result<Vec<Monitor>, WmError> {
        let mut monitors: Vec<Monitor> = Vec::new();
        unsafe {
            if EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_proc),
                LPARAM(&mut monitors as *mut _ as isize),
            ) == FALSE
            {
                return Err(WmError::NoMonitors);
            }
        }

        if monitors.is_empty() {
            return Err(WmError::NoMonitors);
        }
        Ok(monitors)
    }

    fn pointer_position(&self) -> Result<Point, WmError> {
        let mut point = POINT::default();
        unsafe {
            GetCursorPos(&mut point).map_err(|e| WmError::CommandFailed {
                command: "GetCursorPos".into(),
                status: format!("{:?}", e.code()),
                stderr: e.message().to_string(),
            })?;
        }
        Ok(Point::new(point.x, point.y))
    }
}
