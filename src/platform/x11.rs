//! X11 backend
//!
//! Drives `xdotool`, `wmctrl`, `xprop` and `xrandr`. Every tool's output is
//! parsed by a pure function in this module so the parsing can be tested
//! without a display.

use std::process::Command;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::{Monitor, WindowId, WindowInfo, WindowManager, WmError};
use crate::domain::core::{Point, Rect};

static WMCTRL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0x[0-9a-fA-F]+)\s+(-?\d+)\s+(\S+)\s*(.*)$").expect("valid regex")
});
static POSITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Position:\s*(-?\d+),(-?\d+)").expect("valid regex"));
static GEOMETRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Geometry:\s*(\d+)x(\d+)").expect("valid regex"));
static XRANDR_MODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)x(\d+)\+(-?\d+)\+(-?\d+)").expect("valid regex"));

/// Backend for X11 desktops with an EWMH-compliant window manager
#[derive(Debug, Default)]
pub struct X11WindowManager;

impl X11WindowManager {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, program: &str, args: &[String]) -> Result<String, WmError> {
        trace!(program, ?args, "running");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| WmError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(WmError::CommandFailed {
                command: format!("{program} {}", args.join(" ")),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn window_class(&self, id: WindowId) -> Result<String, WmError> {
        let out = self.run("xprop", &["-id".into(), id.0.to_string(), "WM_CLASS".into()])?;
        Ok(parse_wm_class(&out))
    }

    fn workarea(&self) -> Option<Rect> {
        let out = self
            .run("xprop", &["-root".into(), "_NET_WORKAREA".into()])
            .ok()?;
        parse_workarea(&out)
    }
}

impl WindowManager for X11WindowManager {
    fn name(&self) -> &'static str {
        "x11"
    }

    fn active_window(&self) -> Result<WindowId, WmError> {
        let out = self
            .run("xdotool", &["getactivewindow".into()])
            .map_err(|err| match err {
                WmError::CommandFailed { .. } => WmError::NoActiveWindow,
                other => other,
            })?;
        parse_window_id(&out)
    }

    fn list_windows(&self) -> Result<Vec<WindowInfo>, WmError> {
        let out = self.run("wmctrl", &["-l".into()])?;
        let mut windows = Vec::new();
        for (id, title) in parse_wmctrl_list(&out) {
            // A window may vanish between the listing and the queries
            let bounds = match self.window_bounds(id) {
                Ok(bounds) => bounds,
                Err(err) => {
                    debug!(%id, %err, "skipping window without geometry");
                    continue;
                }
            };
            // Classless windows are left out of captures
            let class = match self.window_class(id) {
                Ok(class) => class,
                Err(err) => {
                    debug!(%id, %err, "no WM_CLASS, listing window without a class");
                    String::new()
                }
            };
            windows.push(WindowInfo {
                id,
                title,
                class,
                bounds,
            });
        }
        Ok(windows)
    }

    fn window_bounds(&self, id: WindowId) -> Result<Rect, WmError> {
        let out = self.run("xdotool", &["getwindowgeometry".into(), id.0.to_string()])?;
        parse_window_geometry(&out)
    }

    fn move_window(&self, id: WindowId, x: i32, y: i32) -> Result<(), WmError> {
        self.run(
            "xdotool",
            &[
                "windowmove".into(),
                id.0.to_string(),
                x.to_string(),
                y.to_string(),
            ],
        )
        .map(|_| ())
    }

    fn resize_window(&self, id: WindowId, w: i32, h: i32) -> Result<(), WmError> {
        self.run(
            "xdotool",
            &[
                "windowsize".into(),
                id.0.to_string(),
                w.to_string(),
                h.to_string(),
            ],
        )
        .map(|_| ())
    }

    fn set_window_bounds(&self, id: WindowId, bounds: Rect) -> Result<(), WmError> {
        self.run(
            "wmctrl",
            &[
                "-i".into(),
                "-r".into(),
                id.0.to_string(),
                "-e".into(),
                move_resize_arg(&bounds),
            ],
        )
        .map(|_| ())
    }

    fn monitors(&self) -> Result<Vec<Monitor>, WmError> {
        let out = self.run("xrandr", &["--query".into()])?;
        let geometries = parse_xrandr(&out);
        if geometries.is_empty() {
            return Err(WmError::NoMonitors);
        }

        let workarea = self.workarea();
        debug!(?geometries, ?workarea, "detected monitors");
        Ok(geometries
            .into_iter()
            .map(|geometry| Monitor::with_available(geometry, available_area(geometry, workarea)))
            .collect())
    }

    fn pointer_position(&self) -> Result<Point, WmError> {
        let out = self.run("xdotool", &["getmouselocation".into(), "--shell".into()])?;
        parse_mouse_location(&out)
    }
}

/// `wmctrl -e` argument: gravity 0 followed by the bounds
pub fn move_resize_arg(bounds: &Rect) -> String {
    format!("0,{},{},{},{}", bounds.x, bounds.y, bounds.w, bounds.h)
}

/// Parses the decimal id printed by `xdotool getactivewindow`
pub fn parse_window_id(output: &str) -> Result<WindowId, WmError> {
    output
        .trim()
        .parse::<u64>()
        .map(WindowId)
        .map_err(|_| WmError::Parse {
            what: "window id",
            output: output.to_string(),
        })
}

/// Parses `wmctrl -l` into ids and titles
///
/// Lines that don't look like window entries are skipped.
pub fn parse_wmctrl_list(output: &str) -> Vec<(WindowId, String)> {
    output
        .lines()
        .filter_map(|line| {
            let caps = WMCTRL_LINE.captures(line.trim())?;
            let id = u64::from_str_radix(caps[1].trim_start_matches("0x"), 16).ok()?;
            Some((WindowId(id), caps[4].trim().to_string()))
        })
        .collect()
}

/// Parses `xdotool getwindowgeometry` output
///
/// ```text
/// Window 52428803
///   Position: 10,48 (screen: 0)
///   Geometry: 800x600
/// ```
pub fn parse_window_geometry(output: &str) -> Result<Rect, WmError> {
    let parse_err = || WmError::Parse {
        what: "window geometry",
        output: output.to_string(),
    };

    let pos = POSITION.captures(output).ok_or_else(parse_err)?;
    let size = GEOMETRY.captures(output).ok_or_else(parse_err)?;
    let num = |s: &str| s.parse::<i32>().map_err(|_| parse_err());

    Ok(Rect::new(
        num(&pos[1])?,
        num(&pos[2])?,
        num(&size[1])?,
        num(&size[2])?,
    ))
}

/// Returns the last class in `xprop WM_CLASS` output
///
/// Windows without the property yield an empty class.
pub fn parse_wm_class(output: &str) -> String {
    let Some((_, values)) = output.split_once(" = ") else {
        return String::new();
    };

    values
        .split(',')
        .map(|class| class.trim().replace('"', ""))
        .next_back()
        .unwrap_or_default()
}

/// Parses the geometry of every connected output from `xrandr --query`
///
/// Connected outputs without an active mode are left out.
pub fn parse_xrandr(output: &str) -> Vec<Rect> {
    output
        .lines()
        .filter(|line| line.contains(" connected"))
        .filter_map(|line| {
            let caps = XRANDR_MODE.captures(line)?;
            let num = |i: usize| caps[i].parse::<i32>().ok();
            Some(Rect::new(num(3)?, num(4)?, num(1)?, num(2)?))
        })
        .collect()
}

/// Parses the first desktop's rectangle from `xprop -root _NET_WORKAREA`
pub fn parse_workarea(output: &str) -> Option<Rect> {
    let (_, values) = output.split_once('=')?;
    let nums: Vec<i32> = values
        .split(',')
        .take(4)
        .map(|v| v.trim().parse().ok())
        .collect::<Option<_>>()?;

    match nums.as_slice() {
        &[x, y, w, h] => Some(Rect::new(x, y, w, h)),
        _ => None,
    }
}

/// Parses `xdotool getmouselocation --shell`
pub fn parse_mouse_location(output: &str) -> Result<Point, WmError> {
    let field = |name: &str| {
        output
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .and_then(|v| v.trim().parse::<i32>().ok())
    };

    match (field("X="), field("Y=")) {
        (Some(x), Some(y)) => Ok(Point::new(x, y)),
        _ => Err(WmError::Parse {
            what: "pointer location",
            output: output.to_string(),
        }),
    }
}

/// Clips a monitor to the desktop work area
///
/// `_NET_WORKAREA` spans all monitors, so panels on one output show up as a
/// clipped edge on that output only. Falls back to the full geometry.
pub fn available_area(geometry: Rect, workarea: Option<Rect>) -> Rect {
    workarea
        .and_then(|area| geometry.intersection(&area))
        .unwrap_or(geometry)
}
