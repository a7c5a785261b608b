//! Saved window layouts
//!
//! A layout records, per monitor, where each window sat relative to that
//! monitor's top-left corner. Windows are matched back by class on restore,
//! which is not unique: classes with zero or several live windows are
//! reported instead of guessed.
//!
//! File format:
//!
//! ```json
//! {
//!   "x_off": 0,
//!   "y_off": 0,
//!   "screens": {
//!     "0": [{ "wclass": "firefox", "x": 10, "y": 10, "w": 800, "h": 600 }]
//!   }
//! }
//! ```
//!
//! Numbers are written as integers and read from integers or decimal strings.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::core::{Rect, Size};
use crate::platform::{Monitor, WindowInfo, WindowManager, WmError};

/// Errors that can occur while loading or saving layouts
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Failed to read layout {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write layout {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed layout {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode layout: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Layout name must not be empty")]
    EmptyName,

    #[error("Layout name '{0}' must not contain path separators")]
    InvalidName(String),
}

/// One window's saved position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub wclass: String,
    #[serde(deserialize_with = "int_or_string")]
    pub x: i32,
    #[serde(deserialize_with = "int_or_string")]
    pub y: i32,
    #[serde(deserialize_with = "int_or_string")]
    pub w: i32,
    #[serde(deserialize_with = "int_or_string")]
    pub h: i32,
}

impl LayoutEntry {
    /// Bounds relative to the owning monitor's origin
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Saved layout for all monitors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LayoutFile")]
pub struct Layout {
    /// Shift applied to every entry on restore
    pub x_off: i32,
    pub y_off: i32,
    /// Entries keyed by monitor index
    pub screens: BTreeMap<usize, Vec<LayoutEntry>>,
}

/// On-disk shape of a layout
///
/// Exports write `x_off`/`y_off`, while hand-edited files shift a layout
/// with `off_x`/`off_y`. Both may appear; `off_*` wins.
#[derive(Deserialize)]
struct LayoutFile {
    #[serde(default, deserialize_with = "opt_int_or_string")]
    x_off: Option<i32>,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    y_off: Option<i32>,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    off_x: Option<i32>,
    #[serde(default, deserialize_with = "opt_int_or_string")]
    off_y: Option<i32>,
    screens: BTreeMap<usize, Vec<LayoutEntry>>,
}

impl From<LayoutFile> for Layout {
    fn from(file: LayoutFile) -> Self {
        Self {
            x_off: file.off_x.or(file.x_off).unwrap_or_default(),
            y_off: file.off_y.or(file.y_off).unwrap_or_default(),
            screens: file.screens,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => i32::try_from(v).map_err(de::Error::custom),
        IntOrString::Str(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("expected an integer, found {s:?}"))),
    }
}

fn opt_int_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    int_or_string(deserializer).map(Some)
}

impl Layout {
    /// Parses a layout from JSON text
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Loads a layout file
    ///
    /// The whole file is validated up front; nothing is returned for a file
    /// with any malformed entry.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&text).map_err(|source| LayoutError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the layout as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), LayoutError> {
        let write_err = |source| LayoutError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n").map_err(write_err)
    }

    /// Total number of entries across monitors
    pub fn entry_count(&self) -> usize {
        self.screens.values().map(Vec::len).sum()
    }
}

/// Returns `<dir>/<name>.json` for a named layout
pub fn layout_path(dir: &Path, name: &str) -> Result<PathBuf, LayoutError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LayoutError::EmptyName);
    }
    if name.contains(['/', '\\']) {
        return Err(LayoutError::InvalidName(name.to_string()));
    }

    Ok(dir.join(format!("{name}.json")))
}

/// Captures the current window layout
///
/// A window is kept only if it overlaps exactly one monitor's available
/// area; windows spanning monitors are left out. Windows without a class
/// can't be matched later and are left out too.
///
/// # Arguments
/// * `monitors` - Monitors in backend order; their positions become the keys
/// * `windows` - Live windows in absolute screen coordinates
pub fn capture(monitors: &[Monitor], windows: &[WindowInfo]) -> Layout {
    let mut screens = BTreeMap::new();

    for (index, monitor) in monitors.iter().enumerate() {
        let origin = monitor.geometry.origin();
        let entries = windows
            .iter()
            .filter(|w| !w.class.is_empty())
            .filter(|w| {
                let overlapped = monitors
                    .iter()
                    .filter(|m| w.bounds.intersects(&m.available))
                    .count();
                overlapped == 1 && w.bounds.intersects(&monitor.available)
            })
            .map(|w| LayoutEntry {
                wclass: w.class.clone(),
                x: w.bounds.x - origin.x,
                y: w.bounds.y - origin.y,
                w: w.bounds.w,
                h: w.bounds.h,
            })
            .collect::<Vec<_>>();

        debug!(index, count = entries.len(), "captured monitor");
        screens.insert(index, entries);
    }

    Layout {
        x_off: 0,
        y_off: 0,
        screens,
    }
}

/// One window moved during a restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedEntry {
    pub wclass: String,
    /// Final bounds in absolute screen coordinates
    pub bounds: Rect,
}

/// A class that couldn't be matched to exactly one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousClass {
    pub wclass: String,
    pub matches: usize,
}

/// Outcome of a restore
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    pub applied: Vec<AppliedEntry>,
    pub ambiguous: Vec<AmbiguousClass>,
    /// Monitor indices in the layout that no longer exist
    pub skipped_monitors: Vec<usize>,
}

/// Planned action for one layout entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Apply {
        window: WindowInfo,
        wclass: String,
        bounds: Rect,
    },
    Ambiguous(AmbiguousClass),
}

fn plan_restore(
    layout: &Layout,
    monitors: &[Monitor],
    windows: &[WindowInfo],
) -> (Vec<Step>, Vec<usize>) {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut steps = Vec::new();
    let mut skipped = Vec::new();

    for (&index, entries) in &layout.screens {
        let Some(monitor) = monitors.get(index) else {
            warn!(index, monitors = monitors.len(), "layout monitor no longer exists");
            skipped.push(index);
            continue;
        };
        let origin = monitor.geometry.origin();

        for entry in entries {
            if !visited.insert(entry.wclass.as_str()) {
                continue;
            }

            let mut matching = windows.iter().filter(|w| w.class == entry.wclass);
            match (matching.next(), matching.count()) {
                (Some(window), 0) => steps.push(Step::Apply {
                    window: window.clone(),
                    wclass: entry.wclass.clone(),
                    bounds: entry
                        .bounds()
                        .translated(layout.x_off, layout.y_off)
                        .translated(origin.x, origin.y),
                }),
                (first, rest) => {
                    let matches = first.map_or(0, |_| 1 + rest);
                    steps.push(Step::Ambiguous(AmbiguousClass {
                        wclass: entry.wclass.clone(),
                        matches,
                    }));
                }
            }
        }
    }

    (steps, skipped)
}

/// Moves live windows back to a saved layout
///
/// Each class is handled once, at its first occurrence in monitor order.
/// A matched window is first shrunk to `transitional` so the move isn't
/// clamped by its old size, then moved, then sized.
pub fn restore(
    layout: &Layout,
    monitors: &[Monitor],
    windows: &[WindowInfo],
    port: &dyn WindowManager,
    transitional: Size,
) -> Result<RestoreReport, WmError> {
    let (steps, skipped_monitors) = plan_restore(layout, monitors, windows);
    let mut report = RestoreReport {
        skipped_monitors,
        ..RestoreReport::default()
    };

    for step in steps {
        match step {
            Step::Apply {
                window,
                wclass,
                bounds,
            } => {
                port.resize_window(window.id, transitional.w, transitional.h)?;
                port.move_window(window.id, bounds.x, bounds.y)?;
                port.resize_window(window.id, bounds.w, bounds.h)?;
                info!(id = %window.id, %wclass, %bounds, "restored window");
                report.applied.push(AppliedEntry { wclass, bounds });
            }
            Step::Ambiguous(ambiguous) => {
                warn!(
                    wclass = %ambiguous.wclass,
                    matches = ambiguous.matches,
                    "class does not match exactly one window"
                );
                report.ambiguous.push(ambiguous);
            }
        }
    }

    Ok(report)
}
