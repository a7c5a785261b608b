//! Application controller
//!
//! Ties the domain pipeline to a window manager backend. A controller is
//! created when the grid is shown: at that point it pins the window to move
//! and the monitor the session runs on, so later pointer motion across
//! monitors can't change the target.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::state::Session;
use crate::config::Settings;
use crate::domain::core::Rect;
use crate::domain::layout::{self, Layout, RestoreReport};
use crate::domain::margin::MarginCorrector;
use crate::domain::snap::SnapTransform;
use crate::error::Result;
use crate::platform::{Monitor, WindowId, WindowManager, WmError};

/// Snap pipeline bound to one window on one monitor
pub struct SnapController<'a> {
    port: &'a dyn WindowManager,
    settings: Settings,
    window: WindowId,
    monitor_index: usize,
    monitor: Monitor,
    transform: SnapTransform,
    corrector: MarginCorrector,
}

impl<'a> SnapController<'a> {
    /// Resolves the active window and the pointer's monitor
    ///
    /// Fails before anything is shown if either can't be determined.
    pub fn start(port: &'a dyn WindowManager, settings: Settings) -> Result<Self> {
        let window = port.active_window()?;
        let monitor_index = port.monitor_of_pointer()?;
        let monitor = port
            .monitors()?
            .get(monitor_index)
            .copied()
            .ok_or(WmError::NoMonitors)?;

        let transform = SnapTransform::new(settings.grid()?, monitor.available);
        let corrector = settings.margin_corrector();
        info!(
            backend = port.name(),
            %window,
            monitor = monitor_index,
            region = %monitor.available,
            "grid session started"
        );

        Ok(Self {
            port,
            settings,
            window,
            monitor_index,
            monitor,
            transform,
            corrector,
        })
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn monitor_index(&self) -> usize {
        self.monitor_index
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Creates the input session for this controller's grid
    pub fn session(&self) -> Session {
        Session::new(self.settings.surface)
    }

    /// Computes the screen rectangle a drag would produce
    ///
    /// # Returns
    /// Absolute screen bounds, or `None` when the drag covers no cell
    pub fn target_for(&self, drag: &Rect) -> Option<Rect> {
        let relative = self.transform.apply(drag)?;
        Some(self.corrector.correct(&relative, &self.monitor.available))
    }

    /// Applies a finished drag to the window
    ///
    /// An empty selection is a no-op and returns `Ok(None)`.
    pub fn finish(&self, drag: &Rect) -> Result<Option<Rect>> {
        let Some(target) = self.target_for(drag) else {
            debug!(%drag, "empty selection, leaving window alone");
            return Ok(None);
        };

        self.port.set_window_bounds(self.window, target)?;
        info!(window = %self.window, %target, "snapped window");
        Ok(Some(target))
    }

    /// Saves the current layout under `name`
    pub fn export_layout(&self, name: &str) -> Result<PathBuf> {
        export_layout(self.port, &self.settings, name)
    }
}

/// Captures the live desktop and writes it to `<layout_dir>/<name>.json`
pub fn export_layout(port: &dyn WindowManager, settings: &Settings, name: &str) -> Result<PathBuf> {
    let path = layout::layout_path(&settings.layout_dir, name)?;
    let monitors = port.monitors()?;
    let windows = port.list_windows()?;

    let captured = layout::capture(&monitors, &windows);
    captured.save(&path)?;
    info!(
        path = %path.display(),
        windows = captured.entry_count(),
        "exported layout"
    );
    Ok(path)
}

/// Loads a layout file and moves live windows to match it
///
/// The file is fully parsed before any window is touched.
pub fn restore_layout(
    port: &dyn WindowManager,
    settings: &Settings,
    path: &Path,
) -> Result<RestoreReport> {
    let saved = Layout::load(path)?;
    let monitors = port.monitors()?;
    let windows = port.list_windows()?;

    let report = layout::restore(
        &saved,
        &monitors,
        &windows,
        port,
        settings.transitional_size,
    )?;
    info!(
        path = %path.display(),
        applied = report.applied.len(),
        ambiguous = report.ambiguous.len(),
        "restored layout"
    );
    Ok(report)
}
