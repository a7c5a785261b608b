//! Command-line interface definitions for gridwm.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::state::SessionEvent;
use crate::domain::core::{Point, Rect};
use crate::domain::keyboard::{Key, SnapPreset};
use crate::error::{Error, Result};
use crate::logging::LogArgs;

/// Command-line interface for the `gridwm` binary.
#[derive(Parser, Debug)]
#[command(
    name = "gridwm",
    about = "Snap windows to a grid and save or restore window layouts",
    version
)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogArgs,

    /// Settings file (defaults to ~/.gridwm/config.json when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Window manager backend
    #[arg(long, global = true, value_enum, default_value_t = BackendKind::native())]
    pub backend: BackendKind,

    /// Restore the layout at PATH (same as `gridwm restore PATH`; ignored
    /// when a subcommand is given)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to run; shows the grid when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Resolves the command, folding `--config` and the default in
    pub fn into_command(self) -> Commands {
        match (self.command, self.config) {
            (Some(command), _) => command,
            (None, Some(path)) => Commands::Restore { path },
            (None, None) => Commands::Grid(GridArgs::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// xdotool, wmctrl, xprop and xrandr
    X11,
    /// Native Win32 calls
    Win32,
}

impl BackendKind {
    pub fn native() -> Self {
        if cfg!(windows) {
            BackendKind::Win32
        } else {
            BackendKind::X11
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run a grid session driven by events on stdin
    Grid(GridArgs),
    /// Snap the active window in one step
    Snap(SnapArgs),
    /// Save the current window layout as ~/.gridwm/NAME.json
    Export {
        /// Layout name
        name: String,
    },
    /// Move windows back to a saved layout
    Restore {
        /// Layout file
        path: PathBuf,
    },
    /// Render the grid to a PNG file
    Preview(PreviewArgs),
}

/// Arguments for the `grid` subcommand.
///
/// Each stdin line is one event: `press X Y`, `move X Y`, `release`,
/// `export NAME`, or a key name such as `q`, `up` or `escape`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GridArgs {
    /// Redraw the grid to this PNG after every event
    #[arg(long, value_name = "PNG")]
    pub preview: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SnapArgs {
    /// Preset region: nw, n, ne, w, e, sw, s or se
    #[arg(required_unless_present = "drag", conflicts_with = "drag")]
    pub preset: Option<SnapPreset>,

    /// Drag on the grid surface as X,Y,W,H
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
    pub drag: Option<Rect>,

    /// Print the target without moving the window
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PreviewArgs {
    /// Output PNG
    pub output: PathBuf,

    /// Drag to highlight, as X,Y,W,H
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect)]
    pub drag: Option<Rect>,

    /// Output pixels per grid pixel
    #[arg(long, default_value_t = 2)]
    pub scale: u32,
}

/// Parses `X,Y,W,H`
pub fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;

    match parts.as_slice() {
        &[x, y, w, h] => Ok(Rect::new(x, y, w, h)),
        _ => Err(format!("expected X,Y,W,H, got '{s}'")),
    }
}

/// Parses one line of grid session input
///
/// Blank lines and `#` comments yield `None`.
pub fn parse_event(line: &str) -> Result<Option<SessionEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default();
    let args: Vec<&str> = words.collect();

    let point = |args: &[&str]| -> Result<Point> {
        match args {
            [x, y] => {
                let coord = |v: &str| {
                    v.parse::<i32>()
                        .map_err(|_| Error::invalid_input(format!("bad coordinate '{v}' in '{line}'")))
                };
                Ok(Point::new(coord(*x)?, coord(*y)?))
            }
            _ => Err(Error::invalid_input(format!("expected '{command} X Y', got '{line}'"))),
        }
    };

    let event = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("press", rest) => SessionEvent::PointerDown(point(rest)?),
        ("move", rest) => SessionEvent::PointerMove(point(rest)?),
        ("release", []) => SessionEvent::PointerUp,
        ("export", []) => return Err(Error::invalid_input("export needs a layout name")),
        ("export", rest) => SessionEvent::Export(rest.join(" ")),
        (_, []) => SessionEvent::Key(command.parse::<Key>()?),
        _ => return Err(Error::invalid_input(format!("unknown event '{line}'"))),
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_runs_grid() {
        let cli = Cli::try_parse_from(["gridwm"]).unwrap();
        assert_eq!(cli.into_command(), Commands::Grid(GridArgs::default()));
    }

    #[test]
    fn config_flag_restores() {
        let cli = Cli::try_parse_from(["gridwm", "--config", "/tmp/home.json"]).unwrap();
        assert_eq!(
            cli.into_command(),
            Commands::Restore {
                path: PathBuf::from("/tmp/home.json")
            }
        );
    }

    #[test]
    fn snap_preset_and_drag() {
        let cli = Cli::try_parse_from(["gridwm", "snap", "ne"]).unwrap();
        match cli.into_command() {
            Commands::Snap(args) => assert_eq!(args.preset, Some(SnapPreset::NorthEast)),
            other => panic!("unexpected {other:?}"),
        }

        let cli = Cli::try_parse_from(["gridwm", "snap", "--drag", "0,0,50,50", "--dry-run"]).unwrap();
        match cli.into_command() {
            Commands::Snap(args) => {
                assert_eq!(args.drag, Some(Rect::new(0, 0, 50, 50)));
                assert!(args.dry_run);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(Cli::try_parse_from(["gridwm", "snap"]).is_err());
        assert!(Cli::try_parse_from(["gridwm", "snap", "middle"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["gridwm", "export", "work", "--backend", "x11", "--debug"])
            .unwrap();
        assert_eq!(cli.backend, BackendKind::X11);
        assert!(cli.log.debug);
        assert_eq!(cli.into_command(), Commands::Export { name: "work".into() });
    }

    #[test]
    fn rect_argument() {
        assert_eq!(parse_rect("1, 2,3,4"), Ok(Rect::new(1, 2, 3, 4)));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn session_events() {
        assert_eq!(
            parse_event("press 10 20").unwrap(),
            Some(SessionEvent::PointerDown(Point::new(10, 20)))
        );
        assert_eq!(
            parse_event("  move 30 -4 ").unwrap(),
            Some(SessionEvent::PointerMove(Point::new(30, -4)))
        );
        assert_eq!(parse_event("release").unwrap(), Some(SessionEvent::PointerUp));
        assert_eq!(
            parse_event("export my desk").unwrap(),
            Some(SessionEvent::Export("my desk".into()))
        );
        assert_eq!(
            parse_event("Escape").unwrap(),
            Some(SessionEvent::Key(Key::Escape))
        );
        assert_eq!(parse_event("q").unwrap(), Some(SessionEvent::Key(Key::Char('q'))));
        assert_eq!(parse_event("# comment").unwrap(), None);
        assert_eq!(parse_event("").unwrap(), None);
    }

    #[test]
    fn malformed_session_events() {
        assert!(parse_event("press 10").is_err());
        assert!(parse_event("move x y").is_err());
        assert!(parse_event("export").is_err());
        assert!(parse_event("pageup").is_err());
        assert!(parse_event("release now").is_err());
    }
}
