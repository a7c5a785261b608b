//! Entry point for the `gridwm` binary.

use std::io::{self, BufRead};
use std::process;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, registry};

use gridwm::app::controller::{self, SnapController};
use gridwm::app::state::{SessionError, SessionOutcome};
use gridwm::cli::{self, BackendKind, Cli, Commands, GridArgs, PreviewArgs, SnapArgs};
use gridwm::config::Settings;
use gridwm::domain::core::Rect;
use gridwm::domain::layout::RestoreReport;
use gridwm::platform::x11::X11WindowManager;
use gridwm::platform::WindowManager;
use gridwm::ui::{GridLayout, GridRenderer};
use gridwm::{logging, Error, Result};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen command.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = logging::compute_spec(&cli.log);
    registry()
        .with(logging::env_filter_from_spec(&log_spec))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let settings = Settings::load(cli.settings.as_deref())?;
    let backend = cli.backend;

    match cli.into_command() {
        Commands::Grid(args) => grid(open_backend(backend)?.as_ref(), settings, &args),
        Commands::Snap(args) => snap(open_backend(backend)?.as_ref(), settings, &args),
        Commands::Export { name } => {
            let port = open_backend(backend)?;
            let path = controller::export_layout(port.as_ref(), &settings, &name)?;
            println!("exported layout to {}", path.display());
            Ok(())
        }
        Commands::Restore { path } => {
            let port = open_backend(backend)?;
            let report = controller::restore_layout(port.as_ref(), &settings, &path)?;
            print_report(&report);
            Ok(())
        }
        Commands::Preview(args) => preview(&settings, &args),
    }
}

fn open_backend(kind: BackendKind) -> Result<Box<dyn WindowManager>> {
    match kind {
        BackendKind::X11 => Ok(Box::new(X11WindowManager::new())),
        #[cfg(windows)]
        BackendKind::Win32 => Ok(Box::new(gridwm::platform::win32::Win32WindowManager::new())),
        #[cfg(not(windows))]
        BackendKind::Win32 => Err(Error::UnsupportedBackend("win32")),
    }
}

/// Runs a grid session fed line by line from stdin
fn grid(port: &dyn WindowManager, settings: Settings, args: &GridArgs) -> Result<()> {
    let controller = SnapController::start(port, settings)?;
    let mut session = controller.session();
    let grid = controller.settings().grid()?;
    let renderer = GridRenderer::new();

    let redraw = |drag: &Rect| -> Result<()> {
        if let Some(path) = &args.preview {
            renderer.save_png(&GridLayout::from_grid(&grid, drag, 2), path)?;
        }
        Ok(())
    };
    redraw(&session.drag())?;

    for line in io::stdin().lock().lines() {
        let Some(event) = cli::parse_event(&line?)? else {
            continue;
        };

        match session.handle(event) {
            Ok(SessionOutcome::Continue) => redraw(&session.drag())?,
            Ok(SessionOutcome::Completed(drag)) => {
                match controller.finish(&drag)? {
                    Some(target) => println!("snapped {} to {target}", controller.window()),
                    None => println!("nothing selected"),
                }
                return Ok(());
            }
            Ok(SessionOutcome::Cancelled) => {
                info!("grid session cancelled");
                println!("cancelled");
                return Ok(());
            }
            Ok(SessionOutcome::Export(name)) => {
                let path = controller.export_layout(&name)?;
                println!("exported layout to {}", path.display());
                return Ok(());
            }
            Err(SessionError::Keyboard(err)) => warn!(%err, "ignoring key"),
            Err(err) => return Err(err.into()),
        }
    }

    info!("input closed before the session finished");
    Ok(())
}

fn snap(port: &dyn WindowManager, settings: Settings, args: &SnapArgs) -> Result<()> {
    let drag = match (args.preset, args.drag) {
        (Some(preset), _) => {
            info!(?preset, glyph = %preset.glyph(), "snapping to preset");
            preset.drag_rect(settings.surface)
        }
        (None, Some(drag)) => drag,
        (None, None) => return Err(Error::invalid_input("pass a preset or --drag")),
    };

    let controller = SnapController::start(port, settings)?;
    if args.dry_run {
        match controller.target_for(&drag) {
            Some(target) => println!("{target}"),
            None => println!("nothing selected"),
        }
        return Ok(());
    }

    match controller.finish(&drag)? {
        Some(target) => println!("snapped {} to {target}", controller.window()),
        None => println!("nothing selected"),
    }
    Ok(())
}

fn preview(settings: &Settings, args: &PreviewArgs) -> Result<()> {
    let grid = settings.grid()?;
    let drag = args.drag.unwrap_or(Rect::UNSET);
    let layout = GridLayout::from_grid(&grid, &drag, args.scale);

    GridRenderer::new().save_png(&layout, &args.output)?;
    println!("wrote {}", args.output.display());
    Ok(())
}

fn print_report(report: &RestoreReport) {
    for entry in &report.applied {
        println!("restored {} to {}", entry.wclass, entry.bounds);
    }
    for ambiguous in &report.ambiguous {
        println!(
            "skipped {}: {} matching windows",
            ambiguous.wclass, ambiguous.matches
        );
    }
    for index in &report.skipped_monitors {
        println!("skipped monitor {index}: not connected");
    }
}
