use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use shell_wm::config::Workspace;
use shell_wm::desktop::Desktop;
use shell_wm::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use shell_wm::runner::run_desktop;
use shell_wm::snapshot::WindowTableSnapshot;
use shell_wm::taskbar::DEFAULT_APPS;
use shell_wm::tracing_sub;
use shell_wm::ui::CellScale;

#[derive(Debug, Parser)]
#[command(name = "shell-wm", about = "Simulated desktop shell in the terminal")]
struct Args {
    /// Fixed logical workspace width; follows the terminal when omitted.
    #[arg(long)]
    width: Option<f64>,
    /// Fixed logical workspace height; follows the terminal when omitted.
    #[arg(long)]
    height: Option<f64>,
    /// Logical units per terminal column.
    #[arg(long, default_value_t = 8.0)]
    cell_width: f64,
    /// Logical units per terminal row.
    #[arg(long, default_value_t = 16.0)]
    cell_height: f64,
    /// Window table to restore on start and save on exit.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Append debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    tracing_sub::init_default(args.log_file.as_deref())?;

    let scale = CellScale::new(args.cell_width, args.cell_height);
    let (cols, rows) = crossterm::terminal::size()?;
    let mut desktop = Desktop::new(scale, cols, rows, &DEFAULT_APPS).map_err(io::Error::other)?;
    if args.width.is_some() || args.height.is_some() {
        let current = desktop.window_manager().config().workspace;
        desktop.set_fixed_workspace(Workspace::new(
            args.width.unwrap_or(current.width),
            args.height.unwrap_or(current.height),
        ));
    }
    if let Some(path) = &args.layout {
        match WindowTableSnapshot::load(path) {
            Ok(Some(snapshot)) => {
                if let Err(err) = desktop.window_manager_mut().import_snapshot(&snapshot) {
                    tracing::warn!(%err, "ignoring saved layout");
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(%err, path = %path.display(), "could not read layout"),
        }
    }

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let result = run_desktop(
        output.terminal_mut(),
        ConsoleInputDriver::new(),
        &mut desktop,
        Duration::from_millis(16),
    );
    output.exit()?;

    if let Some(path) = &args.layout {
        desktop
            .window_manager()
            .export_snapshot()
            .save(path)
            .map_err(io::Error::other)?;
    }
    result
}
