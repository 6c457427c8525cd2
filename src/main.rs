mod config;
mod replay;
mod script;


use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use grid::doc::{EditorState, Mode, SnapshotError};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Command, GridArgs};
use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{}: {source}", path.display())]
    Layout { path: PathBuf, source: SnapshotError },
    #[error("{}: {source}", path.display())]
    Script { path: PathBuf, source: ScriptError },
    #[error("failed to encode output: {0}")]
    Output(#[from] SnapshotError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "gridboard failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Replay { layout, script: script_path } => {
            let state = load_layout(&layout, &cli.grid)?;
            let text = read(&script_path)?;
            let events = script::parse(&text).map_err(|source| CliError::Script { path: script_path.clone(), source })?;
            tracing::info!(layout = %layout.display(), events = events.len(), "replaying session");

            let (state, _) = replay::replay(state, &events, cli.engine.config());
            println!("{}", state.to_json()?);
            Ok(())
        }
        Command::Validate { layout } => {
            let state = load_layout(&layout, &cli.grid)?;
            report(&state);
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.to_path_buf(), source })
}

fn load_layout(path: &Path, grid: &GridArgs) -> Result<EditorState, CliError> {
    let text = read(path)?;
    let mut state = EditorState::from_json(&text).map_err(|source| CliError::Layout { path: path.to_path_buf(), source })?;
    if let Some(measured) = grid.measured() {
        tracing::debug!(columns = measured.columns, step_x = measured.step_x, "applying measured grid");
        state = state.with_grid(measured);
    }
    if let Some(zoom) = grid.zoom {
        state = EditorState { zoom, ..state };
    }
    tracing::info!(rects = state.len(), selected = state.selected_ids.len(), "layout loaded");
    Ok(state)
}

/// Print what the engine would see for this snapshot.
fn report(state: &EditorState) {
    if state.usable_grid().is_none() {
        tracing::warn!("no usable grid; the engine will ignore all input (pass --container-width)");
    }
    if state.mode == Mode::Render {
        tracing::warn!("layout is in render mode; the engine will ignore all input");
    }
    let columns = state.usable_grid().map(|g| g.columns);
    println!(
        "{}",
        serde_json::json!({
            "rects": state.len(),
            "selected": state.selected_ids.len(),
            "columns": columns,
            "mode": state.mode,
            "zoom": state.zoom,
        })
    );
}
