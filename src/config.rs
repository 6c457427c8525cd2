//! Command-line and environment configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use grid::consts::{DEFAULT_COLUMNS, DEFAULT_PADDING_PX, DEFAULT_ROW_HEIGHT_PX};
use grid::engine::EngineConfig;
use grid::geom::GridConfig;
use grid::zorder::ZOrderPolicy;

#[derive(Parser, Debug)]
#[command(name = "gridboard", about = "Headless grid layout editor: replay pointer sessions against a layout")]
pub struct Cli {
    #[command(flatten)]
    pub grid: GridArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a scripted session and print the resulting layout.
    Replay {
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        script: PathBuf,
    },
    /// Load a layout and report what the engine would see.
    Validate {
        #[arg(long)]
        layout: PathBuf,
    },
}

/// Container measurement. Applied only when `--container-width` is given;
/// otherwise the layout's own grid is used.
#[derive(Args, Debug, Clone, Copy)]
pub struct GridArgs {
    #[arg(long, env = "GRIDBOARD_CONTAINER_WIDTH")]
    pub container_width: Option<f64>,

    #[arg(long, env = "GRIDBOARD_COLUMNS", default_value_t = DEFAULT_COLUMNS)]
    pub columns: u32,

    #[arg(long, env = "GRIDBOARD_ROW_HEIGHT", default_value_t = DEFAULT_ROW_HEIGHT_PX)]
    pub row_height: f64,

    #[arg(long, env = "GRIDBOARD_PADDING", default_value_t = DEFAULT_PADDING_PX)]
    pub padding: f64,

    /// Overrides the layout's zoom.
    #[arg(long, env = "GRIDBOARD_ZOOM")]
    pub zoom: Option<f64>,
}

impl GridArgs {
    /// The measured grid, if a container width was supplied.
    #[must_use]
    pub fn measured(&self) -> Option<GridConfig> {
        self.container_width.map(|width| GridConfig::new(width, self.columns, self.row_height, self.padding))
    }
}

#[derive(Args, Debug, Clone, Copy)]
pub struct EngineArgs {
    /// Wheel reordering policy: `step` or `stack`.
    #[arg(long, env = "GRIDBOARD_Z_ORDER", default_value = "step")]
    pub z_order: ZOrderPolicy,
}

impl EngineArgs {
    #[must_use]
    pub fn config(&self) -> EngineConfig {
        EngineConfig { z_order: self.z_order, ..EngineConfig::default() }
    }
}
