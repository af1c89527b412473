//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod export;
mod info;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::assets::Assets;
use crate::blockset::Blockset;
use crate::config::{load_config, merge_cli_overrides, CliOverrides, TilecompConfig};
use crate::tileset::Tileset;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// tilecomp - Render tilesets and blocksets from game map assets
#[derive(Parser)]
#[command(name = "tilecomp")]
#[command(about = "Render tileset atlases and blockset blocks from game map assets")]
#[command(version)]
pub struct Cli {
    /// Path to tilecomp.toml (default: search upward from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Asset root directory, overrides the config file
    #[arg(long, global = true)]
    pub assets: Option<PathBuf>,

    /// Integer scale factor for written images, overrides the config file
    #[arg(long, global = true)]
    pub scale: Option<u32>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which id manifest to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdKind {
    Tilesets,
    Blocksets,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a tileset's atlas to PNG
    Atlas {
        /// Tileset name or id
        tileset: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render one block of a blockset to PNG
    Block {
        /// Blockset name or id
        blockset: String,

        /// Block index within the blockset
        index: usize,

        /// Only draw this elevation (default: all elevations, lowest first)
        #[arg(short, long)]
        elevation: Option<u8>,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a preview of every block in a blockset to PNG
    Blockset {
        /// Blockset name or id
        blockset: String,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the names registered for tilesets or blocksets
    Ids {
        #[arg(value_enum)]
        kind: IdKind,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a summary of a blockset
    Info {
        /// Blockset name or id
        blockset: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render every tileset atlas and blockset preview into a directory
    Export {
        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Install the log subscriber. `RUST_LOG` takes precedence over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(level.into()).from_env_lossy())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_settings(cli: &Cli) -> Result<TilecompConfig, ExitCode> {
    let mut config = load_config(cli.config.as_deref()).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    let overrides = CliOverrides { assets: cli.assets.clone(), scale: cli.scale };
    merge_cli_overrides(&mut config, &overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}

fn open_assets(config: &TilecompConfig) -> Result<Assets, ExitCode> {
    Assets::open(&config.assets.root, config.assets.layout.clone()).map_err(|e| {
        eprintln!("Error: cannot open assets at '{}': {}", config.assets.root.display(), e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Load a tileset by name, falling back to a numeric id.
pub(crate) fn load_tileset(assets: &Assets, key: &str) -> crate::Result<Arc<Tileset>> {
    match key.parse::<u32>() {
        Ok(id) if assets.tileset_ids().id(key).is_none() => assets.tileset(id),
        _ => assets.tileset_by_name(key),
    }
}

/// Load a blockset by name, falling back to a numeric id.
pub(crate) fn load_blockset(assets: &Assets, key: &str) -> crate::Result<Arc<Blockset>> {
    match key.parse::<u32>() {
        Ok(id) if assets.blockset_ids().id(key).is_none() => assets.blockset(id),
        _ => assets.blockset_by_name(key),
    }
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_settings(&cli) {
        Ok(config) => config,
        Err(code) => return code,
    };
    let assets = match open_assets(&config) {
        Ok(assets) => assets,
        Err(code) => return code,
    };
    let scale = config.render.scale;

    match cli.command {
        Commands::Atlas { tileset, output } => render::run_atlas(&assets, &tileset, &output, scale),
        Commands::Block { blockset, index, elevation, output } => {
            render::run_block(&assets, &blockset, index, elevation, &output, scale)
        }
        Commands::Blockset { blockset, output } => {
            render::run_blockset(&assets, &blockset, &output, scale)
        }
        Commands::Ids { kind, json } => info::run_ids(&assets, kind, json),
        Commands::Info { blockset, json } => info::run_info(&assets, &blockset, json),
        Commands::Export { output } => export::run_export(&assets, &output, scale),
    }
}
