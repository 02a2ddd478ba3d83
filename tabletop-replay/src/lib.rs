//! # Tabletop Replay
//!
//! Headless host for the tabletop. Reads a script of input events and control
//! actions, drives the interaction engine with a raster paint layer, then
//! writes the final state as JSON and the composited table as PNG.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tabletop-replay -- --script session.json --seed 7 --out-png table.png
//! ```
//!
//! A script is a JSON array mixing input events and control actions:
//!
//! ```json
//! [
//!   {"type": "pointer", "data": {"phase": "down", "x": 600, "y": 400}},
//!   {"type": "pointer", "data": {"phase": "up", "x": 600, "y": 400}},
//!   {"action": "set_zoom", "value": 1.5},
//!   {"action": "roll_die"}
//! ]
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `ReplayConfig` - Table configuration, seed and output paths
//! - `Script` / `Step` - The scripted session
//! - `Report` - What happened, serialized to `--out-state`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tabletop_core::{
    ControlAction, ControlOutcome, GestureOutcome, InputEvent, InteractionEngine, RenderFrame,
    Session, Table, TableConfig, TableError,
};
use tabletop_renderer::{Compositor, Palette, RasterPaintLayer, RenderError};
use thiserror::Error;

/// Command-line arguments for tabletop-replay.
#[derive(Debug, Clone, Parser)]
#[command(name = "tabletop-replay")]
#[command(about = "Replay a scripted tabletop session headlessly")]
#[command(version)]
pub struct CliArgs {
    /// Script file: a JSON array of input events and control actions
    #[arg(long)]
    pub script: PathBuf,

    /// Table configuration JSON (partial; missing fields use defaults)
    #[arg(long, env = "TABLETOP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for shuffles and die rolls (random if omitted)
    #[arg(long, env = "TABLETOP_SEED")]
    pub seed: Option<u64>,

    /// Surface width in pixels (defaults to the table width)
    #[arg(long)]
    pub width: Option<u32>,

    /// Surface height in pixels (defaults to the table height)
    #[arg(long)]
    pub height: Option<u32>,

    /// Write the final state report here
    #[arg(long)]
    pub out_state: Option<PathBuf>,

    /// Write the composited table PNG here
    #[arg(long)]
    pub out_png: Option<PathBuf>,
}

/// Errors from loading, running or saving a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// A file could not be read or written.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The table configuration is invalid.
    #[error("invalid table config: {0}")]
    Config(#[from] TableError),

    /// The script is not valid JSON or contains an unknown step.
    #[error("invalid script: {0}")]
    Script(#[source] serde_json::Error),

    /// Rendering or encoding failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

fn read(path: &Path) -> ReplayResult<String> {
    std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, bytes: &[u8]) -> ReplayResult<()> {
    std::fs::write(path, bytes).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolved replay configuration.
#[derive(Debug, Clone, Default)]
pub struct ReplayConfig {
    /// Table configuration.
    pub table: TableConfig,
    /// Seed for the table's RNG.
    pub seed: u64,
    /// Surface size override.
    pub surface: Option<(u32, u32)>,
    /// Where to write the state report.
    pub out_state: Option<PathBuf>,
    /// Where to write the PNG.
    pub out_png: Option<PathBuf>,
}

impl ReplayConfig {
    /// Resolve configuration from command-line arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is invalid.
    pub fn from_args(args: &CliArgs) -> ReplayResult<Self> {
        let table = match &args.config {
            Some(path) => TableConfig::from_json(&read(path)?)?,
            None => TableConfig::default(),
        };
        let seed = args.seed.unwrap_or_else(rand::random);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let surface = match (args.width, args.height) {
            (None, None) => None,
            (w, h) => Some((
                w.unwrap_or(table.table_width.ceil() as u32),
                h.unwrap_or(table.table_height.ceil() as u32),
            )),
        };

        Ok(Self {
            table,
            seed,
            surface,
            out_state: args.out_state.clone(),
            out_png: args.out_png.clone(),
        })
    }
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// A pointer or touch event.
    Input(InputEvent),
    /// A control action.
    Control(ControlAction),
}

/// A scripted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    /// Steps in order.
    pub steps: Vec<Step>,
}

impl Script {
    /// Parse a script from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not a list of steps.
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        serde_json::from_str(json).map_err(ReplayError::Script)
    }

    /// Load a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> ReplayResult<Self> {
        Self::from_json(&read(path)?)
    }
}

/// What a replay did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Seed used.
    pub seed: u64,
    /// Number of steps applied.
    pub steps: usize,
    /// Gestures that finished, in order.
    pub gestures: Vec<GestureOutcome>,
    /// Die rolls, in order.
    pub rolls: Vec<u8>,
    /// Gesture still in flight at the end of the script.
    pub session: Session,
    /// Final frame.
    pub frame: RenderFrame,
}

/// Run a script against a fresh table.
///
/// # Errors
///
/// Returns an error if the table or paint layer cannot be created.
pub fn run(
    config: &ReplayConfig,
    script: &Script,
) -> ReplayResult<(InteractionEngine<RasterPaintLayer>, Report)> {
    let table = Table::new(config.table.clone(), config.seed)?;
    let paint = RasterPaintLayer::from_config(&config.table)?;
    let mut engine = InteractionEngine::new(table, paint);
    if let Some((width, height)) = config.surface {
        engine.resize(width, height);
    }

    let mut gestures = Vec::new();
    let mut rolls = Vec::new();
    for (index, step) in script.steps.iter().enumerate() {
        match step {
            Step::Input(event) => {
                let outcome = engine.handle(event);
                if outcome != GestureOutcome::None {
                    tracing::debug!("Step {index}: {outcome:?}");
                    gestures.push(outcome);
                }
            }
            Step::Control(action) => {
                if let ControlOutcome::Rolled(value) = engine.apply(*action) {
                    tracing::info!("Step {index}: rolled {value}");
                    rolls.push(value);
                }
            }
        }
    }

    let report = Report {
        seed: config.seed,
        steps: script.steps.len(),
        gestures,
        rolls,
        session: *engine.session(),
        frame: engine.frame(),
    };
    Ok((engine, report))
}

/// Write the requested outputs for a finished replay.
///
/// # Errors
///
/// Returns an error if rendering, encoding or writing fails.
pub fn write_outputs(
    config: &ReplayConfig,
    engine: &InteractionEngine<RasterPaintLayer>,
    report: &Report,
) -> ReplayResult<()> {
    if let Some(path) = &config.out_state {
        let json = serde_json::to_vec_pretty(report).map_err(ReplayError::Script)?;
        write(path, &json)?;
        tracing::info!("State written to {}", path.display());
    }
    if let Some(path) = &config.out_png {
        let compositor = Compositor::new(Palette::from_config(&config.table));
        let png = compositor.render_png(&report.frame, engine.paint())?;
        write(path, &png)?;
        tracing::info!("Table image written to {}", path.display());
    }
    Ok(())
}

/// Load, run and save in one go.
///
/// # Errors
///
/// Returns an error if any stage fails.
pub fn execute(args: &CliArgs) -> ReplayResult<Report> {
    let config = ReplayConfig::from_args(args)?;
    let script = Script::load(&args.script)?;
    tracing::info!(
        "Replaying {} steps with seed {}",
        script.steps.len(),
        config.seed
    );
    let (engine, report) = run(&config, &script)?;
    write_outputs(&config, &engine, &report)?;
    Ok(report)
}
