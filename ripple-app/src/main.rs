mod config;
mod writer;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Error;
use dotenvy::dotenv;
use humansize::{
    BINARY,
    format_size,
};
use ripple_solver::{
    FieldType,
    SimulationDriver,
    SineArchSeed,
    WaveSolver,
    Waveform,
};
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    writer::{
        BinarySnapshotWriter,
        TextSnapshotWriter,
    },
};

#[derive(Debug, Parser)]
struct Args {
    /// path to a TOML configuration; the reference parameters are used if
    /// absent
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// directory snapshots are written to, overriding the configuration
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// emit only every n-th time level
    #[arg(long)]
    stride: Option<usize>,

    /// velocity-field classification override
    #[arg(long)]
    field_type: Option<FieldType>,

    /// source waveform override
    #[arg(long)]
    waveform: Option<Waveform>,
}

fn main() -> Result<(), Error> {
    let _ = dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    color_eyre::install()?;

    let args = Args::parse();

    let mut config = args
        .config
        .as_deref()
        .map(Config::load)
        .transpose()?
        .unwrap_or_default();

    if let Some(output) = args.output {
        config.output.directory = output;
    }
    if let Some(stride) = args.stride {
        config.output.stride = stride;
    }
    if let Some(field_type) = args.field_type {
        config.medium.field_type = field_type;
    }
    if let Some(waveform) = args.waveform {
        config.source.waveform = waveform;
    }

    let grid = config.grid();
    let dimensions = grid.dimensions();
    tracing::info!(
        nx = dimensions.x,
        ny = dimensions.y,
        nt = grid.num_levels(),
        field_type = %config.medium.field_type,
        waveform = %config.source.waveform,
        memory = %format_size(grid.memory_usage_estimate(), BINARY),
        "creating wave field"
    );

    let mut solver = WaveSolver::new(
        grid,
        config.medium.field_type,
        config.source_spec(),
        SineArchSeed,
    )?;
    solver.set_instability_threshold(config.limits.amplitude_threshold);

    let mut driver = SimulationDriver::new(solver).with_stride(config.output.stride);

    std::fs::create_dir_all(&config.output.directory)?;
    if config.output.binary {
        let path = config
            .output
            .directory
            .join(format!("{}.bin", config.output.basename));
        tracing::debug!(path = %path.display(), "binary snapshot sink");
        driver.add_sink(BinarySnapshotWriter::new(path));
    }
    if config.output.text {
        let path = config
            .output
            .directory
            .join(format!("{}.dat", config.output.basename));
        tracing::debug!(path = %path.display(), "text snapshot sink");
        driver.add_sink(TextSnapshotWriter::new(path));
    }

    let summary = driver.run()?;

    if summary.unstable_steps > 0 {
        tracing::warn!(
            unstable_steps = summary.unstable_steps,
            "run produced amplitudes above the stability threshold, check the Courant numbers"
        );
    }

    Ok(())
}
