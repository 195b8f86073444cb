use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use sci_mesh::io::write_mesh_json;
use sci_mesh::{IngestConfig, LogSink, ingest};
use std::path::PathBuf;

/// Reads an SCI grid and boundary-condition file.
#[derive(Parser)]
#[command(name = "sci-mesh")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Reads SCI grid and boundary-condition input files", long_about = None)]
struct Cli {
    /// Primary parameter file (ignored when --config is given)
    #[arg(required_unless_present = "config")]
    parameter_file: Option<PathBuf>,

    /// TOML ingestion config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solid mask file
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Write the ingested mesh as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter_level(level).init();

    let mut config = match (&cli.config, &cli.parameter_file) {
        (Some(path), _) => IngestConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        (None, Some(path)) => IngestConfig::new(path),
        (None, None) => anyhow::bail!("no parameter file given"),
    };
    if let Some(mask) = cli.mask {
        config.mask_file = mask;
    }

    let mesh = ingest(&config, &mut LogSink)
        .with_context(|| format!("Failed to ingest {}", config.parameter_file.display()))?;

    println!(
        "grid {}x{}x{} ({} x {} x {})",
        mesh.grid.imax, mesh.grid.jmax, mesh.grid.kmax, mesh.grid.lx, mesh.grid.ly, mesh.grid.lz
    );
    println!("boundary conditions: {}", mesh.registry.len());
    for condition in mesh.registry.entries() {
        println!("  {:>3} {:<8} {}", condition.id, condition.section, condition.name);
    }
    println!("boundary cells: {}", mesh.table.len());
    println!("classified cells: {}", mesh.fields.flags.claimed_count());
    if let Some(settings) = &mesh.settings {
        println!(
            "time: start={} dt={} steps={}",
            settings.time.t_start, settings.time.dt, settings.time.step_total
        );
    }

    if let Some(output) = &cli.output {
        write_mesh_json(output, &mesh)?;
        println!("wrote {}", output.display());
    }
    Ok(())
}
