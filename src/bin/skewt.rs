//! Plot an SPC sounding file on a skew-T log-p diagram.

use anyhow::{Context, Result};
use clap::Parser;
use skewt_analysis::{
    diagram::{Canvas, SkewTDiagram},
    read_spc_file, DiagramConfig, DEFAULT_SKIP_ROWS,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Skew-T log-p diagram of a sounding
#[derive(Parser, Debug)]
#[command(name = "skewt", version)]
struct Args {
    /// SPC sounding file, e.g. FWD_20141014_00.txt
    sounding: PathBuf,

    /// Number of header lines before the data
    #[arg(long, default_value_t = DEFAULT_SKIP_ROWS)]
    skip_rows: usize,

    /// Diagram title, made from the file name if not given
    #[arg(long)]
    title: Option<String>,

    /// Output file, .svg or .png (default: the sounding file name with a .svg extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Plot every level, even physically implausible values
    #[arg(long)]
    no_mask: bool,

    /// Print the temperature and pressure at a plot position given as X,Y
    #[arg(long, value_parser = parse_probe, allow_hyphen_values = true)]
    probe: Option<(f64, f64)>,

    /// Log level, used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_probe(arg: &str) -> std::result::Result<(f64, f64), String> {
    let (x, y) = arg
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but found '{}'", arg))?;

    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x '{}'", x))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y '{}'", y))?;
    Ok((x, y))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    run(args)
}

fn run(args: Args) -> Result<()> {
    let Args {
        sounding,
        skip_rows,
        title,
        output,
        no_mask,
        probe,
        ..
    } = args;

    let snd = read_spc_file(&sounding, skip_rows)
        .with_context(|| format!("reading {}", sounding.display()))?;
    info!(path = %sounding.display(), levels = snd.len(), "loaded sounding");

    let mut config = DiagramConfig::default().with_validity_mask(!no_mask);
    if let Some(title) = title {
        config = config.with_title(title);
    }

    let diagram = SkewTDiagram::new(config);
    let canvas = diagram.render(&snd);

    if let Some((x, y)) = probe {
        if let Some(readout) = canvas.format_coord(x, y) {
            println!("{}", readout);
        }
    }

    let output = output.unwrap_or_else(|| sounding.with_extension("svg"));
    canvas
        .save(&output)
        .with_context(|| format!("writing {}", output.display()))?;
    info!(path = %output.display(), "saved diagram");

    Ok(())
}
