//! goban-patches CLI: cut a photographed Go board into per-intersection patches.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use goban_patches::detect;
use goban_patches::grid::GridFitConfig;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "goban-patches")]
#[command(about = "Fit the 19x19 grid of a Go board photo and write one patch per intersection")]
#[command(version)]
struct Cli {
    /// JSON run configuration. Other flags override its fields.
    #[arg(long, conflicts_with_all = ["image", "circles"])]
    config: Option<PathBuf>,

    /// Board photo.
    #[arg(long, required_unless_present = "config", requires = "circles")]
    image: Option<PathBuf>,

    /// JSON array of detected circles `[{"x", "y", "radius"}]` in photo coordinates.
    #[arg(long, required_unless_present = "config", requires = "image")]
    circles: Option<PathBuf>,

    /// Directory for `patch_RR_CC.png` files (default: `patches`).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Write a diagnostic overlay PNG.
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// JSON report path (default: `grid_fit_report.json`).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Fit the photo as-is, without cropping its white margin.
    #[arg(long)]
    no_crop: bool,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Emit JSON log lines (requires the `tracing` feature).
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        goban_patches::core::init_tracing(cli.log_level.into(), cli.json_logs);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = goban_patches::core::init_with_level(cli.log_level.into());
    }
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

fn build_config(cli: &Cli) -> CliResult<GridFitConfig> {
    let mut cfg = match (&cli.config, &cli.image, &cli.circles) {
        (Some(path), _, _) => GridFitConfig::load_json(path)?,
        (None, Some(image), Some(circles)) => {
            GridFitConfig::new(path_string(image), path_string(circles))
        }
        _ => return Err("either --config or both --image and --circles are required".into()),
    };

    if let Some(dir) = &cli.out_dir {
        cfg.output_dir = Some(path_string(dir));
    }
    if let Some(path) = &cli.overlay {
        cfg.overlay_path = Some(path_string(path));
    }
    if let Some(path) = &cli.report {
        cfg.report_path = Some(path_string(path));
    }
    if cli.no_crop {
        cfg.crop_margin = None;
    }
    Ok(cfg)
}

fn run(cli: &Cli) -> CliResult<()> {
    let cfg = build_config(cli)?;
    let report = detect::run_config(&cfg)?;

    let spacing = report.lattice.map(|l| l.spacing()).unwrap_or_default();
    println!(
        "{} patches, spacing {:.2}px, report {}",
        report.patches.len(),
        spacing,
        cfg.report_path().display()
    );
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
