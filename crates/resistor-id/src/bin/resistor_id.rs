//! resistor-id CLI: decode resistor values from color-band photographs.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::LevelFilter;
use resistor_id::{
    build_report, decode_resistance, detect_file, discover_inputs, init_logging, process_batch,
    render_overlay, save_image, BandDetectConfig, BandDetector, BatchOptions, ColorLabel,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "resistor-id")]
#[command(about = "Decode axial resistor values from photographs of their color bands")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit structured JSON logs (with the `tracing` feature).
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a single photograph.
    Decode(DecodeArgs),

    /// Decode every `R<id>_<variant>.<jpg|jpeg|png>` file in a directory.
    Batch(BatchArgs),

    /// Decode a color sequence given by name, e.g. `brown black red`.
    Colors {
        /// Value band colors, left to right.
        #[arg(required = true, num_args = 1..)]
        colors: Vec<ColorLabel>,

        /// Tolerance band color.
        #[arg(long)]
        tolerance: Option<ColorLabel>,
    },
}

#[derive(Debug, Clone, Args)]
struct DecodeArgs {
    /// Path to the input image.
    image: PathBuf,

    /// JSON detector configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Treat the input as an already rectified top-down view.
    #[arg(long)]
    no_rectify: bool,

    /// Write the rectified view here.
    #[arg(long)]
    rectified_out: Option<PathBuf>,

    /// Write the diagnostic overlay here.
    #[arg(long)]
    overlay_out: Option<PathBuf>,

    /// Print the full analysis as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct BatchArgs {
    /// Directory holding the input photographs.
    dir: PathBuf,

    /// JSON detector configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Worker threads (0 = one per core).
    #[arg(long, default_value_t = 0)]
    jobs: usize,

    /// Report path (default: config `report_path` or `resistor_report.json`).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Cache rectified views in this directory.
    #[arg(long)]
    rectified_dir: Option<PathBuf>,

    /// Write diagnostic overlays to this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,
}

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn load_config(path: Option<&Path>) -> CliResult<BandDetectConfig> {
    match path {
        Some(path) => BandDetectConfig::load_json(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()).into()),
        None => Ok(BandDetectConfig::default()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(level_for(cli.verbose), cli.log_json);

    let result = match cli.command {
        Commands::Decode(args) => run_decode(&args),
        Commands::Batch(args) => run_batch(&args),
        Commands::Colors { colors, tolerance } => run_colors(&colors, tolerance),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_decode(args: &DecodeArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let mut params = config.build_params();
    if args.no_rectify {
        params.rectify = false;
    }
    let detector = BandDetector::new(params);

    let detection = detect_file(&detector, &args.image)?;

    if let Some(out) = &args.rectified_out {
        match &detection.rectified {
            Some(rectified) => save_image(out, &rectified.image)?,
            None => log::warn!("rectification disabled, {} not written", out.display()),
        }
    }
    if let Some(out) = &args.overlay_out {
        save_image(out, &render_overlay(&detection.cleaned, &detection.analysis))?;
    }

    let analysis = &detection.analysis;
    if args.json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        println!("{}: {}", analysis.filename, analysis.decoded);
    }
    Ok(())
}

fn run_batch(args: &BatchArgs) -> CliResult<()> {
    let config = load_config(args.config.as_deref())?;
    let detector = config.build_detector();
    let report_path = args.report.clone().unwrap_or_else(|| config.report_path());

    let files = discover_inputs(&args.dir)
        .map_err(|e| format!("cannot list {}: {e}", args.dir.display()))?;
    if files.is_empty() {
        log::warn!("no input files found in {}", args.dir.display());
    }

    let opts = BatchOptions {
        jobs: args.jobs,
        rectified_dir: args.rectified_dir.clone(),
        overlay_dir: args.overlay_dir.clone(),
    };
    let entries = process_batch(&files, &detector, &opts)?;
    let report = build_report(&entries);

    for entry in &report.entries {
        match (&entry.analysis, &entry.error) {
            (Some(analysis), _) => println!("{}: {}", entry.file, analysis.decoded),
            (None, Some(err)) => println!("{}: failed: {err}", entry.file),
            (None, None) => println!("{}: no result", entry.file),
        }
    }
    let s = report.summary;
    println!(
        "processed {}, decoded {}, failed {}",
        s.processed, s.decoded, s.failed
    );

    if let Some(parent) = report_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    report.write_json(&report_path)?;
    log::info!("report written to {}", report_path.display());
    Ok(())
}

fn run_colors(colors: &[ColorLabel], tolerance: Option<ColorLabel>) -> CliResult<()> {
    let tolerance: Vec<ColorLabel> = tolerance.into_iter().collect();
    let decoded = decode_resistance(colors, &tolerance);
    match &decoded.error {
        Some(err) => Err(format!("{}: {err}", err.name()).into()),
        None => {
            println!("{decoded}");
            Ok(())
        }
    }
}
