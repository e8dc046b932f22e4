use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use otsu_eval::config::EvalConfig;
use otsu_eval::harness::compare;
use otsu_eval::patterns::{image_from_raw, Pattern};
use otsu_eval::report::{format_json, format_text, format_text_with_preview, EvalReport};

use log::LevelFilter;
use std::str::FromStr;

#[cfg(not(feature = "tracing"))]
use log::info;
#[cfg(feature = "tracing")]
use tracing::info;

#[cfg(feature = "tracing")]
use otsu_eval::core::init_tracing;
#[cfg(not(feature = "tracing"))]
use otsu_eval::core::init_with_level;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PatternArg {
    Gradient,
    Split,
    Constant,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Otsu binarization of a 64x64 test image, timed and scored with PSNR/SSIM.
#[derive(Debug, Parser)]
#[command(name = "otsu-eval", version, about)]
struct Cli {
    /// JSON run configuration; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Synthetic test image.
    #[arg(long, value_enum)]
    pattern: Option<PatternArg>,

    /// Left-half level for `--pattern split`.
    #[arg(long, default_value_t = 50, requires = "pattern")]
    low: u8,

    /// Right-half level for `--pattern split`.
    #[arg(long, default_value_t = 200, requires = "pattern")]
    high: u8,

    /// Fill level for `--pattern constant`.
    #[arg(long, default_value_t = 0, requires = "pattern")]
    value: u8,

    /// Headerless 64x64 8-bit image instead of a synthetic pattern.
    #[arg(long, conflicts_with = "pattern")]
    raw: Option<PathBuf>,

    /// Timed segmentations per strategy.
    #[arg(long)]
    repeats: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Append an ASCII rendering of each binarization (text format only).
    #[arg(long)]
    preview: bool,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level (`off`, `error`, `warn`, `info`, `debug`, `trace`).
    /// With the `tracing` feature, `RUST_LOG` overrides it when set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn pattern(&self) -> Option<Pattern> {
        self.pattern.map(|p| match p {
            PatternArg::Gradient => Pattern::Gradient,
            PatternArg::Split => Pattern::Split {
                low: self.low,
                high: self.high,
            },
            PatternArg::Constant => Pattern::Constant { value: self.value },
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = LevelFilter::from_str(&cli.log_level).unwrap_or(LevelFilter::Warn);
    #[cfg(not(feature = "tracing"))]
    if let Err(err) = init_with_level(level) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    #[cfg(feature = "tracing")]
    init_tracing(level, false);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg_attr(feature = "tracing", tracing::instrument(level = "info", skip_all))]
fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &cli.config {
        Some(path) => EvalConfig::load(path)?,
        None => EvalConfig::default(),
    };
    if let Some(pattern) = cli.pattern() {
        cfg.pattern = pattern;
    }
    if let Some(repeats) = cli.repeats {
        cfg.repeats = repeats;
    }
    cfg.preview |= cli.preview;

    let (image, source) = match &cli.raw {
        Some(path) => (
            image_from_raw(&fs::read(path)?)?,
            path.display().to_string(),
        ),
        None => (cfg.pattern.render(), cfg.pattern.describe()),
    };
    info!("evaluating {source} with {} strategies", cfg.strategies.len());

    let runs = compare(&image, &cfg.strategies, cfg.repeats)?;
    let rendered = match cli.format {
        Format::Text if cfg.preview => format_text_with_preview(&runs),
        Format::Text => format_text(&runs),
        Format::Json => format_json(&EvalReport::new(source, runs))?,
    };

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            info!("wrote report to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
