#![forbid(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use vacplot_core::LegendEntry;
use vacplot_runtime::{Chart, Phase};

use crate::config::ChartConfig;
use crate::error::{AppError, Result};
use crate::loader::load_path;
use crate::logging;
use crate::svg::SvgExporter;

#[derive(Debug, Parser)]
#[command(
    name = "vacplot",
    about = "Animated scatter plot of vacancies against applications, by municipality",
    version
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the selectable municipalities, one per line.
    Options(InputArgs),

    /// Print each ownership value with its color.
    Legend(InputArgs),

    /// Render one frame to an SVG file.
    Render(RenderArgs),

    /// Play a scripted sequence of selections into numbered SVG frames.
    Play(PlayArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// CSV file with Code, Name, Municipality, Ownership, Applications, Vacancies.
    #[arg(long)]
    pub data: PathBuf,

    /// TOML chart configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Change the selection once the initial render has settled.
    #[arg(long)]
    pub select: Option<String>,

    /// Capture this long after the last selection; settles fully when absent.
    #[arg(long = "at-ms")]
    pub at_ms: Option<u64>,

    #[arg(long)]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Comma-separated selection keys, applied in order.
    #[arg(long, value_delimiter = ',', required = true)]
    pub sequence: Vec<String>,

    /// Time spent on each selection before the next one.
    #[arg(long = "hold-ms", default_value_t = 1500)]
    pub hold_ms: u64,

    /// Virtual time between frames.
    #[arg(long = "frame-ms", default_value_t = 100)]
    pub frame_ms: u64,

    #[arg(long = "out-dir")]
    pub out_dir: PathBuf,
}

/// One written frame, as listed in `frames.json`.
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub file: String,
    pub at_ms: u64,
    pub selection: String,
    pub points: usize,
    pub visible: usize,
    pub entering: usize,
    pub updating: usize,
    pub settled: usize,
    pub exiting: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaySummary {
    pub sequence: Vec<String>,
    pub legend: Vec<LegendEntry>,
    pub hold_ms: u64,
    pub frame_ms: u64,
    pub frames: Vec<FrameRecord>,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_json)?;
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with(cli, &mut out)
}

/// Dispatch `cli`, writing command output to `out`.
pub fn run_with<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    match cli.command {
        Commands::Options(args) => {
            let (chart, _) = build_chart(&args)?;
            for key in chart.options() {
                writeln!(out, "{key}")?;
            }
            Ok(())
        }
        Commands::Legend(args) => {
            let (chart, _) = build_chart(&args)?;
            for entry in chart.legend() {
                writeln!(out, "{}\t{}", entry.label, entry.color)?;
            }
            Ok(())
        }
        Commands::Render(args) => run_render(&args),
        Commands::Play(args) => run_play(&args),
    }
}

fn build_chart(args: &InputArgs) -> Result<(Chart, ChartConfig)> {
    let config = ChartConfig::load(args.config.as_deref())?;
    let dataset = load_path(&args.data, config.loader.malformed_rows)?;
    let chart = Chart::new(dataset, config.to_settings()?)?;
    Ok((chart, config))
}

fn run_render(args: &RenderArgs) -> Result<()> {
    let (mut chart, _) = build_chart(&args.input)?;
    if let Some(key) = &args.select {
        chart.settle();
        chart.on_selection_changed(key);
    }
    match args.at_ms {
        Some(ms) => chart.advance(Duration::from_millis(ms)),
        None => chart.settle(),
    }
    write_file(&args.output, &SvgExporter::default().export(&chart))?;
    info!(
        target: "vacplot.chart",
        output = %args.output.display(),
        selection = chart.selection().key(),
        points = chart.scene().len(),
        "frame written"
    );
    Ok(())
}

fn run_play(args: &PlayArgs) -> Result<()> {
    if args.frame_ms == 0 {
        return Err(AppError::invalid("--frame-ms must be greater than zero"));
    }
    if args.sequence.iter().any(|key| key.trim().is_empty()) {
        return Err(AppError::invalid("--sequence contains an empty key"));
    }
    let (mut chart, _) = build_chart(&args.input)?;
    chart.settle();
    fs::create_dir_all(&args.out_dir)?;

    let exporter = SvgExporter::default();
    let frame = Duration::from_millis(args.frame_ms);
    let frames_per_key = args.hold_ms.div_ceil(args.frame_ms).max(1);
    let mut frames = Vec::new();

    for key in &args.sequence {
        chart.on_selection_changed(key.trim());
        for _ in 0..frames_per_key {
            let file = format!("frame_{:05}.svg", frames.len());
            write_file(&args.out_dir.join(&file), &exporter.export(&chart))?;
            frames.push(frame_record(&chart, frames.len(), file));
            chart.advance(frame);
        }
    }

    let summary = PlaySummary {
        sequence: args.sequence.clone(),
        legend: chart.legend(),
        hold_ms: args.hold_ms,
        frame_ms: args.frame_ms,
        frames,
    };
    write_file(
        &args.out_dir.join("frames.json"),
        &serde_json::to_string_pretty(&summary)?,
    )?;
    info!(
        target: "vacplot.chart",
        out_dir = %args.out_dir.display(),
        frames = summary.frames.len(),
        "sequence written"
    );
    Ok(())
}

fn frame_record(chart: &Chart, index: usize, file: String) -> FrameRecord {
    let scene = chart.scene();
    FrameRecord {
        index,
        file,
        at_ms: chart.now().as_millis() as u64,
        selection: chart.selection().key().to_string(),
        points: scene.len(),
        visible: scene.iter().filter(|p| p.is_visible()).count(),
        entering: scene.count(Phase::Entering),
        updating: scene.count(Phase::Updating),
        settled: scene.count(Phase::Settled),
        exiting: scene.count(Phase::Exiting),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
