mod input;
mod model;
mod pipeline;
mod report;
mod synth;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::input::{RaterSource, load_table};
use crate::model::config::{AnalysisConfig, GroupOrder, RatingScale};
use crate::pipeline::report_out::{ReportInput, write_reports};
use crate::pipeline::run_analysis;
use crate::report::ReportMeta;
use crate::synth::{SynthConfig, generate_csv};

#[derive(Parser)]
#[command(
    name = "raterqc",
    version,
    about = "Inter-rater agreement analysis for hierarchical maturity ratings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a ratings CSV and write agreement reports
    Analyze(AnalyzeArgs),
    /// Generate a synthetic ratings CSV with a fixed seed
    Generate(GenerateArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Ratings CSV (optionally .gz)
    #[arg(long)]
    input: PathBuf,
    /// Output directory for dispersion.tsv, summary.json, report.txt
    #[arg(long)]
    out: PathBuf,
    /// Std dev above which a row counts as high disagreement
    #[arg(long, default_value_t = 1.0)]
    threshold: f64,
    /// Minimum rows a (function, category) group needs for correlation
    #[arg(long, default_value_t = 3)]
    min_group_size: usize,
    /// Explicit rater columns, comma separated; default infers from header
    #[arg(long, value_delimiter = ',')]
    raters: Option<Vec<String>>,
    #[arg(long, value_enum, default_value_t = GroupOrderArg::FirstSeen)]
    group_order: GroupOrderArg,
    /// Inclusive rating scale as MIN:MAX; out-of-scale scores are rejected
    #[arg(long)]
    scale: Option<String>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Destination CSV path
    #[arg(long)]
    out: PathBuf,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 6)]
    raters: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GroupOrderArg {
    FirstSeen,
    Sorted,
}

impl From<GroupOrderArg> for GroupOrder {
    fn from(value: GroupOrderArg) -> Self {
        match value {
            GroupOrderArg::FirstSeen => GroupOrder::FirstSeen,
            GroupOrderArg::Sorted => GroupOrder::Sorted,
        }
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("RATERQC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Generate(args) => run_generate(args),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let config = AnalysisConfig {
        disagreement_threshold: args.threshold,
        min_group_size: args.min_group_size,
        rater_columns: args.raters,
        group_order: args.group_order.into(),
        scale: args.scale.as_deref().map(parse_scale).transpose()?,
    };

    let bundle = load_table(&args.input, &config).map_err(|e| e.to_string())?;
    info!(
        "loaded {} rows, {} raters from {}",
        bundle.table.n_rows(),
        bundle.table.n_raters(),
        bundle.path.display()
    );

    let output = run_analysis(&bundle.table, &config);

    let meta = ReportMeta {
        tool_name: "raterqc".to_string(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        input_path: bundle.path.display().to_string(),
        rater_source: match bundle.rater_source {
            RaterSource::Explicit => "explicit".to_string(),
            RaterSource::Inferred => "inferred".to_string(),
        },
        raters: bundle.table.raters.clone(),
        n_rows: bundle.table.n_rows(),
        disagreement_threshold: config.disagreement_threshold,
        min_group_size: config.min_group_size,
        group_order: match config.group_order {
            GroupOrder::FirstSeen => "first-seen".to_string(),
            GroupOrder::Sorted => "sorted".to_string(),
        },
        scale: config.scale.map(|s| (s.min, s.max)),
    };

    let report_input = ReportInput {
        meta: &meta,
        table: &bundle.table,
        output: &output,
    };
    write_reports(&report_input, &args.out).map_err(|e| e.to_string())?;

    Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    if args.raters < 2 {
        return Err("--raters must be at least 2".to_string());
    }
    let config = SynthConfig {
        seed: args.seed,
        n_raters: args.raters,
    };
    let n_rows = generate_csv(&args.out, &config).map_err(|e| e.to_string())?;
    info!("wrote {} rows to {}", n_rows, args.out.display());
    Ok(())
}

/// "MIN:MAX", both inclusive, e.g. "0:6".
fn parse_scale(spec: &str) -> Result<RatingScale, String> {
    let (min, max) = spec
        .split_once(':')
        .ok_or_else(|| format!("invalid --scale {spec:?} (use MIN:MAX)"))?;
    let min: f64 = min
        .trim()
        .parse()
        .map_err(|_| format!("invalid --scale minimum {min:?}"))?;
    let max: f64 = max
        .trim()
        .parse()
        .map_err(|_| format!("invalid --scale maximum {max:?}"))?;
    if min > max {
        return Err(format!("invalid --scale {spec:?} (minimum exceeds maximum)"));
    }
    Ok(RatingScale { min, max })
}
