use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use rollcall_core::{
    format_decimal, run_pipeline, validate_artifact, CanonicalRow, LocalDirSink, SourceFile,
    Threshold, CANONICAL_COLUMNS,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod inputs;

use config::{LogFormat, RollcallConfig};
use inputs::collect_inputs;

#[derive(Parser, Debug)]
#[command(author, version, about = "List students whose attendance average falls below a threshold", long_about = None)]
struct Cli {
    /// Path to a TOML config file (defaults to ./rollcall.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge attendance exports and write the students below the threshold
    Run(RunArgs),
    /// Check an existing result file against a threshold
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Cutoff for 'Average %'; rows strictly below it are kept
    #[arg(short, long)]
    threshold: String,
    /// Directory for the result file (overrides config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Print the run summary as JSON instead of the result path
    #[arg(long)]
    json: bool,
    /// Also print the kept rows as a table
    #[arg(long)]
    preview: bool,
    /// Export files or glob patterns, processed in the order given
    #[arg(required = true)]
    inputs: Vec<String>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    #[arg(short, long)]
    threshold: String,
    artifact: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = RollcallConfig::load(cli.config.as_deref())?;
    init_tracing(config.log_format);

    match cli.command {
        Command::Run(args) => handle_run(args, &config),
        Command::Validate(args) => handle_validate(args),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rollcall=info,rollcall_core=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

fn parse_threshold(raw: &str) -> Result<Threshold> {
    raw.parse()
        .map_err(|_| anyhow!("Invalid threshold value '{raw}': expected a number other than NaN"))
}

fn handle_run(args: RunArgs, config: &RollcallConfig) -> Result<()> {
    let threshold = parse_threshold(&args.threshold)?;
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.output_dir.clone());

    let paths = collect_inputs(&args.inputs, config)?;
    if paths.is_empty() {
        bail!(
            "no input files with an accepted extension ({})",
            config.accepted_extensions.join(", ")
        );
    }

    let inputs = paths
        .iter()
        .map(|path| {
            SourceFile::read(path).with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let sink = LocalDirSink::new(&output_dir)
        .with_context(|| format!("failed to prepare output directory {}", output_dir.display()))?;

    info!(
        inputs = inputs.len(),
        %threshold,
        output_dir = %output_dir.display(),
        "starting run"
    );

    let summary = run_pipeline(&inputs, threshold, &sink).inspect_err(|err| {
        error!(error = %err, "run failed");
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.artifact.location.display());
        if args.preview {
            println!("{}", preview_table(&summary.rows));
        }
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let threshold = parse_threshold(&args.threshold)?;
    let contents = std::fs::read(&args.artifact)
        .with_context(|| format!("failed to read {}", args.artifact.display()))?;

    let rows = validate_artifact(&contents, threshold)
        .with_context(|| format!("{} failed validation", args.artifact.display()))?;
    info!(artifact = %args.artifact.display(), rows, "artifact validated");
    println!("File validation successful! ({rows} rows below {threshold})");
    Ok(())
}

fn preview_table(rows: &[CanonicalRow]) -> Table {
    let mut table = Table::new();
    table.set_header(CANONICAL_COLUMNS);
    for row in rows {
        table.add_row(vec![
            row.enrollment_id.clone(),
            row.name.clone(),
            format_decimal(row.average_percent),
        ]);
    }
    table
}
