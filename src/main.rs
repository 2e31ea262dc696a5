use anyhow::{Context, Result};
use bib_merge::config::{find_config_file, load_config, Config, ConfigFile};
use bib_merge::pipeline::{parse_inputs, run, RunOptions};
use bib_merge::utils::Precedence;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when the run is interrupted from the terminal (128 + SIGINT)
const EXIT_INTERRUPTED: i32 = 130;

/// bib-merge - Merge literature database exports into one deduplicated CSV
#[derive(Parser, Debug)]
#[command(name = "bib-merge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Merge bibliographic exports and remove duplicates by DOI, then title", long_about = None)]
struct Cli {
    /// Input export as "Label:path" (repeatable), e.g. --input "IEEE Xplore:/raw/ieee.csv"
    #[arg(
        long = "input",
        value_name = "LABEL:PATH",
        required_unless_present = "write_default_config"
    )]
    inputs: Vec<String>,

    /// Output CSV file (parent directories are created)
    #[arg(long, value_name = "PATH", required_unless_present = "write_default_config")]
    out: Option<PathBuf>,

    /// Comma-separated source labels, highest priority first; a repeated label
    /// ranks at its last position [default: Scopus,IEEE Xplore,ScienceDirect]
    #[arg(long, value_name = "A,B,C")]
    precedence: Option<String>,

    /// Print per-source tables and pairwise title overlaps
    #[arg(long)]
    print_stats: bool,

    /// Keep every record with an empty normalized title instead of collapsing them
    #[arg(long)]
    exempt_empty_titles: bool,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a default configuration file to PATH and exit
    #[arg(long, value_name = "PATH", exclusive = true)]
    write_default_config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        ConfigFile::create_default(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref())?;

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let options = build_options(&cli, &config)?;
    let detailed = cli.print_stats;

    let work = tokio::task::spawn_blocking(move || run(&options));
    tokio::select! {
        joined = work => {
            let report = joined.context("merge task failed")??;
            print!("{}", report.display(detailed));
            Ok(())
        }
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("Interrupted");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("bib_merge={}", env_filter)),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_options(cli: &Cli, config: &Config) -> Result<RunOptions> {
    let precedence = match &cli.precedence {
        Some(spec) => Precedence::parse(spec),
        None => config.dedup.precedence(),
    };

    let mut dedup = config.dedup.options();
    dedup.exempt_empty_titles |= cli.exempt_empty_titles;

    let output = cli.out.clone().context("--out is required")?;
    let inputs = parse_inputs(&cli.inputs);
    if inputs.is_empty() {
        tracing::warn!("No valid inputs; writing an empty output");
    }

    Ok(RunOptions {
        inputs,
        output,
        precedence,
        dedup,
        columns: config.columns.candidates(),
        delimiter: config.input.delimiter_byte()?,
    })
}
