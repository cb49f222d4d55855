mod flows;
mod heatmap;
mod inputs;
mod optimize;
mod report;
mod validate;

use std::path::PathBuf;

use apriori_core::{AppConfig, Environment};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::inputs::InputArgs;

#[derive(Debug, Parser)]
#[command(name = "apriori")]
#[command(about = "Ad portfolio optimizer for simulated persona reactions")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate reactions, optimize the ad portfolio, and write a simulation report
    Optimize {
        #[command(flatten)]
        inputs: InputArgs,
        /// Maximum ads in the portfolio (defaults to `APRIORI_MAX_ADS`)
        #[arg(long)]
        max_ads: Option<usize>,
        /// Where to write the report JSON (defaults to `<data dir>/simulation_report.json`)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Optimize on every reaction without running consistency checks
        #[arg(long)]
        skip_validation: bool,
    },
    /// Run consistency checks and list flagged reactions
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Print the zone by income-tier conversion heatmap
    Heatmap {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Rank simulated multi-screen flows by completion and explain their drop-offs
    Flows {
        /// Flow simulation results: flow id to journeys (JSON or YAML)
        #[arg(long)]
        results: PathBuf,
        /// Optional display names keyed by flow id
        #[arg(long)]
        names: Option<PathBuf>,
        /// Where to write the comparison JSON (defaults to `<data dir>/flow_comparison_report.json`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render a saved simulation report as markdown
    Report {
        /// Path to a simulation report JSON file
        #[arg(long)]
        input: PathBuf,
    },
}

/// Log formatting for the deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LogStyle {
    ansi: bool,
    target: bool,
}

impl LogStyle {
    fn for_env(env: &Environment) -> Self {
        Self {
            ansi: !matches!(env, Environment::Production),
            target: matches!(env, Environment::Development),
        }
    }
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let style = LogStyle::for_env(&config.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(style.ansi)
        .with_target(style.target)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, data_dir = %config.data_dir.display(), "configuration loaded");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let config = apriori_core::load_app_config()?;
    init_tracing(&config)?;

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Optimize {
            inputs,
            max_ads,
            output,
            skip_validation,
        }) => optimize::run_optimize(
            &config,
            &inputs,
            max_ads.unwrap_or(config.default_max_ads),
            output,
            skip_validation,
        )?,
        Some(Commands::Validate { inputs }) => validate::run_validate(&config, &inputs)?,
        Some(Commands::Heatmap { inputs }) => heatmap::run_heatmap(&inputs)?,
        Some(Commands::Flows {
            results,
            names,
            output,
        }) => flows::run_flows(&config, &results, names.as_deref(), output)?,
        Some(Commands::Report { input }) => report::run_report(&input)?,
        None => println!("apriori: no command given; see `apriori --help`"),
    }

    Ok(())
}
