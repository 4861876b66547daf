use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use spatnav::Registry;
use spatnav_core::{NavConfig, Reentrancy};
use tracing_subscriber::EnvFilter;

use crate::error::Result;
use crate::report::replay;
use crate::scenario::Scenario;

#[derive(Debug, Parser)]
#[command(
    name = "spatnav-replay",
    about = "Replay scripted directional-navigation scenarios",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a scenario's steps and print the selection path.
    Run(RunArgs),

    /// Validate a scenario and list its navigable elements.
    Check(CheckArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Scenario JSON file.
    pub scenario: PathBuf,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Override the scenario's re-entrancy policy.
    #[arg(long)]
    pub reentrancy: Option<Reentrancy>,

    /// Also write the JSON report to this path.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Exit with status 3 unless the final selection is this element
    /// (`-` for none).
    #[arg(long)]
    pub expect: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckArgs {
    /// Scenario JSON file.
    pub scenario: PathBuf,
}

/// Install the stderr log subscriber, filtered by `SPATNAV_LOG`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("SPATNAV_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => run_scenario(args),
        Commands::Check(args) => run_check(args),
    }
}

/// Scenario config, then `SPATNAV_*` environment, then command-line flags.
fn effective_config(scenario: &Scenario, reentrancy: Option<Reentrancy>) -> NavConfig {
    let mut config = scenario.config.clone().with_env_overrides();
    if let Some(policy) = reentrancy {
        config.reentrancy = policy;
    }
    config
}

fn run_scenario(args: RunArgs) -> Result<()> {
    let scenario = Scenario::from_path(&args.scenario)?;
    let config = effective_config(&scenario, args.reentrancy);
    let report = replay(&scenario, config)?;

    match args.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    if let Some(path) = &args.out {
        report.write_to_path(path)?;
    }
    if let Some(expected) = &args.expect {
        report.expect_final(expected)?;
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    let scenario = Scenario::from_path(&args.scenario)?;
    effective_config(&scenario, None).validate()?;
    let doc = scenario.build()?;
    let elements = Registry::new(&doc).enumerate(None);

    println!(
        "ok: {} elements, {} navigable, {} steps",
        scenario.elements.len(),
        elements.len(),
        scenario.steps.len()
    );
    for element in elements {
        let label = doc
            .name_of(element.id)
            .map_or_else(|| element.id.to_string(), ToString::to_string);
        println!("  {label}");
    }
    Ok(())
}
