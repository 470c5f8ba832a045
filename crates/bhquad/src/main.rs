use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use bhquad::config::ScenarioConfig;

/// Run a 2-D Barnes-Hut N-body scenario and write the trajectory as JSON.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
struct CommandLineOptions {
    /// Scenario YAML file
    scenario: PathBuf,
    /// Output file; stdout when omitted
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Override the number of steps from the scenario
    #[clap(long)]
    steps: Option<usize>,
    #[clap(short, parse(from_occurrences))]
    verbosity: usize,
}

fn level_filter(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opts = CommandLineOptions::parse();
    TermLogger::init(
        level_filter(opts.verbosity),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    let scenario = ScenarioConfig::from_path(&opts.scenario)?;
    let steps = opts.steps.unwrap_or(scenario.steps);
    let mut simulation = scenario.build()?;
    info!(
        "loaded {} bodies from {}",
        simulation.bodies().len(),
        opts.scenario.display()
    );
    let config = simulation.config();
    info!(
        "{:?} gravity, theta {:?}, {:?} boundary, recording every {} steps",
        config.force.method, config.force.theta, config.boundary, config.record_every
    );

    let trajectory = simulation.run(steps)?;

    match &opts.output {
        Some(path) => trajectory.write_json(BufWriter::new(File::create(path)?))?,
        None => trajectory.write_json(io::stdout().lock())?,
    }
    Ok(())
}
