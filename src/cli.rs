use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::RunnerConfig;
use crate::resumable::{from_fn, sequence, wait_for, wait_ticks, Advance, Resumable, Yielded};
use crate::runner::Runner;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Cadence - tick-driven coroutine runner", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a built-in scenario for a number of ticks
    Demo {
        /// Scenario to run
        #[arg(value_enum, default_value = "counter")]
        scenario: Scenario,

        /// Number of update() calls to make
        #[arg(short = 't', long = "ticks", default_value = "10")]
        ticks: u64,
    },

    /// Print the effective runner configuration
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Two independent counters with different wait lengths
    Counter,
    /// A parent delegating to nested children
    Nested,
    /// One coroutine breaking the yield contract next to a healthy one
    Faulty,
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::parse_from(args);
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    let config = RunnerConfig::builder()
        .config_path(cli.config)
        .build()
        .context("Failed to load runner configuration")?;

    match cli.command {
        Commands::Demo { scenario, ticks } => run_demo(config, scenario, ticks),
        Commands::Config => {
            println!("{:#?}", config);
            Ok(())
        }
    }
}

/* ===================== Demo ===================== */

fn run_demo(config: RunnerConfig, scenario: Scenario, ticks: u64) -> Result<()> {
    let mut runner = Runner::with_config(config);

    match scenario {
        Scenario::Counter => {
            runner.start("fast", counting("fast", 5, 0), 0);
            runner.start("slow", counting("slow", 3, 2), 1);
        }
        Scenario::Nested => {
            let steps: Vec<Box<dyn Resumable>> = vec![
                Box::new(announce("child one")),
                Box::new(wait_ticks(2)),
                Box::new(announce("child two")),
            ];
            let parent = runner.start("parent", sequence(steps), 0);
            runner.start("follower", wait_for(parent), 0);
        }
        Scenario::Faulty => {
            runner.start("healthy", counting("healthy", 4, 0), 0);
            runner.start(
                "broken",
                from_fn(|| Advance::Suspended(Yielded::Str("not a wait".to_string()))),
                0,
            );
        }
    }

    for _ in 0..ticks {
        runner.update();
        println!(
            "-- tick {} ({} running, {} in table)",
            runner.tick(),
            runner.running_count(),
            runner.len()
        );
        for fault in runner.drain_faults() {
            println!("   fault [{}]: {}", fault.code(), fault);
        }
        if runner.is_empty() {
            println!("-- all coroutines finished");
            break;
        }
    }

    Ok(())
}

fn counting(label: &'static str, count: u32, wait: i64) -> impl Resumable {
    let mut n = 0;
    from_fn(move || {
        n += 1;
        println!("   {}: {}", label, n);
        if n < count {
            Advance::wait(wait)
        } else {
            Advance::Completed
        }
    })
}

fn announce(message: &'static str) -> impl Resumable {
    from_fn(move || {
        println!("   {}", message);
        Advance::Completed
    })
}
