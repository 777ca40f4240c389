/// Cadence demo CLI
///
/// Drives the built-in scenarios so the runner's tick-by-tick behavior can be
/// watched from a terminal. Set RUST_LOG=cadence=trace to see every step.
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = cadence::cli::run_cli() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
