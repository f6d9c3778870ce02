use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};
use u_domset::cli::Session;
use u_domset::logging::{setup_logging, should_use_json};
use u_domset::report::ResultReporter;

#[derive(Parser)]
#[command(name = "u-domset")]
#[command(author, version, about = "Evolutionary search for small dominating sets", long_about = None)]
struct Cli {
    /// Seed for graph generation and evolution (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for reports, fitness CSVs and the run summary
    #[arg(short, long, default_value = "results")]
    output_dir: PathBuf,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output logs in JSON format
    #[arg(long)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_json = cli.log_json || should_use_json();
    setup_logging(use_json, &cli.log_level).context("failed to install log subscriber")?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = ?cli.seed,
        output_dir = %cli.output_dir.display(),
        "u-domset starting"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(stdin.lock(), stdout.lock()).with_seed(cli.seed);

    match ResultReporter::new(&cli.output_dir) {
        Ok(reporter) => session = session.with_reporter(reporter),
        Err(e) => {
            error!(error = %e, "results will not be saved");
            eprintln!(
                "Cannot use output directory {}: {e}",
                cli.output_dir.display()
            );
        }
    }

    session.run().context("interactive session failed")?;
    Ok(())
}
