use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ledger_engine::cli::{handle_config, handle_replay, Commands};
use ledger_engine::config::{LedgerPaths, Settings};

#[derive(Parser)]
#[command(
    name = "ledger",
    author = "Kaylee Beyene",
    version,
    about = "In-memory ledger with referential integrity and budget rollups",
    long_about = "Replays account, category, transaction and budget commands against \
                  an in-memory ledger that blocks deletes with live dependents, cascades \
                  budget deletes to their expenses and keeps budget totals exact."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    match cli.command {
        Commands::Replay {
            script,
            strict,
            audit,
        } => handle_replay(&paths, &settings, script, strict, audit)?,
        Commands::Config => handle_config(&paths, &settings)?,
    }

    Ok(())
}
