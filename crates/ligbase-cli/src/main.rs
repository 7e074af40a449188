mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook
        .install()
        .map_err(|e| CliError::Other(anyhow::anyhow!("{e}")))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("ligbase CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let file_config = FileConfig::load(cli.config.as_deref())?;

    let command_result = match cli.command {
        Commands::Process(args) => {
            info!("Dispatching to 'process' command.");
            commands::process::run(args, &file_config)
        }
        Commands::Enhance(args) => {
            info!("Dispatching to 'enhance' command.");
            commands::enhance::run(args, &file_config)
        }
        Commands::Import(args) => {
            info!("Dispatching to 'import' command.");
            commands::import::run(args, &file_config)
        }
        Commands::Stats(args) => commands::stats::run(args, &file_config),
        Commands::Properties(args) => commands::properties::run(args, &file_config),
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}
