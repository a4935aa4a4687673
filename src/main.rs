//! Smelter CLI entry point.

use anyhow::Result;
use clap::Parser;

use smelter::cli::{Cli, Commands};
use smelter::domain::models::Config;
use smelter::infrastructure::config::ConfigLoader;
use smelter::infrastructure::logging::{LogConfig, LoggerImpl};

fn load_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => smelter::cli::handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => smelter::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Analyze(args) => {
            smelter::cli::commands::analyze::execute(args, &config, cli.json).await
        }
        Commands::Format(args) => {
            smelter::cli::commands::format::execute(args, &config, cli.json).await
        }
        Commands::Settings(args) => smelter::cli::commands::settings::execute(args, cli.json),
        Commands::Discover(args) => smelter::cli::commands::discover::execute(args, cli.json),
    };

    if let Err(err) = result {
        smelter::cli::handle_error(err, cli.json);
    }
}
