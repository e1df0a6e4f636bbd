//! prefab-estimate
//!
//! Command-line front end and session API server for the estimate builder.

use anyhow::Result;
use clap::Parser;
use prefab_estimate::cli::run::{run_defaults, run_fields, run_payload, run_submit};
use prefab_estimate::cli::{Cli, Command};
use prefab_estimate::config::{Config, ConfigLoader, ConfigPaths};
use prefab_estimate::logging::{self, LogTarget};
use prefab_estimate::pricing::HttpPricingService;
use prefab_estimate::server::{SessionState, start_server};
use std::sync::Arc;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let paths = match &cli.config {
        Some(path) => ConfigPaths::with_file(path),
        None => ConfigPaths::discover(),
    };
    let mut loader = ConfigLoader::load_with_paths(paths)?;
    for (tier, path) in loader.sources() {
        debug!(%tier, path = ?path, "config tier applied");
    }

    // CLI flags override every tier
    let config = loader.config_mut();
    if let Some(endpoint) = &cli.endpoint {
        config.pricing.endpoint = endpoint.clone();
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    let config = loader.into_config();

    match cli.command {
        Command::Defaults => println!("{}", run_defaults()?),
        Command::Fields(args) => print!("{}", run_fields(&args)?),
        Command::Payload(args) => println!("{}", run_payload(&args)?),
        Command::Submit(args) => println!("{}", run_submit(&config.pricing, &args).await?),
        Command::Serve => run_server(config).await?,
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let service = Arc::new(HttpPricingService::new(&config.pricing));
    info!(endpoint = %service.endpoint(), "using pricing service");

    let state = SessionState::new(service);
    let (shutdown_tx, _addr) = start_server(state, &config.server.host, config.server.port).await?;

    tokio::signal::ctrl_c().await?;
    info!("Received interrupt, stopping");
    let _ = shutdown_tx.send(());

    Ok(())
}
