use anyhow::Context;
use clap::Parser;
use invoice_relay::server::{self, AppState};
use invoice_relay::utils::{logger, validation::Validate};
use invoice_relay::{AppConfig, CliConfig, IdleSupervisor, InvoicePipeline, SheetsApiStore};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose);

    tracing::info!("Starting invoice-relay");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = AppConfig::from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config))?;

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let store = SheetsApiStore::new(
        config.sheet.endpoint.clone(),
        config.sheet.worksheet.clone(),
        config.sheet.token.clone(),
    );
    let pipeline = InvoicePipeline::new(store, config.retry_policy());
    let supervisor = Arc::new(IdleSupervisor::new(
        config.idle_timeout(),
        config.idle_check_interval(),
    ));
    let state = Arc::new(AppState::new(pipeline, supervisor));

    let host: IpAddr = cli
        .host
        .parse()
        .with_context(|| format!("invalid host address: {}", cli.host))?;
    let addr = SocketAddr::new(host, cli.port);

    server::run(state, addr).await.context("server error")?;
    Ok(())
}
