use anyhow::Context;
use clap::Parser;
use mule_gateway::utils::logger;
use mule_gateway::{build_handler, CliConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting mule-gateway replay");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let request = config
        .load_request()
        .context("failed to load the request to replay")?;

    let handler = build_handler(&config);
    let envelope = handler.handle(&request).await;

    println!("{}", serde_json::to_string_pretty(&envelope)?);

    if envelope.is_success() {
        tracing::info!("✅ Request answered with {}", envelope.status_code);
    } else {
        tracing::warn!("Request answered with {}", envelope.status_code);
        std::process::exit(1);
    }

    Ok(())
}
