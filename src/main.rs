use clap::Parser;
use spamserve::config::ServiceConfig;
use spamserve::{inference, server, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init();

    let config = ServiceConfig::parse();
    let state = inference::resolve(&config.artifact_paths());
    tracing::info!(mode = ?state.mode(), "model state resolved");

    server::run(state, &config.host, config.port, config.body_limit()).await?;
    Ok(())
}
