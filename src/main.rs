use anyhow::{Error, Result};
use tracing_subscriber::EnvFilter;
use visit_notifier::{api::run_api_server, config::Config};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("visit_notifier=info,tower_http=info")),
        )
        .init();

    run_api_server(config).await
}
