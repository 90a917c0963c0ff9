use anyhow::Result;
use remote_decode::{config, logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration comes first; it carries the default log level
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = logging::init(&directives) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    info!(
        log_filter = %directives,
        port = config.server.port,
        "Starting remote-decode server"
    );

    server::run(config).await?;

    Ok(())
}
