use crate::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Parses a level or a full `RUST_LOG` directive list such as
/// `remote_decode=debug,tower_http=info`.
pub fn env_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        Error::config(format!(
            "Invalid log filter '{}': {}. Use a level (error, warn, info, debug, trace) or target=level directives",
            directives, e
        ))
    })
}

/// Installs the global JSON subscriber.
pub fn init(directives: &str) -> Result<()> {
    let filter = env_filter(directives)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| Error::config(format!("Unable to install log subscriber: {}", e)))
}
