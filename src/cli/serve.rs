use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::info;

use linkhub::daemon::Server;
use linkhub::infrastructure::config::AppConfig;
use linkhub::infrastructure::tracing::{TracingOutput, init_tracing};

/// Run the verification daemon in the foreground.
#[tokio::main]
pub async fn execute(config_path: &Path, verbose: bool, log_file: Option<PathBuf>) -> Result<()> {
    let output = match log_file {
        Some(path) => TracingOutput::File(path),
        None => TracingOutput::Stdout,
    };
    init_tracing(verbose, output);

    let config = AppConfig::load(config_path)?;
    info!(
        platform = %config.platform.domain,
        store = %config.store_path.display(),
        "starting linkhub daemon"
    );

    let server = Server::new(&config)?;
    server.run().await
}
