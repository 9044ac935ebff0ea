use std::sync::Arc;

use estate_chat::analysis::HttpAnalysisClient;
use estate_chat::config::Config;
use estate_chat::controller::InteractionController;
use estate_chat::session::{self, SessionError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), SessionError> {
    // Logs go to stderr; stdout is the conversation transcript.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("estate_chat=warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;
    let client = HttpAnalysisClient::new(config.endpoint.clone(), config.connect_timeout())?;
    tracing::info!(endpoint = client.endpoint(), "analysis client initialized");

    let controller = InteractionController::new(Arc::new(client));
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    session::run(controller, stdin, tokio::io::stdout(), config.export_dir).await
}
