use howdy_core::config::{ConfigSection, HowdyConfig};
use howdy_core::MessageProvider;

use howdy_server::layers;
use howdy_server::server::{self, ServerSettings};
use howdy_server::state::AppState;

#[tokio::main]
async fn main() {
    layers::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "howdy failed to start");
        std::process::exit(1);
    }
}

/// Read configuration once, construct the provider and the HTTP surface,
/// then serve until shutdown.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = HowdyConfig::load("dev")?;
    let provider = MessageProvider::from_config(&config)?;
    let settings = ServerSettings::from_config(&config)?;

    let state = AppState { provider };
    let router = server::build_router(state);

    let listener = server::bind(&settings.addr()).await?;
    server::serve_on(listener, router).await?;
    Ok(())
}
