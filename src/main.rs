use ratekeeper::{config::Config, Data};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Starting with {:?}", config);

    // Store connection and settings scan are both fatal on failure
    let data = match Data::open(config).await {
        Ok(data) => data,
        Err(e) => {
            error!("Store startup failed: {}", e);
            return Err(e.into());
        }
    };

    {
        let settings = data.settings.read().await;
        let paused = settings.as_map().values().filter(|s| s.pause).count();
        info!(
            "Store ready: {} chats configured, {} paused, recent-message limit {}",
            settings.len(),
            paused,
            data.config.recent_messages_limit
        );
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    data.close()?;
    Ok(())
}
