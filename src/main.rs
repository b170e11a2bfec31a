use anyhow::{Context, Result};
use tracing::info;

use statebridge::bridge::BridgeManager;
use statebridge::config;
use statebridge::filter::EntityFilter;
use statebridge::hub::EventBus;
use statebridge::kafka::KafkaConnection;
use statebridge::routes::RouteTable;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statebridge=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "statebridge.toml".to_string());
    let config = config::load_config(&config_path)?;

    let global_filter =
        EntityFilter::from_config(&config.filter).context("Invalid global filter")?;
    let routes = RouteTable::from_config(&config.topics).context("Invalid topic filter")?;
    let connection = KafkaConnection::from_config(&config)?;

    let bus = EventBus::new(1024);
    let mut bridge = BridgeManager::new(connection, global_filter, routes);
    bridge.start(&bus).await?;

    info!("Bridge running, ctrl-c to stop");

    // Ctrl-c maps to the hub's stop event, which drains the run loop.
    let stop_bus = bus.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_bus.stop();
        }
    });

    bridge.run().await?;
    Ok(())
}
