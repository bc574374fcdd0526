use vault_edge::config::AppConfig;
use vault_edge::db::Database;
use vault_edge::events::{EventPublisher, EventRelay};

fn get_env() -> String {
    std::env::var("VAULTEDGE_ENV").unwrap_or_else(|_| "dev".to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = vault_edge::logging::init_logging(&config);

    tracing::info!("Starting VaultEdge backend in {} mode", env);

    let db = Database::connect(&config.postgres_url).await?;
    db.health_check().await?;

    let (events, relay_rx) = EventPublisher::channel();
    let relay = EventRelay::new(relay_rx, config.events.clone());
    tokio::spawn(relay.run());

    vault_edge::gateway::run_server(&config, db, events).await?;

    tracing::info!("Server closed");
    Ok(())
}
