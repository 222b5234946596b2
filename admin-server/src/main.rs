use admin_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env outside production) and logging
    let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
    if environment != "production" {
        dotenv::dotenv().ok();
    }
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    let log_json = std::env::var("LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    init_logger_with_file(log_level.as_deref(), log_json, log_dir.as_deref());

    tracing::info!("Admin server starting...");

    // 2. Configuration
    let config = Config::from_env()?;

    // 3. Server state (database, services)
    let state = ServerState::initialize(&config).await?;

    // 4. HTTP server (seeds development data and starts background tasks)
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
