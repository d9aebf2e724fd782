use std::sync::Arc;

use tracing::{error, info, warn};

use pinbank::{Config, Database, FrankfurterClient, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    // Initialize logging
    if let Err(e) = pinbank::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        pinbank::logging::init_console_only(&config.logging.level);
    }

    info!("pinbank - PIN-based banking backend");

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }
    if config.uses_dev_secret() {
        warn!(
            "JWT_SECRET is not set; signing tokens with the built-in development secret. \
             Do not use this in production."
        );
    }

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!(path = %config.database.path, "Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let rates = match FrankfurterClient::from_config(&config.currency) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create exchange rate client: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db, Arc::new(rates)) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to configure web server: {}", e);
            std::process::exit(1);
        }
    };

    info!("Server configured on {}", server.addr());
    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }
}
