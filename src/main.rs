use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};

use parlor::{Config, Database, Lobby, Sweeper, SystemClock, WebServer};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    // Initialize logging
    if let Err(e) = parlor::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        parlor::logging::init_console_only(&config.logging.level);
    }

    info!("Parlor chat server");

    if let Err(e) = run(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> parlor::Result<()> {
    let mut lobby = Lobby::new(
        Arc::new(SystemClock),
        config.presence.ttl(),
        config.server.timezone.clone(),
    );

    if config.database.is_enabled() {
        let db = Database::open(&config.database.path).await?;
        lobby = lobby.with_database(db);
        let restored = lobby.restore_history().await?;
        info!(path = %config.database.path, restored, "Message log opened");
    }

    let lobby = Arc::new(lobby);

    let sweeper = Sweeper::new(Arc::clone(&lobby), config.presence.sweep_interval()).spawn();
    info!(
        ttl_secs = config.presence.ttl_secs,
        interval_secs = config.presence.sweep_interval_secs,
        "Presence sweeper started"
    );

    let server = WebServer::new(&config.server, lobby)?;
    let result = server.run(shutdown_signal()).await;

    sweeper.shutdown().await;
    info!("Parlor shut down");
    result
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
