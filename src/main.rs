//! Timer Deck - A state-managed HTTP server for countdown timers
//!
//! This is the main entry point for the timer-deck application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use timer_deck::{
    api::create_router,
    config::Config,
    services::{CommandNotifier, LogNotifier, Notifier},
    state::AppState,
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    tasks::BackgroundTasks,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("timer_deck={},tower_http=info", config.log_level()))
        .init();

    info!("Starting timer-deck server v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn KeyValueStore> = if config.in_memory {
        info!("Keeping data in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::new(&config.data_file);
        info!("Data file: {}", store.path().display());
        Arc::new(store)
    };

    let notifier: Arc<dyn Notifier> = match config
        .notify_command
        .as_deref()
        .and_then(CommandNotifier::from_command_line)
    {
        Some(command) => {
            info!("Alerts run {:?}", command);
            Arc::new(command)
        }
        None => Arc::new(LogNotifier),
    };

    // Create and hydrate application state
    let state = Arc::new(AppState::new(config.settings(), store, notifier));
    state.load().await;

    // Start the countdown supervisor and persistence writer
    let tasks = BackgroundTasks::spawn(&state);

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers                      - Timers grouped by category");
    info!("  POST   /timers                      - Add a timer");
    info!("  POST   /timers/:id/start|pause|reset - Control a timer");
    info!("  POST   /categories/:category/bulk   - Start, pause or reset a category");
    info!("  GET    /history                     - Completed timers");
    info!("  GET    /history/export              - History as JSON");
    info!("  GET    /preferences                 - Halfway alert preference");
    info!("  POST   /reset                       - Delete all data");
    info!("  GET    /status                      - Counts and uptime");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    tasks.abort();
    state.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}
