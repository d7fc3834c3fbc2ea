//! HIIT Pro - An interval workout timer served over HTTP
//!
//! This is the main entry point for the hiit-pro application.

use std::sync::Arc;
use tokio::{net::TcpListener, sync::broadcast};
use tracing::info;

use hiit_pro::{
    api::create_router,
    config::Config,
    services::{CuePlayer, EventStreamSink, LogSink, TerminalBell},
    state::{app_state::EVENT_CAPACITY, AppState},
    storage::LocalStore,
    tasks::countdown_timer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("hiit_pro={},tower_http=info", config.log_level()))
        .init();

    info!("Starting hiit-pro server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, data_dir={}",
        config.host,
        config.port,
        config.data_dir.display()
    );

    let storage = LocalStore::open(&config.data_dir);
    let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);

    let mut cues = CuePlayer::new(config.cue_settings())
        .with_sink(EventStreamSink::new(event_tx.clone()))
        .with_sink(LogSink);
    if config.bell {
        cues = cues.with_sink(TerminalBell);
    }

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        storage,
        cues,
        event_tx,
    ));

    match state.settings() {
        Ok(settings) => info!(
            "Preferences: theme={:?}, wake_lock={:?}",
            settings.theme, settings.wake_lock
        ),
        Err(e) => tracing::warn!("Failed to read preferences: {}", e),
    }

    // Start the countdown driver
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_timer_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/hiit/start   - Start the fixed-round timer");
    info!("  POST /timer/custom/start - Start the custom workout");
    info!("  POST /timer/pause|resume|reset");
    info!("  /custom/intervals        - Edit the custom workout");
    info!("  /workouts                - Saved custom workouts");
    info!("  GET/PUT /settings, /cues - Preferences");
    info!("  GET  /status             - Current run and preferences");
    info!("  GET  /events             - Live run updates and cues");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
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

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
