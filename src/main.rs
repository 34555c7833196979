use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cashout_template_bot::bot::BotHandler;
use cashout_template_bot::config::{LogConfig, Settings};
use cashout_template_bot::discord;
use cashout_template_bot::error::AppError;
use cashout_template_bot::guild::{create_settings_backend, SettingsStore};
use cashout_template_bot::server::{create_app, AppState};
use cashout_template_bot::template::TemplateEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.log);
    tracing::info!("Configuration loaded");

    let (store, engine) = build_components(&settings)?;
    let bot = Arc::new(BotHandler::new(engine.clone(), store.clone()));
    tracing::info!(
        backend = store.backend_name(),
        guilds = store.guild_count(),
        "Bot state initialized"
    );

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    // Start ops server in background
    let server_handle = if settings.server.enabled {
        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr).await?;
        tracing::info!("Ops server listening on {}", addr);

        let app = create_app(AppState::new(store.clone(), engine.clone()));
        let mut shutdown_rx = shutdown_tx.subscribe();
        Some(tokio::spawn(async move {
            let result = axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.recv().await;
                })
                .await;
            if let Err(e) = result {
                tracing::error!(error = %e, "Ops server failed");
            }
        }))
    } else {
        None
    };

    // validate() guarantees the token is present
    let token = settings.discord_token().unwrap_or_default().to_string();
    let mut client = discord::build_client(&token, bot)
        .await
        .map_err(AppError::from)?;

    // Stop the gateway connection on Ctrl+C / SIGTERM
    let shard_manager = client.shard_manager.clone();
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        shutdown_signal_handler(signal_tx).await;
        shard_manager.shutdown_all().await;
    });

    tracing::info!("Connecting to Discord");
    let client_result = client.start().await.map_err(AppError::from);

    // The client may also stop on its own (e.g. invalid token)
    let _ = shutdown_tx.send(());
    if let Some(handle) = server_handle {
        let _ = handle.await;
    }

    if let Err(e) = store.flush() {
        tracing::error!(error = %e, "Failed to flush guild settings on shutdown");
    }
    tracing::info!("Bot shutdown complete");

    client_result?;
    Ok(())
}

fn build_components(
    settings: &Settings,
) -> Result<(Arc<SettingsStore>, Arc<TemplateEngine>), AppError> {
    let backend = create_settings_backend(&settings.storage);
    let store = Arc::new(SettingsStore::load(backend)?);
    let engine = Arc::new(TemplateEngine::new(store.clone())?);
    Ok((store, engine))
}

fn init_tracing(log: &LogConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if log.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal_handler(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }

    let _ = shutdown_tx.send(());
}
