use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::PgPool;
use tracing::{error, info};

use chat_api::{build_router, AppState, ChatService};
use chat_core::realtime::MessageBus;
use chat_core::repositories::{ConversationRepository, MessageRepository};
use chat_core::services::ConversationResolver;
use chat_infrastructure::{
    create_pool, run_migrations, BroadcastMessageBus, InMemoryConversationRepository,
    InMemoryMessageRepository, PgConversationRepository, PgMessageListener, PgMessageRepository,
};
use chat_shared::config::{AppConfig, StorageBackend};

const TOPIC_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    let _log_guard = chat_shared::telemetry::init_telemetry(&config.logging)?;

    info!("Chat Server starting ({} environment)...", config.app.env);

    let bus = Arc::new(BroadcastMessageBus::new(config.realtime.bus_capacity));

    let (conversations, messages, db): (
        Arc<dyn ConversationRepository>,
        Arc<dyn MessageRepository>,
        Option<PgPool>,
    ) = match config.storage.backend {
        StorageBackend::Postgres => {
            info!("Connecting to database...");
            let pool = create_pool(
                &config.database.url,
                config.database.max_connections,
                config.database.acquire_timeout_secs,
            )
            .await
            .context("database connection failed")?;
            run_migrations(&pool).await.context("database migration failed")?;
            info!("Database connection established.");

            PgMessageListener::new(
                pool.clone(),
                config.realtime.channel.clone(),
                bus.clone(),
                Duration::from_secs(config.realtime.reconnect_delay_secs),
            )
            .spawn();

            (
                Arc::new(PgConversationRepository::new(pool.clone())),
                Arc::new(PgMessageRepository::new(pool.clone())),
                Some(pool),
            )
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; messages are lost on restart");
            (
                Arc::new(InMemoryConversationRepository::new()),
                Arc::new(InMemoryMessageRepository::with_bus(bus.clone())),
                None,
            )
        }
    };

    // Drop broadcast topics left behind by closed streams
    let pruned_bus = bus.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOPIC_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = pruned_bus.prune_idle();
            if removed > 0 {
                info!("Pruned {} idle conversation topic(s)", removed);
            }
        }
    });

    let message_bus: Arc<dyn MessageBus> = bus.clone();
    let chat = ChatService::new(ConversationResolver::new(conversations), messages, message_bus);
    let app = build_router(AppState::new(Arc::new(chat), db));

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(bus))
        .await?;

    info!("Chat Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C and closes open message streams so SSE clients disconnect
async fn shutdown_signal(bus: Arc<BroadcastMessageBus>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
    bus.close();
}
