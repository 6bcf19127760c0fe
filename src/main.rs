use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use orchestration_engine::api::{self, AppState, AuthSettings};
use orchestration_engine::config::{AllowedOrigins, AppConfig};
use orchestration_engine::infrastructure::definitions;
use orchestration_engine::infrastructure::events::PostgresEventRecorder;
use orchestration_engine::infrastructure::repositories::{PostgresUserRepository, PostgresWorkflowStore};
use orchestration_engine::infrastructure::HttpInvoker;
use orchestration_engine::orchestration::{self as core, StrategyExecutor, WorkerRegistry, WorkflowCoordinator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database connected and migrated");

    // Worker catalog
    let registry = match &config.generic_worker_url {
        Some(url) => WorkerRegistry::with_default_endpoint(url.clone()),
        None => WorkerRegistry::new(),
    };
    if let Some(dir) = &config.worker_definitions_dir {
        definitions::load_directory(dir, &registry);
    }

    // Orchestration core
    let executor = StrategyExecutor::new(Arc::new(registry), Arc::new(HttpInvoker::new()));
    let (dispatcher, queue) = core::channel();
    let coordinator = Arc::new(WorkflowCoordinator::new(
        Arc::new(PostgresWorkflowStore::new(pool.clone())),
        executor,
        Arc::new(dispatcher),
        Arc::new(PostgresEventRecorder::new(pool.clone())),
        config.task_timeout,
    ));
    let consumer = coordinator.spawn_consumer(queue);

    let state = AppState::new(
        coordinator,
        Arc::new(PostgresUserRepository::new(pool)),
        AuthSettings {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl: config.token_ttl,
        },
    );

    // Configure CORS
    let origins = match &config.allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(list) => {
            let parsed = list
                .iter()
                .map(|origin| origin.parse::<HeaderValue>())
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(parsed)
        }
    };
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state).layer(cors);

    // Start server
    tracing::info!("Server listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    consumer.abort();
    Ok(())
}
