use fyyur_db::AppState;
use fyyur_server::config::ServerConfig;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Database connection
    let db_config = fyyur_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = fyyur_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    fyyur_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let config = ServerConfig::from_env();
    if config.cors_origins.is_empty() {
        tracing::warn!("CORS_ORIGINS not set, allowing any origin");
    }

    let state = Arc::new(AppState {
        db,
        questions_per_page: config.questions_per_page,
    });
    let app = fyyur_server::build_router(state, fyyur_server::cors_layer(&config.cors_origins));

    tracing::info!(addr = %config.bind, "server started");
    axum::serve(
        tokio::net::TcpListener::bind(config.bind)
            .await
            .expect("failed to bind listen address"),
        app,
    )
    .await
    .expect("server error");
}
