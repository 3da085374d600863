use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::database::{close_pool, health_check, init_pool, run_migrations};
use users::{
    MIGRATOR,
    config::AppConfig,
    repositories::{RoleRepository, UserRepository},
    routes,
    services::UserService,
    shutdown,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting user service");

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CONFIG_PATH").ok());
    let config = AppConfig::load(config_path.as_deref())?;

    // Initialize database connection pool
    let pool = init_pool(&config.database).await?;

    // Check database connectivity
    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool, &MIGRATOR).await?;

    // Wire repositories and the service once, up front
    let user_repository = Arc::new(UserRepository::new(pool.clone()));
    let role_repository = Arc::new(RoleRepository::new(pool.clone()));
    let user_service = UserService::new(user_repository, role_repository);

    let app_state = AppState {
        db_pool: pool.clone(),
        user_service,
        request_timeout: config.request_timeout,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!("User service listening on {}", config.http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::ctrl_c())
        .await?;

    info!("Shutting down user service");
    close_pool(pool).await;

    Ok(())
}
