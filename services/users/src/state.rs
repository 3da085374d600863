//! Application state shared across handlers

use std::time::Duration;

use sqlx::PgPool;

use crate::services::UserService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_service: UserService,
    /// Deadline applied to every user operation
    pub request_timeout: Duration,
}
