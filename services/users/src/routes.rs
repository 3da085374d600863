//! User service routes
//!
//! JSON rendition of the user RPCs: Create, Get, Update and Delete, plus a
//! health check.

use std::{future::Future, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{CreateUser, RoleId, UpdateUser, User},
    services::UserServiceResult,
    state::AppState,
};

/// Request for user creation
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role_id: RoleId,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            role_id: req.role_id,
        }
    }
}

/// Fields of an update; a missing or `null` field is left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserFields {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
}

impl From<UpdateUserFields> for UpdateUser {
    fn from(fields: UpdateUserFields) -> Self {
        Self {
            username: fields.username,
            email: fields.email,
            password: fields.password,
            role_id: fields.role_id,
        }
    }
}

/// Request for a partial user update
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub update_data: Option<UpdateUserFields>,
}

/// Public view of a user; the password never leaves the service
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role_id: user.role_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Response for user lookup
#[derive(Debug, Serialize)]
pub struct GetUserResponse {
    pub user: UserResponse,
}

/// Create the router for the user service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(create_user))
        .route(
            "/users/:username",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run a service call under the request deadline
async fn with_deadline<T>(
    timeout: Duration,
    call: impl Future<Output = UserServiceResult<T>>,
) -> ApiResult<T> {
    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| ApiError::Timeout)?
        .map_err(ApiError::from)
}

/// Health check endpoint; answers 503 while the database is unreachable
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    let (status, label) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(json!({
            "status": label,
            "service": "user-service",
            "database": database,
        })),
    )
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    info!("Create user request: {}", payload.username);

    let user = CreateUser::from(payload);
    with_deadline(state.request_timeout, state.user_service.create(&user)).await?;

    Ok((StatusCode::CREATED, Json(json!({}))))
}

/// Get a user by username
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = with_deadline(state.request_timeout, state.user_service.get(&username)).await?;

    Ok(Json(GetUserResponse {
        user: UserResponse::from(user),
    }))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let fields = payload
        .update_data
        .map(UpdateUser::from)
        .ok_or_else(|| ApiError::InvalidArgument("No data to update".to_string()))?;

    info!("Update user request: {}", username);

    with_deadline(
        state.request_timeout,
        state.user_service.update(&username, &fields),
    )
    .await?;

    Ok(Json(json!({})))
}

/// Delete a user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    info!("Delete user request: {}", username);

    with_deadline(state.request_timeout, state.user_service.delete(&username)).await?;

    Ok(Json(json!({})))
}
