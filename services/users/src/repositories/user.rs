//! User repository for database operations
//!
//! Users are soft deleted: every statement that reads or mutates a user
//! filters on `deleted_at IS NULL`, so a deleted username is both
//! not-found and available again.

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::UserStore;
use crate::models::{CreateUser, UpdateUser, User};

/// Inserts only when the referenced role exists, so a missing role shows up
/// as zero affected rows instead of a constraint error.
const INSERT_USER: &str = r#"INSERT INTO "user" (username, email, password, role)
SELECT $1, $2, $3, id FROM role WHERE id = $4"#;

const SELECT_USER: &str = r#"SELECT username, email, password, role, created_at, updated_at
FROM "user"
WHERE username = $1 AND deleted_at IS NULL
LIMIT 1"#;

const SOFT_DELETE_USER: &str = r#"UPDATE "user" SET deleted_at = now(), updated_at = now()
WHERE username = $1 AND deleted_at IS NULL"#;

const COUNT_USERNAME: &str =
    r#"SELECT COUNT(*) FROM "user" WHERE username = $1 AND deleted_at IS NULL"#;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Build the partial UPDATE for `fields`.
///
/// Only present fields land in the SET clause; `updated_at` is always
/// refreshed, so an empty update is still a write that must match a row.
pub(crate) fn build_update<'a>(
    username: &'a str,
    fields: &'a UpdateUser,
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(r#"UPDATE "user" SET "#);

    if let Some(new_username) = &fields.username {
        builder.push("username = ").push_bind(new_username).push(", ");
    }
    if let Some(email) = &fields.email {
        builder.push("email = ").push_bind(email).push(", ");
    }
    if let Some(password) = &fields.password {
        builder.push("password = ").push_bind(password).push(", ");
    }
    if let Some(role_id) = fields.role_id {
        builder.push("role = ").push_bind(role_id).push(", ");
    }

    builder
        .push("updated_at = now() WHERE username = ")
        .push_bind(username)
        .push(" AND deleted_at IS NULL");

    builder
}

#[async_trait]
impl UserStore for UserRepository {
    async fn add(&self, user: &CreateUser) -> DatabaseResult<()> {
        debug!("user.add: {}", INSERT_USER);

        let result = sqlx::query(INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password)
            .bind(user.role_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound);
        }

        Ok(())
    }

    async fn get(&self, username: &str) -> DatabaseResult<User> {
        debug!("user.get: {}", SELECT_USER);

        sqlx::query_as::<_, User>(SELECT_USER)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::RecordNotFound)
    }

    async fn update(&self, username: &str, fields: &UpdateUser) -> DatabaseResult<()> {
        if fields.is_empty() {
            debug!("user.update: no fields for {}, touching updated_at", username);
        }

        let mut builder = build_update(username, fields);
        debug!("user.update: {}", builder.sql());

        let result = builder.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound);
        }

        Ok(())
    }

    async fn delete(&self, username: &str) -> DatabaseResult<()> {
        debug!("user.delete: {}", SOFT_DELETE_USER);

        let result = sqlx::query(SOFT_DELETE_USER)
            .bind(username)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound);
        }

        Ok(())
    }

    async fn is_username_available(&self, username: &str) -> DatabaseResult<bool> {
        debug!("user.is_username_available: {}", COUNT_USERNAME);

        let count: i64 = sqlx::query_scalar(COUNT_USERNAME)
            .bind(username)
            .fetch_one(&self.pool)
            .await?;

        Ok(count == 0)
    }
}
