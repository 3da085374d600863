//! Role repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::debug;

use super::RoleStore;
use crate::models::{Role, RoleId};

const INSERT_ROLE: &str = "INSERT INTO role (name) VALUES ($1) RETURNING id, name";
const SELECT_ROLE: &str = "SELECT id, name FROM role WHERE id = $1";
const DELETE_ROLE: &str = "DELETE FROM role WHERE id = $1";
const ROLE_EXISTS: &str = "SELECT EXISTS (SELECT 1 FROM role WHERE id = $1)";

/// Role repository
#[derive(Clone)]
pub struct RoleRepository {
    pool: PgPool,
}

impl RoleRepository {
    /// Create a new role repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleStore for RoleRepository {
    async fn add(&self, name: &str) -> DatabaseResult<Role> {
        debug!("role.add: {}", INSERT_ROLE);

        let role = sqlx::query_as::<_, Role>(INSERT_ROLE)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(role)
    }

    async fn get(&self, role_id: RoleId) -> DatabaseResult<Role> {
        debug!("role.get: {}", SELECT_ROLE);

        sqlx::query_as::<_, Role>(SELECT_ROLE)
            .bind(role_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(DatabaseError::RecordNotFound)
    }

    async fn delete(&self, role_id: RoleId) -> DatabaseResult<()> {
        debug!("role.delete: {}", DELETE_ROLE);

        let result = sqlx::query(DELETE_ROLE)
            .bind(role_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::RecordNotFound);
        }

        Ok(())
    }

    async fn is_role_exist(&self, role_id: RoleId) -> DatabaseResult<bool> {
        debug!("role.is_role_exist: {}", ROLE_EXISTS);

        let exists: bool = sqlx::query_scalar(ROLE_EXISTS)
            .bind(role_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}
