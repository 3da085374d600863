//! Role model

use sqlx::FromRow;

/// Identifier of a row in the `role` table
pub type RoleId = i32;

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}
