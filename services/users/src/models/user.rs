//! User model and related payloads

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::RoleId;

/// User entity as persisted in the `"user"` table
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    #[sqlx(rename = "role")]
    pub role_id: RoleId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New user creation payload
///
/// `confirm_password` is only compared against `password` and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role_id: RoleId,
}

impl CreateUser {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

/// Partial user update
///
/// `None` leaves the column untouched. `Some` sets it, including
/// `Some(String::new())`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
}

impl UpdateUser {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.role_id.is_none()
    }
}
