//! Repositories for database operations
//!
//! All SQL lives here. The service layer only sees the [`UserStore`] and
//! [`RoleStore`] seams, so it can be exercised against mocks.

use async_trait::async_trait;
use common::error::DatabaseResult;

use crate::models::{CreateUser, Role, RoleId, UpdateUser, User};

pub mod role;
pub mod user;

pub use role::RoleRepository;
pub use user::UserRepository;

/// Persistence operations on users
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with `RecordNotFound` when the role is missing.
    async fn add(&self, user: &CreateUser) -> DatabaseResult<()>;

    /// Fetch a non-deleted user by username
    async fn get(&self, username: &str) -> DatabaseResult<User>;

    /// Apply the present fields of `fields` and refresh `updated_at`
    async fn update(&self, username: &str, fields: &UpdateUser) -> DatabaseResult<()>;

    /// Soft delete a user
    async fn delete(&self, username: &str) -> DatabaseResult<()>;

    /// True when no non-deleted user holds `username`
    async fn is_username_available(&self, username: &str) -> DatabaseResult<bool>;
}

/// Persistence operations on roles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn add(&self, name: &str) -> DatabaseResult<Role>;

    async fn get(&self, role_id: RoleId) -> DatabaseResult<Role>;

    async fn delete(&self, role_id: RoleId) -> DatabaseResult<()>;

    /// Absence is `Ok(false)`, never an error
    async fn is_role_exist(&self, role_id: RoleId) -> DatabaseResult<bool>;
}
