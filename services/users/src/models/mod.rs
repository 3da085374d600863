//! User service models

pub mod role;
pub mod user;

// Re-export for convenience
pub use role::{Role, RoleId};
pub use user::{CreateUser, UpdateUser, User};
