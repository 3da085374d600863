//! Domain services

pub mod user;

pub use user::{UserService, UserServiceError, UserServiceResult};
