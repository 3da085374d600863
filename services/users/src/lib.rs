//! User service
//!
//! Manages user accounts (create, get, partial update, soft delete) on top
//! of PostgreSQL. The [`services::UserService`] enforces the business rules
//! and the [`repositories`] hold all SQL.

use sqlx::migrate::Migrator;

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod shutdown;
pub mod state;

/// Schema migrations, embedded at build time from `migrations/`
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");
