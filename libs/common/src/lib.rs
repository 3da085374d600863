//! Common library for the user service
//!
//! This crate provides shared database plumbing: connection pooling,
//! migrations, health checks and the persistence error taxonomy used by
//! every repository.
//!
//! ```rust,no_run
//! use common::database::{DatabaseConfig, init_pool, health_check};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig {
//!         database_url: std::env::var("DATABASE_URL")?,
//!         ..DatabaseConfig::default()
//!     };
//!     let pool = init_pool(&config).await?;
//!     let is_healthy = health_check(&pool).await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod database;
pub mod error;
