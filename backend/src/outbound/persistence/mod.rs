//! PostgreSQL adapters for the storage ports, built on Diesel.
//!
//! Row structs and table definitions stay private to this module. Queries
//! run on `diesel-async` connections checked out of a `bb8` pool, and every
//! driver error is mapped to the port's own error type.
//!
//! ```ignore
//! use filmkritiken::outbound::persistence::{
//!     DbPool, DieselReviewRepository, PoolConfig, run_migrations,
//! };
//!
//! run_migrations("postgres://localhost/filmkritiken")?;
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/filmkritiken")).await?;
//! let reviews = DieselReviewRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_image_repository;
mod diesel_review_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_image_repository::DieselImageRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
