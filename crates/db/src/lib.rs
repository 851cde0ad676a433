//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the billing tables
//! - [`PgStore`], implementing the core repository traits
//! - Database migrations

pub mod entities;
pub mod migration;
mod repositories;
mod store;

pub use store::PgStore;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Connects with the pool sizes from the configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(
    config: &billtrack_shared::config::DatabaseConfig,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
