//! SeaORM-backed implementation of the core persistence seam.

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{DatabaseConnection, DbErr};

use billtrack_core::store::StoreError;

/// Postgres store implementing every core repository trait.
///
/// Each trait method is one statement; nothing runs inside a transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pub(crate) db: DatabaseConnection,
}

impl PgStore {
    /// Create a new store over an open connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

pub(crate) fn db_err(err: DbErr) -> StoreError {
    StoreError::database(err.to_string())
}

/// Maps a failed update, turning "no row matched" into `NotFound`.
pub(crate) fn update_err(entity: &'static str, id: impl ToString) -> impl FnOnce(DbErr) -> StoreError {
    move |err| match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => StoreError::not_found(entity, id),
        other => db_err(other),
    }
}

/// Parses a status column, failing on values the core does not know.
pub(crate) fn parse_column<T>(
    column: &'static str,
    value: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, StoreError> {
    parse(value).ok_or_else(|| StoreError::database(format!("unknown {column} '{value}'")))
}

pub(crate) fn to_utc(value: DateTime<FixedOffset>) -> DateTime<Utc> {
    value.with_timezone(&Utc)
}
