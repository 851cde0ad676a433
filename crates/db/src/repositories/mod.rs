//! Repository implementations for [`PgStore`](crate::PgStore).
//!
//! Each module maps one family of tables between `SeaORM` models and core
//! domain types and implements the matching core trait.

mod batch;
mod claims;
mod directory;
mod intake;
mod invoice;
mod platform;
