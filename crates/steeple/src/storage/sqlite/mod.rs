//! SQLite storage backend.
//!
//! Implements the repository traits with `rusqlite` for the synchronous
//! work and `tokio-rusqlite` for the async wrapping. The schema is created
//! on startup; program hymns and speakers are stored as JSON columns.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
