//! Storage backends implementing the `steeple_core` repository traits.
//!
//! The backend is chosen at compile time: `inmemory` (the default, also
//! used by every router test) or `sqlite`.

#[cfg(feature = "inmemory")]
mod inmemory;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
