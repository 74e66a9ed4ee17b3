//! Shared application state.
//!
//! Handlers only ever see repository trait objects; the concrete storage
//! backend is chosen at compile time via feature flags.

use std::sync::Arc;

use steeple_core::storage::{
    AttendanceRepository, CallingRepository, EventRepository, MemberRepository, ProgramRepository,
    UserRepository,
};

use crate::auth::SessionStore;
use crate::config::Config;

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "inmemory", feature = "sqlite"))]
compile_error!("Cannot enable both 'inmemory' and 'sqlite' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

/// Shared application state, cloned into every request handler.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventRepository>,
    pub members: Arc<dyn MemberRepository>,
    pub callings: Arc<dyn CallingRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub programs: Arc<dyn ProgramRepository>,
    pub users: Arc<dyn UserRepository>,
    pub sessions: SessionStore,
    pub config: Config,
}

impl AppState {
    fn build(
        events: Arc<dyn EventRepository>,
        members: Arc<dyn MemberRepository>,
        callings: Arc<dyn CallingRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        programs: Arc<dyn ProgramRepository>,
        users: Arc<dyn UserRepository>,
        config: Config,
    ) -> Self {
        let sessions = SessionStore::new(config.session_ttl());
        Self {
            events,
            members,
            callings,
            attendance,
            programs,
            users,
            sessions,
            config,
        }
    }

    /// Seeds the demo data set and returns the state. Safe to call on a
    /// store that already holds the demo admin; seeding is skipped then.
    pub async fn with_demo_data(self) -> Result<Self, anyhow::Error> {
        crate::demo_data::seed(&self).await?;
        Ok(self)
    }
}

#[cfg(feature = "inmemory")]
mod inmemory_backend {
    use super::*;
    use crate::storage::InMemoryRepository;

    impl AppState {
        /// Creates AppState backed by in-memory storage.
        pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(InMemoryRepository::new());

            Ok(Self::build(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo,
                config,
            ))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_backend {
    use super::*;
    use crate::storage::SqliteRepository;

    impl AppState {
        /// Creates AppState backed by SQLite storage. The database file and
        /// schema are created on first start.
        pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
            let repo = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            Ok(Self::build(
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo.clone(),
                repo,
                config,
            ))
        }
    }
}
