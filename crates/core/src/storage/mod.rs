//! Storage abstractions.
//!
//! The repository traits here are implemented by the application crate's
//! backends (in-memory by default, SQLite behind a feature flag). Handlers
//! only ever see `Arc<dyn …Repository>` handles.

mod error;
mod traits;
mod types;

pub use error::{DateRangeError, RepositoryError, Result};
pub use traits::{
    AttendanceRepository, CallingRepository, EventRepository, MemberRepository, ProgramRepository,
    UserRepository,
};
pub use types::{DateRange, MemberQuery, MemberSort};
