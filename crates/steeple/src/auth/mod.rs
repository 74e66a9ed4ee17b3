//! Session-based authentication: the in-process session store and the
//! request extractors that gate handlers on login state and role.

mod extractors;
mod sessions;

pub use extractors::{AdminUser, CurrentUser, OptionalUser};
pub use sessions::{Session, SessionStore};
