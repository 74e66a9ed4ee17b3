//! Typed form payloads for the HTML forms, plus the assembly logic that
//! turns raw submissions into domain values.

mod attendance;
mod auth;
mod calling;
mod event;
mod member;
mod program;

pub use attendance::{AttendanceSheet, CheckinForm};
pub use auth::{LoginForm, PasswordForm, SignupForm};
pub use calling::CallingForm;
pub use event::EventForm;
pub use member::{MemberForm, ProfileForm};
pub use program::{NewProgramForm, ProgramEditForm};
