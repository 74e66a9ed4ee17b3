//! Core domain logic for the steeple congregation manager.
//!
//! Everything here is pure and I/O-free: entity types, form validation,
//! the calendar month-grid builder, the program document model and its
//! renderer, and the repository traits the application crate's storage
//! backends implement.

pub mod calendar;
pub mod directory;
pub mod program;
pub mod serde;
pub mod storage;
pub mod validation;
