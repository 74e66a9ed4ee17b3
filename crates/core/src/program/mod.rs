//! Sacrament-meeting programs: the document model an admin edits and the
//! renderer that turns it into a printable element stream.

mod render;
mod types;

pub use render::{hymn_line, render_program, DocElement, DocumentSink, RenderOptions};
pub use types::{
    Hymn, Program, ResolvedProgram, ResolvedSpeaker, Speaker, SpeakerIdentity,
    DEFAULT_PROGRAM_TITLE, DEFAULT_SECOND_HOUR,
};
