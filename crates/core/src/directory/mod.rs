//! Ward directory: members, callings, attendance records, and login
//! accounts, plus the form validation for each.

mod types;
mod validation;

pub use types::{
    AttendanceRecord, Calling, Gender, MeetingType, Member, Role, User, NOTES_MAX_LEN,
};
pub use validation::{
    validate_calling_input, validate_member_input, validate_profile_input, CallingInput,
    CleanCalling, CleanMember, CleanProfile, MemberInput, ProfileInput,
};
