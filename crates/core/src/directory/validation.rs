use uuid::Uuid;

use super::types::{Gender, NOTES_MAX_LEN};
use crate::validation::{is_valid_email, is_valid_phone, Validated};

/// Raw member form fields.
#[derive(Debug, Clone, Default)]
pub struct MemberInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
}

/// Trimmed member fields, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanMember {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Gender,
}

/// Validates the member form: names required (≤ 50 chars), email and phone
/// optional but shape-checked, gender falling back to `Unknown`.
pub fn validate_member_input(input: &MemberInput) -> Validated<CleanMember> {
    let mut errors = Vec::new();

    let first_name = input.first_name.trim().to_string();
    let last_name = input.last_name.trim().to_string();
    let email = input.email.trim().to_string();
    let phone = input.phone.trim().to_string();

    if first_name.is_empty() {
        errors.push("First name is required.".to_string());
    } else if first_name.len() > 50 {
        errors.push("First name must be 50 characters or fewer.".to_string());
    }

    if last_name.is_empty() {
        errors.push("Last name is required.".to_string());
    } else if last_name.len() > 50 {
        errors.push("Last name must be 50 characters or fewer.".to_string());
    }

    if !email.is_empty() && !is_valid_email(&email) {
        errors.push("Please enter a valid email address.".to_string());
    }

    if !phone.is_empty() && !is_valid_phone(&phone) {
        errors.push("Please enter a valid phone number.".to_string());
    }

    Validated {
        errors,
        cleaned: CleanMember {
            first_name,
            last_name,
            email: (!email.is_empty()).then(|| email.to_lowercase()),
            phone: (!phone.is_empty()).then_some(phone),
            gender: Gender::parse(&input.gender),
        },
    }
}

/// Raw calling form fields.
#[derive(Debug, Clone, Default)]
pub struct CallingInput {
    pub title: String,
    pub organization: String,
    pub member_id: String,
    pub notes: String,
    pub active: bool,
}

/// Trimmed calling fields, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanCalling {
    pub title: String,
    pub organization: String,
    pub member_id: Option<Uuid>,
    pub notes: String,
    pub active: bool,
}

/// Validates the calling form. Overlong notes are truncated rather than
/// rejected outright, but still reported.
pub fn validate_calling_input(input: &CallingInput) -> Validated<CleanCalling> {
    let mut errors = Vec::new();

    let title = input.title.trim().to_string();
    let organization = input.organization.trim().to_string();
    let raw_member = input.member_id.trim();
    let mut notes = input.notes.trim().to_string();

    if title.is_empty() {
        errors.push("Calling title is required.".to_string());
    } else if title.len() < 2 || title.len() > 100 {
        errors.push("Calling title must be between 2 and 100 characters.".to_string());
    }

    if organization.is_empty() {
        errors.push("Organization is required.".to_string());
    } else if organization.len() < 2 || organization.len() > 100 {
        errors.push("Organization must be between 2 and 100 characters.".to_string());
    }

    if notes.chars().count() > NOTES_MAX_LEN {
        errors.push("Notes must be 500 characters or fewer.".to_string());
        notes = notes.chars().take(NOTES_MAX_LEN).collect();
    }

    let member_id = if raw_member.is_empty() {
        None
    } else {
        match raw_member.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push("Invalid member selected.".to_string());
                None
            }
        }
    };

    Validated {
        errors,
        cleaned: CleanCalling {
            title,
            organization,
            member_id,
            notes,
            active: input.active,
        },
    }
}

/// Raw profile form fields (the subset of member fields a user edits).
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn validate_profile_input(input: &ProfileInput) -> Validated<CleanProfile> {
    let member = validate_member_input(&MemberInput {
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        gender: String::new(),
    });

    Validated {
        errors: member.errors,
        cleaned: CleanProfile {
            first_name: member.cleaned.first_name,
            last_name: member.cleaned.last_name,
            email: member.cleaned.email,
            phone: member.cleaned.phone,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_valid() {
        let result = validate_member_input(&MemberInput {
            first_name: " June ".to_string(),
            last_name: "Parker".to_string(),
            email: "June@Example.com".to_string(),
            phone: "555-1234".to_string(),
            gender: "female".to_string(),
        });
        assert!(result.is_ok(), "errors: {:?}", result.errors);
        assert_eq!(result.cleaned.first_name, "June");
        assert_eq!(result.cleaned.email.as_deref(), Some("june@example.com"));
        assert_eq!(result.cleaned.gender, Gender::Female);
    }

    #[test]
    fn test_member_names_required() {
        let result = validate_member_input(&MemberInput::default());
        assert_eq!(result.errors.len(), 2);
        assert_eq!(result.cleaned.gender, Gender::Unknown);
    }

    #[test]
    fn test_member_optional_fields_blank() {
        let result = validate_member_input(&MemberInput {
            first_name: "June".to_string(),
            last_name: "Parker".to_string(),
            ..Default::default()
        });
        assert!(result.is_ok());
        assert_eq!(result.cleaned.email, None);
        assert_eq!(result.cleaned.phone, None);
    }

    #[test]
    fn test_member_bad_email_and_phone() {
        let result = validate_member_input(&MemberInput {
            first_name: "June".to_string(),
            last_name: "Parker".to_string(),
            email: "nope".to_string(),
            phone: "abc".to_string(),
            gender: String::new(),
        });
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_calling_valid_with_member() {
        let id = Uuid::new_v4();
        let result = validate_calling_input(&CallingInput {
            title: "Ward Clerk".to_string(),
            organization: "Bishopric".to_string(),
            member_id: id.to_string(),
            notes: "Sustained in June".to_string(),
            active: true,
        });
        assert!(result.is_ok());
        assert_eq!(result.cleaned.member_id, Some(id));
    }

    #[test]
    fn test_calling_bad_member_id() {
        let result = validate_calling_input(&CallingInput {
            title: "Ward Clerk".to_string(),
            organization: "Bishopric".to_string(),
            member_id: "not-a-uuid".to_string(),
            notes: String::new(),
            active: false,
        });
        assert_eq!(result.errors, vec!["Invalid member selected.".to_string()]);
        assert_eq!(result.cleaned.member_id, None);
    }

    #[test]
    fn test_calling_notes_truncated() {
        let result = validate_calling_input(&CallingInput {
            title: "Ward Clerk".to_string(),
            organization: "Bishopric".to_string(),
            member_id: String::new(),
            notes: "n".repeat(600),
            active: true,
        });
        assert!(!result.is_ok());
        assert_eq!(result.cleaned.notes.len(), NOTES_MAX_LEN);
    }

    #[test]
    fn test_profile_reuses_member_rules() {
        let result = validate_profile_input(&ProfileInput {
            first_name: String::new(),
            last_name: "Parker".to_string(),
            email: "bad".to_string(),
            phone: String::new(),
        });
        assert_eq!(result.errors.len(), 2);
    }
}
