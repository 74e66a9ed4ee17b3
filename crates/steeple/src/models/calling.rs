use serde::Deserialize;

use steeple_core::directory::{Calling, CallingInput};

/// Raw calling form payload. `active` is a checkbox, absent when unchecked.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CallingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub member_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub active: Option<String>,
}

impl CallingForm {
    pub fn as_input(&self) -> CallingInput {
        CallingInput {
            title: self.title.clone(),
            organization: self.organization.clone(),
            member_id: self.member_id.clone(),
            notes: self.notes.clone(),
            active: self.active.is_some(),
        }
    }

    pub fn from_calling(calling: &Calling) -> Self {
        Self {
            title: calling.title.clone(),
            organization: calling.organization.clone(),
            member_id: calling
                .member_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            notes: calling.notes.clone(),
            active: calling.active.then(|| "on".to_string()),
        }
    }
}
