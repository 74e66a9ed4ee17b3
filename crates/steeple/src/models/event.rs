use serde::Deserialize;

use steeple_core::calendar::{Event, EventInput};

/// Raw event form payload, exactly as submitted.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EventForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub recurrence: String,
}

impl EventForm {
    pub fn as_input(&self) -> EventInput {
        EventInput {
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date.clone(),
            start_time: self.start_time.clone(),
            location: self.location.clone(),
            recurrence: self.recurrence.clone(),
        }
    }

    /// Prefills the form from a stored event, for the edit page.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            start_date: event.start_date.to_string(),
            start_time: event.time_label(),
            location: event.location.clone(),
            recurrence: event.recurrence.as_str().to_string(),
        }
    }
}
