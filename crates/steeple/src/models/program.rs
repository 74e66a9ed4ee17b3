use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use steeple_core::program::{Hymn, Program, Speaker, DEFAULT_PROGRAM_TITLE, DEFAULT_SECOND_HOUR};
use steeple_core::serde::{deserialize_optional_date, deserialize_optional_string};

/// Optional fields on the "new program" form; everything else is filled in
/// on the edit page afterwards.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewProgramForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub theme: Option<String>,
}

impl NewProgramForm {
    /// Builds the empty program, defaulting the date to `today`.
    pub fn into_program(self, today: NaiveDate, created_by: Uuid) -> Program {
        let mut program = Program::new(self.date.unwrap_or(today));
        if !self.title.trim().is_empty() {
            program.title = self.title.trim().to_string();
        }
        program.theme = self.theme;
        program.created_by = Some(created_by);
        program
    }
}

/// The full program edit form. The speaker columns are parallel arrays
/// (one entry per table row); deserialized with `axum_extra::extract::Form`
/// so repeated field names collect into vectors.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProgramEditForm {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub theme: Option<String>,

    #[serde(default)]
    pub presiding: String,
    #[serde(default)]
    pub conducting: String,
    #[serde(default)]
    pub chorister: String,
    #[serde(default)]
    pub organist: String,

    #[serde(default)]
    pub opening_hymn_number: String,
    #[serde(default)]
    pub opening_hymn_title: String,
    #[serde(default)]
    pub sacrament_hymn_number: String,
    #[serde(default)]
    pub sacrament_hymn_title: String,
    #[serde(default)]
    pub intermediate_hymn_number: String,
    #[serde(default)]
    pub intermediate_hymn_title: String,
    #[serde(default)]
    pub closing_hymn_number: String,
    #[serde(default)]
    pub closing_hymn_title: String,

    #[serde(default)]
    pub opening_prayer: String,
    #[serde(default)]
    pub closing_prayer: String,

    #[serde(default)]
    pub speaker_member_id: Vec<String>,
    #[serde(default)]
    pub speaker_name: Vec<String>,
    #[serde(default)]
    pub speaker_topic: Vec<String>,
    #[serde(default)]
    pub speaker_order: Vec<String>,

    #[serde(default)]
    pub announcements: String,
    #[serde(default)]
    pub stake_business: String,
    #[serde(default)]
    pub ward_business: String,
    #[serde(default)]
    pub greeter: String,

    #[serde(default)]
    pub include_testimonies: Option<String>,

    #[serde(default)]
    pub second_hour_type: String,
    #[serde(default)]
    pub second_hour_other_text: String,
}

/// Empty member selections come through as "", never stored.
fn clean_id(value: &str) -> Option<Uuid> {
    value.trim().parse().ok()
}

fn clean_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl ProgramEditForm {
    /// Applies the submission to an existing program, preserving identity
    /// and creation metadata.
    pub fn apply_to(&self, program: &mut Program) {
        let title = self.title.trim();
        program.title = if title.is_empty() {
            DEFAULT_PROGRAM_TITLE.to_string()
        } else {
            title.to_string()
        };
        if let Some(date) = self.date {
            program.date = date;
        }
        program.theme = self.theme.clone();

        program.presiding = clean_id(&self.presiding);
        program.conducting = clean_id(&self.conducting);
        program.chorister = clean_id(&self.chorister);
        program.organist = clean_id(&self.organist);

        program.opening_hymn = Hymn::from_form(&self.opening_hymn_number, &self.opening_hymn_title);
        program.sacrament_hymn =
            Hymn::from_form(&self.sacrament_hymn_number, &self.sacrament_hymn_title);
        program.intermediate_hymn = Hymn::from_form(
            &self.intermediate_hymn_number,
            &self.intermediate_hymn_title,
        );
        program.closing_hymn = Hymn::from_form(&self.closing_hymn_number, &self.closing_hymn_title);

        program.opening_prayer = clean_id(&self.opening_prayer);
        program.closing_prayer = clean_id(&self.closing_prayer);

        program.speakers = self.speakers();

        program.announcements = self.announcements.trim().to_string();
        program.stake_business = self.stake_business.trim().to_string();
        program.ward_business = self.ward_business.trim().to_string();
        program.greeter = self.greeter.trim().to_string();

        program.include_bearing_of_testimonies = self.include_testimonies.is_some();

        let second_hour = self.second_hour_type.trim();
        program.second_hour_type = if second_hour.is_empty() {
            DEFAULT_SECOND_HOUR.to_string()
        } else {
            second_hour.to_string()
        };
        program.second_hour_other_text = self.second_hour_other_text.trim().to_string();

        program.updated_at = Utc::now();
    }

    /// Zips the parallel speaker columns into speaker records. A row with
    /// no member, name, or topic is dropped; a missing or unparseable order
    /// defaults to the row's 1-based position.
    fn speakers(&self) -> Vec<Speaker> {
        let rows = self
            .speaker_member_id
            .len()
            .max(self.speaker_name.len())
            .max(self.speaker_topic.len())
            .max(self.speaker_order.len());

        let field = |values: &[String], i: usize| -> String {
            values.get(i).cloned().unwrap_or_default()
        };

        let mut speakers = Vec::new();
        for i in 0..rows {
            let member_id = clean_id(&field(&self.speaker_member_id, i));
            let other_name = clean_text(&field(&self.speaker_name, i));
            let topic = clean_text(&field(&self.speaker_topic, i));

            if member_id.is_none() && other_name.is_none() && topic.is_none() {
                continue;
            }

            let order = field(&self.speaker_order, i)
                .trim()
                .parse::<i32>()
                .unwrap_or((i + 1) as i32);

            speakers.push(Speaker {
                member_id,
                other_name,
                topic,
                order: Some(order),
            });
        }
        speakers
    }
}
