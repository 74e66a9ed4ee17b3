//! Demo data seeded at startup.
//!
//! Gives a fresh deployment something to click through: an admin account,
//! a handful of members, events in the current month, and one filled-in
//! program. Seeding is skipped when the demo admin already exists.

use chrono::{Datelike, Local, NaiveDate, NaiveTime};

use steeple_core::calendar::{Event, Recurrence};
use steeple_core::directory::{Calling, Gender, Member, Role, User};
use steeple_core::program::{Hymn, Program, Speaker};

use crate::state::AppState;

pub const DEMO_ADMIN_EMAIL: &str = "admin@steeple.test";
const DEMO_ADMIN_PASSWORD: &str = "admin123";

/// A day in the current month, clamped so short months stay valid.
fn this_month(today: NaiveDate, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), day)
        .unwrap_or(today)
}

pub async fn seed(state: &AppState) -> Result<(), anyhow::Error> {
    if state
        .users
        .get_user_by_email(DEMO_ADMIN_EMAIL)
        .await?
        .is_some()
    {
        tracing::debug!("Demo data already present, skipping seed");
        return Ok(());
    }

    let today = Local::now().date_naive();

    let members = vec![
        Member::new("Ruth", "Allred")
            .with_gender(Gender::Female)
            .with_email("ruth.allred@example.com")
            .with_phone("801-555-0101"),
        Member::new("Marcus", "Bennett")
            .with_gender(Gender::Male)
            .with_email("marcus.bennett@example.com"),
        Member::new("Carol", "Dalton")
            .with_gender(Gender::Female)
            .with_phone("801-555-0144"),
        Member::new("Henry", "Dalton").with_gender(Gender::Male),
        Member::new("Alice", "Finch")
            .with_gender(Gender::Female)
            .with_email("alice.finch@example.com"),
        Member::new("Peter", "Call").with_gender(Gender::Male),
    ];
    for member in &members {
        state.members.create_member(member).await?;
    }

    let admin_member = Member::new("Ada", "Admin").with_email(DEMO_ADMIN_EMAIL);
    state.members.create_member(&admin_member).await?;

    let password_hash = bcrypt::hash(DEMO_ADMIN_PASSWORD, bcrypt::DEFAULT_COST)?;
    let admin = User::new(DEMO_ADMIN_EMAIL, password_hash)
        .with_role(Role::Admin)
        .with_member(admin_member.id);
    state.users.create_user(&admin).await?;

    let events = vec![
        Event::new("Sacrament Meeting", this_month(today, 7))
            .with_time(NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"))
            .with_location("Chapel")
            .with_recurrence(Recurrence::Weekly),
        Event::new("Ward Council", this_month(today, 14))
            .with_time(NaiveTime::from_hms_opt(7, 30, 0).expect("valid time"))
            .with_location("Clerk's office"),
        Event::new("Ward Activity Night", this_month(today, 21))
            .with_time(NaiveTime::from_hms_opt(18, 30, 0).expect("valid time"))
            .with_location("Cultural hall")
            .with_description("Dinner and games, everyone welcome."),
    ];
    for event in &events {
        state.events.create_event(event).await?;
    }

    let callings = vec![
        Calling::new("Ward Clerk", "Bishopric").with_member(members[1].id),
        Calling::new("Relief Society President", "Relief Society").with_member(members[0].id),
        Calling::new("Sunday School Teacher", "Sunday School").with_member(members[4].id),
    ];
    for calling in &callings {
        state.callings.create_calling(calling).await?;
    }

    let mut program = Program::new(this_month(today, 7));
    program.theme = Some("Gratitude".to_string());
    program.presiding = Some(members[1].id);
    program.conducting = Some(members[3].id);
    program.organist = Some(members[2].id);
    program.chorister = Some(members[0].id);
    program.opening_prayer = Some(members[4].id);
    program.closing_prayer = Some(members[5].id);
    program.opening_hymn = Some(Hymn {
        number: "2".to_string(),
        title: "The Spirit of God".to_string(),
    });
    program.sacrament_hymn = Some(Hymn {
        number: "169".to_string(),
        title: "As Now We Take the Sacrament".to_string(),
    });
    program.closing_hymn = Some(Hymn {
        number: "152".to_string(),
        title: "God Be with You Till We Meet Again".to_string(),
    });
    program.speakers = vec![
        Speaker {
            member_id: Some(members[0].id),
            topic: Some("Gratitude in trials".to_string()),
            order: Some(1),
            ..Default::default()
        },
        Speaker {
            other_name: Some("Brother Lee (Stake)".to_string()),
            topic: Some("Service".to_string()),
            order: Some(2),
            ..Default::default()
        },
    ];
    program.created_by = Some(admin.id);
    state.programs.create_program(&program).await?;

    tracing::info!(
        admin = DEMO_ADMIN_EMAIL,
        members = members.len() + 1,
        events = events.len(),
        "Seeded demo data"
    );
    Ok(())
}
