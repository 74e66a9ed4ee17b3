//! Sacrament programs: list, public view, admin editing, and PDF export.

use std::collections::HashMap;

use askama::Template;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use chrono::Local;
use uuid::Uuid;

use steeple_core::program::{
    render_program, DocElement, Program, RenderOptions, ResolvedProgram, ResolvedSpeaker,
};
use steeple_core::storage::{MemberQuery, MemberSort, RepositoryError};

use crate::auth::{AdminUser, CurrentUser};
use crate::error::AppError;
use crate::handlers::HtmlTemplate;
use crate::hymnal::HYMNS;
use crate::models::{NewProgramForm, ProgramEditForm};
use crate::pdf::PdfSink;
use crate::state::AppState;

/// Loads every member the program references and swaps the ids for records.
/// Dangling references simply resolve to `None`.
async fn resolve(state: &AppState, program: Program) -> Result<ResolvedProgram, AppError> {
    let ids = program.referenced_member_ids();
    let members: HashMap<Uuid, _> = state
        .members
        .get_members(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();

    let lookup = |id: Option<Uuid>| id.and_then(|id| members.get(&id).cloned());

    let speakers = program
        .speakers
        .iter()
        .cloned()
        .map(|speaker| ResolvedSpeaker {
            member: lookup(speaker.member_id),
            speaker,
        })
        .collect();

    Ok(ResolvedProgram {
        presiding: lookup(program.presiding),
        conducting: lookup(program.conducting),
        chorister: lookup(program.chorister),
        organist: lookup(program.organist),
        opening_prayer: lookup(program.opening_prayer),
        closing_prayer: lookup(program.closing_prayer),
        speakers,
        program,
    })
}

async fn load_program(state: &AppState, id: Uuid) -> Result<Program, AppError> {
    Ok(state
        .programs
        .get_program(id)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Program",
            id: id.to_string(),
        })?)
}

/// One row of the program list with leadership names resolved.
struct ProgramRow {
    program: Program,
    presiding: String,
    conducting: String,
}

#[derive(Template)]
#[template(path = "programs.html")]
struct ProgramListTemplate {
    rows: Vec<ProgramRow>,
}

/// Handler for the program list (GET /programs).
pub async fn list(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let programs = state.programs.list_programs().await?;

    let ids: Vec<Uuid> = programs
        .iter()
        .flat_map(|p| [p.presiding, p.conducting])
        .flatten()
        .collect();
    let names: HashMap<Uuid, String> = state
        .members
        .get_members(&ids)
        .await?
        .into_iter()
        .map(|m| (m.id, m.full_name()))
        .collect();

    let name_of = |id: Option<Uuid>| {
        id.and_then(|id| names.get(&id).cloned())
            .unwrap_or_else(|| "—".to_string())
    };

    let rows = programs
        .into_iter()
        .map(|program| ProgramRow {
            presiding: name_of(program.presiding),
            conducting: name_of(program.conducting),
            program,
        })
        .collect();

    Ok(HtmlTemplate(ProgramListTemplate { rows }))
}

/// One element of the rendered program, flattened for the show template.
struct ShowRow {
    kind: &'static str,
    text: String,
}

#[derive(Template)]
#[template(path = "program_show.html")]
struct ProgramShowTemplate {
    heading: String,
    program_id: String,
    rows: Vec<ShowRow>,
}

/// Handler for the public program view (GET /programs/{id}). The page is
/// built from the same element stream the PDF uses.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let program = load_program(&state, id).await?;
    let resolved = resolve(&state, program).await?;

    let mut elements: Vec<DocElement> = Vec::new();
    render_program(&resolved, &RenderOptions::default(), &mut elements);

    let rows = elements
        .into_iter()
        .filter_map(|element| match element {
            DocElement::Title(text) => Some(ShowRow { kind: "title", text }),
            DocElement::Centered(text) => Some(ShowRow {
                kind: "centered",
                text,
            }),
            DocElement::SectionHeader(text) => Some(ShowRow {
                kind: "header",
                text,
            }),
            DocElement::Line(text) => Some(ShowRow { kind: "line", text }),
            DocElement::Footer(text) => Some(ShowRow {
                kind: "footer",
                text,
            }),
            DocElement::Spacer => None,
        })
        .collect();

    Ok(HtmlTemplate(ProgramShowTemplate {
        heading: format!("Sacrament Meeting — {}", resolved.program.date),
        program_id: resolved.program.id.to_string(),
        rows,
    }))
}

/// Handler for program creation (POST /programs/new). Creates the program
/// (date defaulting to today) and sends the admin straight to the editor.
pub async fn create(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Form(form): Form<NewProgramForm>,
) -> Result<Redirect, AppError> {
    let today = Local::now().date_naive();
    let program = form.into_program(today, admin.id);

    state.programs.create_program(&program).await?;
    tracing::info!(program = %program.id, date = %program.date, "Program created");

    Ok(Redirect::to(&format!("/programs/{}/edit", program.id)))
}

/// A member option for the role dropdowns, pre-stringified for the template.
struct MemberOption {
    id: String,
    name: String,
}

/// One editable speaker row.
struct SpeakerRow {
    member_id: String,
    name: String,
    topic: String,
    order: String,
}

#[derive(Template)]
#[template(path = "program_form.html")]
struct ProgramFormTemplate {
    program_id: String,
    title: String,
    date: String,
    theme: String,
    presiding: String,
    conducting: String,
    chorister: String,
    organist: String,
    opening_prayer: String,
    closing_prayer: String,
    opening_hymn_number: String,
    opening_hymn_title: String,
    sacrament_hymn_number: String,
    sacrament_hymn_title: String,
    intermediate_hymn_number: String,
    intermediate_hymn_title: String,
    closing_hymn_number: String,
    closing_hymn_title: String,
    announcements: String,
    stake_business: String,
    ward_business: String,
    greeter: String,
    include_testimonies: bool,
    second_hour_type: String,
    second_hour_other_text: String,
    members: Vec<MemberOption>,
    speakers: Vec<SpeakerRow>,
    hymns: &'static [(&'static str, &'static str)],
}

/// Blank speaker rows offered beyond the existing ones.
const SPEAKER_ROWS: usize = 5;

fn id_string(id: Option<Uuid>) -> String {
    id.map(|id| id.to_string()).unwrap_or_default()
}

fn hymn_number(hymn: &Option<steeple_core::program::Hymn>) -> String {
    hymn.as_ref().map(|h| h.number.clone()).unwrap_or_default()
}

fn hymn_title(hymn: &Option<steeple_core::program::Hymn>) -> String {
    hymn.as_ref().map(|h| h.title.clone()).unwrap_or_default()
}

/// Handler for the program editor (GET /programs/{id}/edit).
pub async fn edit_form(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let program = load_program(&state, id).await?;

    let members = state
        .members
        .list_members(&MemberQuery::sorted(MemberSort::LastAsc))
        .await?
        .into_iter()
        .map(|m| MemberOption {
            id: m.id.to_string(),
            name: m.full_name(),
        })
        .collect();

    let mut speakers: Vec<SpeakerRow> = program
        .speakers
        .iter()
        .map(|s| SpeakerRow {
            member_id: id_string(s.member_id),
            name: s.other_name.clone().unwrap_or_default(),
            topic: s.topic.clone().unwrap_or_default(),
            order: s.order.map(|o| o.to_string()).unwrap_or_default(),
        })
        .collect();
    while speakers.len() < SPEAKER_ROWS {
        speakers.push(SpeakerRow {
            member_id: String::new(),
            name: String::new(),
            topic: String::new(),
            order: String::new(),
        });
    }

    Ok(HtmlTemplate(ProgramFormTemplate {
        program_id: program.id.to_string(),
        title: program.title.clone(),
        date: program.date.to_string(),
        theme: program.theme.clone().unwrap_or_default(),
        presiding: id_string(program.presiding),
        conducting: id_string(program.conducting),
        chorister: id_string(program.chorister),
        organist: id_string(program.organist),
        opening_prayer: id_string(program.opening_prayer),
        closing_prayer: id_string(program.closing_prayer),
        opening_hymn_number: hymn_number(&program.opening_hymn),
        opening_hymn_title: hymn_title(&program.opening_hymn),
        sacrament_hymn_number: hymn_number(&program.sacrament_hymn),
        sacrament_hymn_title: hymn_title(&program.sacrament_hymn),
        intermediate_hymn_number: hymn_number(&program.intermediate_hymn),
        intermediate_hymn_title: hymn_title(&program.intermediate_hymn),
        closing_hymn_number: hymn_number(&program.closing_hymn),
        closing_hymn_title: hymn_title(&program.closing_hymn),
        announcements: program.announcements.clone(),
        stake_business: program.stake_business.clone(),
        ward_business: program.ward_business.clone(),
        greeter: program.greeter.clone(),
        include_testimonies: program.include_bearing_of_testimonies,
        second_hour_type: program.second_hour_type.clone(),
        second_hour_other_text: program.second_hour_other_text.clone(),
        members,
        speakers,
        hymns: HYMNS,
    }))
}

/// Handler for program updates (POST /programs/{id}/edit).
pub async fn update(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<ProgramEditForm>,
) -> Result<Redirect, AppError> {
    let mut program = load_program(&state, id).await?;
    form.apply_to(&mut program);

    state.programs.update_program(&program).await?;
    tracing::info!(program = %program.id, "Program updated");

    Ok(Redirect::to(&format!("/programs/{id}")))
}

async fn pdf_response(
    state: &AppState,
    id: Uuid,
    options: RenderOptions,
) -> Result<Response, AppError> {
    let program = load_program(state, id).await?;
    let resolved = resolve(state, program).await?;

    let mut sink = PdfSink::new();
    render_program(&resolved, &options, &mut sink);
    let bytes = sink.finish()?;

    let suffix = if options.admin { "-admin" } else { "" };
    let filename = format!("program-{}{suffix}.pdf", resolved.program.date);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// Handler for the public PDF (GET /programs/{id}/pdf).
pub async fn pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    pdf_response(&state, id, RenderOptions { admin: false }).await
}

/// Handler for the admin PDF (GET /programs/{id}/admin-pdf).
pub async fn admin_pdf(
    AdminUser(_admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    pdf_response(&state, id, RenderOptions { admin: true }).await
}
