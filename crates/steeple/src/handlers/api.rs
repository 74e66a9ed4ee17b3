//! The JSON API surface: a single member listing.

use axum::{extract::State, Json};

use steeple_core::directory::Member;
use steeple_core::storage::{MemberQuery, MemberSort};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Handler for GET /api/members: all members, sorted by last name.
pub async fn list_members(
    CurrentUser(_user): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Member>>, AppError> {
    let members = state
        .members
        .list_members(&MemberQuery::sorted(MemberSort::LastAsc))
        .await?;
    Ok(Json(members))
}
