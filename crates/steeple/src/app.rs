use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        admin, api, attendance, calendar, callings, events, login, members, pages, profile,
        programs,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        // Public pages
        .route("/", get(pages::home))
        .route("/church-info", get(pages::church_info))
        .route("/events", get(calendar::month_view))
        // Admin event management
        .route("/events/admin", get(events::list).post(events::create))
        .route("/events/admin/new", get(events::new_form))
        .route("/events/admin/{id}", post(events::update))
        .route("/events/admin/{id}/edit", get(events::edit_form))
        .route("/events/admin/{id}/delete", post(events::delete))
        // Directory
        .route("/members", get(members::list).post(members::create))
        .route("/members/report", get(members::report))
        .route("/members/new", get(members::new_form))
        .route("/members/{id}", get(members::show).post(members::update))
        .route("/members/{id}/edit", get(members::edit_form))
        .route("/members/{id}/delete-confirm", get(members::delete_confirm))
        .route("/members/{id}/delete", post(members::delete))
        // Callings
        .route("/callings", get(callings::list).post(callings::create))
        .route("/callings/new", get(callings::new_form))
        .route("/callings/{id}", post(callings::update))
        .route("/callings/{id}/edit", get(callings::edit_form))
        .route("/callings/{id}/delete", post(callings::delete))
        // Attendance
        .route("/attendance", get(attendance::take).post(attendance::save))
        .route(
            "/attendance/checkin",
            get(attendance::checkin_page).post(attendance::checkin_save),
        )
        .route("/attendance/history", get(attendance::history))
        .route(
            "/attendance/history/{member_id}",
            get(attendance::member_history),
        )
        // Programs
        .route("/programs", get(programs::list))
        .route("/programs/new", post(programs::create))
        .route("/programs/{id}", get(programs::show))
        .route(
            "/programs/{id}/edit",
            get(programs::edit_form).post(programs::update),
        )
        .route("/programs/{id}/pdf", get(programs::pdf))
        .route("/programs/{id}/admin-pdf", get(programs::admin_pdf))
        // Profile
        .route("/profile", get(profile::show).post(profile::update))
        .route("/profile/password", post(profile::change_password))
        // Administration
        .route("/admin/users", get(admin::list))
        .route("/admin/users/{id}/role", post(admin::set_role))
        // Auth
        .route("/auth/login", get(login::login_page).post(login::login))
        .route("/auth/signup", get(login::signup_page).post(login::signup))
        .route("/auth/logout", post(login::logout))
        // JSON API
        .route("/api/members", get(api::list_members))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::{Local, NaiveDate};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use steeple_core::directory::{Member, Role, User};
    use steeple_core::program::Program;

    use crate::config::Config;

    async fn test_state() -> AppState {
        let mut config = Config::from_env();
        config.demo_data = false;
        AppState::new(config).await.unwrap()
    }

    /// Creates an account with a live session, returning its Cookie header
    /// value and the user. Uses the minimum bcrypt cost to keep tests fast.
    async fn login_as(state: &AppState, role: Role) -> (String, User) {
        let member = Member::new("Test", "User");
        state.members.create_member(&member).await.unwrap();

        let email = format!("{}@test.example", role.as_str());
        let hash = bcrypt::hash("password123", 4).unwrap();
        let user = User::new(email, hash).with_role(role).with_member(member.id);
        state.users.create_user(&user).await.unwrap();

        let session = state.sessions.create(user.id).await;
        let cookie = format!("{}={}", state.config.session_cookie, session.id);
        (cookie, user)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_home_page() {
        let app = create_app(test_state().await);

        let response = app.oneshot(get_request("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Steeple"));
        assert!(html.contains("Upcoming Events"));
    }

    #[tokio::test]
    async fn test_calendar_page_shows_month_grid() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(get_request("/events?year=2025&month=6"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("June 2025"));
        assert!(html.contains("Mon"));
    }

    #[tokio::test]
    async fn test_directory_requires_login() {
        let app = create_app(test_state().await);

        let response = app.oneshot(get_request("/members")).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(location.starts_with("/auth/login"));
    }

    #[tokio::test]
    async fn test_directory_renders_for_logged_in_member() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Member).await;
        let app = create_app(state);

        let response = app
            .oneshot(get_with_cookie("/members", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_pages_forbidden_for_members() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Member).await;
        let app = create_app(state);

        let response = app
            .oneshot(get_with_cookie("/events/admin", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_pages_render_for_admins() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let app = create_app(state);

        let response = app
            .oneshot(get_with_cookie("/events/admin", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let state = test_state().await;
        let hash = bcrypt::hash("hunter22", 4).unwrap();
        let user = User::new("sue@example.com", hash);
        state.users.create_user(&user).await.unwrap();
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(post_form(
                "/auth/login",
                "email=sue%40example.com&password=hunter22",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().contains_key(header::SET_COOKIE));

        let response = app
            .oneshot(post_form(
                "/auth/login",
                "email=sue%40example.com&password=wrong",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_signup_creates_linked_member() {
        let state = test_state().await;
        let app = create_app(state.clone());

        let response = app
            .oneshot(post_form(
                "/auth/signup",
                "first_name=June&last_name=Parker&email=june%40example.com\
                 &password=hunter22&confirm_password=hunter22",
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let user = state
            .users
            .get_user_by_email("june@example.com")
            .await
            .unwrap()
            .expect("account created");
        let member_id = user.member_id.expect("member linked");
        let member = state.members.get_member(member_id).await.unwrap().unwrap();
        assert_eq!(member.full_name(), "June Parker");
    }

    #[tokio::test]
    async fn test_duplicate_signup_rejected() {
        let state = test_state().await;
        let app = create_app(state);
        let body = "first_name=June&last_name=Parker&email=june%40example.com\
                    &password=hunter22&confirm_password=hunter22";

        let first = app.clone().oneshot(post_form("/auth/signup", body, None)).await.unwrap();
        assert_eq!(first.status(), StatusCode::SEE_OTHER);

        let second = app.oneshot(post_form("/auth/signup", body, None)).await.unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_program_pdf_headers() {
        let state = test_state().await;
        let program = Program::new(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        state.programs.create_program(&program).await.unwrap();
        let app = create_app(state);

        let response = app
            .oneshot(get_request(&format!("/programs/{}/pdf", program.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert_eq!(content_type, "application/pdf");

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("program-2025-06-08.pdf"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_admin_pdf_is_gated_and_labelled() {
        let state = test_state().await;
        let program = Program::new(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        state.programs.create_program(&program).await.unwrap();
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let app = create_app(state);

        let anonymous = app
            .clone()
            .oneshot(get_request(&format!("/programs/{}/admin-pdf", program.id)))
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(get_with_cookie(
                &format!("/programs/{}/admin-pdf", program.id),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(disposition.contains("program-2025-06-08-admin.pdf"));
    }

    #[tokio::test]
    async fn test_missing_program_is_404() {
        let app = create_app(test_state().await);

        let response = app
            .oneshot(get_request(
                "/programs/00000000-0000-0000-0000-000000000000/pdf",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_event_create_and_calendar_placement() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(post_form(
                "/events/admin",
                "title=Ward+Picnic&start_date=2025-06-20&start_time=18%3A30\
                 &location=Cultural+hall&description=&recurrence=none",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app
            .oneshot(get_request("/events?year=2025&month=6"))
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Ward Picnic"));
    }

    #[tokio::test]
    async fn test_event_form_validation_rerenders_at_400() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let app = create_app(state);

        let response = app
            .oneshot(post_form(
                "/events/admin",
                "title=&start_date=not-a-date",
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Event title is required."));
    }

    #[tokio::test]
    async fn test_attendance_bulk_save_upserts() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let member = Member::new("June", "Parker");
        state.members.create_member(&member).await.unwrap();
        let app = create_app(state.clone());

        let today = Local::now().date_naive();
        let body = format!(
            "date={today}&member_{id}=1&present_{id}=on&notes_{id}=visiting",
            id = member.id
        );
        let response = app
            .oneshot(post_form("/attendance", &body, Some(&cookie)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let record = state
            .attendance
            .get_record(member.id, today)
            .await
            .unwrap()
            .expect("record saved");
        assert!(record.present);
        assert_eq!(record.notes, "visiting");
    }

    #[tokio::test]
    async fn test_api_members_json() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Member).await;
        let app = create_app(state);

        let response = app
            .oneshot(get_with_cookie("/api/members", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let members: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["first_name"], "Test");
    }

    #[tokio::test]
    async fn test_program_edit_round_trip() {
        let state = test_state().await;
        let (cookie, _) = login_as(&state, Role::Admin).await;
        let program = Program::new(NaiveDate::from_ymd_opt(2025, 6, 8).unwrap());
        state.programs.create_program(&program).await.unwrap();
        let app = create_app(state.clone());

        let body = "title=Sacrament+Meeting&date=2025-06-08&theme=Gratitude\
                    &opening_hymn_number=2&opening_hymn_title=The+Spirit+of+God\
                    &speaker_name=Brother+Lee&speaker_topic=Faith&speaker_order=\
                    &speaker_name=&speaker_topic=&speaker_order=\
                    &second_hour_type=Sunday+School";
        let response = app
            .oneshot(post_form(
                &format!("/programs/{}/edit", program.id),
                body,
                Some(&cookie),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let saved = state
            .programs
            .get_program(program.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(saved.theme.as_deref(), Some("Gratitude"));
        assert_eq!(saved.speakers.len(), 1);
        assert_eq!(saved.speakers[0].other_name.as_deref(), Some("Brother Lee"));
        assert_eq!(saved.speakers[0].order, Some(1));
        assert!(saved.opening_hymn.is_some());
    }
}
