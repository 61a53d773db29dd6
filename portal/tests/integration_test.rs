//! Integration tests for SeaCollege Voice
//!
//! These tests drive the screens end to end against an on-disk store:
//! - Student intake through to the faculty dashboard
//! - Teacher registration and login
//! - Resolving complaints and the resulting notification
//! - AI analysis without credentials
//! - Persistence across restarts and the stored layout

use seacollege_voice::app::AppState;
use seacollege_voice::config::{COMPLAINTS_KEY, NOTIFICATION_TTL, TEACHERS_KEY};
use seacollege_voice::database::{create_pool, Branch, ComplaintStatus, Repository};
use seacollege_voice::services::AdvisorClient;
use seacollege_voice::views::{AuthMode, IntakePhase, RootView, Screen, StudentIntake, TeacherPortal};
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Helper to open the store in `dir` the way the application does
async fn open_state(dir: &Path) -> (AppState, Repository) {
    let pool = create_pool(&dir.join("portal.db")).await.unwrap();
    let repo = Repository::new(pool);
    let advisor = AdvisorClient::with_endpoint(None, String::new());

    (AppState::new(repo.clone(), advisor), repo)
}

async fn submit_complaint(state: &AppState, name: &str, branch: Branch, semester: u8, text: &str) {
    let mut intake = StudentIntake::with_submit_delay(state.clone(), Duration::ZERO);
    intake.set_name(name);
    intake.set_branch(branch);
    intake.set_semester(semester).unwrap();
    intake.set_description(text);

    intake.submit().await.unwrap();
    assert_eq!(intake.phase(), IntakePhase::Submitted);
}

async fn register(state: &AppState, name: &str, email: &str, password: &str) -> TeacherPortal {
    let mut portal = TeacherPortal::new(state.clone());
    portal.toggle_mode();
    assert_eq!(portal.mode(), AuthMode::Register);
    portal.form.name = name.to_string();
    portal.form.email = email.to_string();
    portal.form.password = password.to_string();

    portal.submit_auth().await.unwrap();
    portal
}

async fn login(state: &AppState, email: &str, password: &str) -> TeacherPortal {
    let mut portal = TeacherPortal::new(state.clone());
    portal.form.email = email.to_string();
    portal.form.password = password.to_string();

    portal.submit_auth().await.unwrap();
    portal
}

#[tokio::test]
async fn test_student_submission_reaches_dashboard() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;

    submit_complaint(&state, "Asha", Branch::Cse, 3, "Broken AC").await;

    let stored = state.complaints.list_complaints().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].student_name, "Asha");
    assert_eq!(stored[0].branch, Branch::Cse);
    assert_eq!(stored[0].semester, 3);
    assert_eq!(stored[0].status, ComplaintStatus::Pending);
    assert!(stored[0].photo_data_url.is_none());

    let portal = register(&state, "Anita", "anita@seacollege.edu", "x").await;
    let dashboard = portal.dashboard().unwrap();
    assert_eq!(dashboard.pending().len(), 1);
    assert_eq!(dashboard.pending()[0].description, "Broken AC");
}

#[tokio::test]
async fn test_invalid_submission_is_not_stored() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;

    let mut intake = StudentIntake::with_submit_delay(state.clone(), Duration::ZERO);
    intake.set_name("   ");
    intake.set_description("Leaking tap");

    assert!(intake.submit().await.is_err());
    assert_eq!(intake.phase(), IntakePhase::Editing);
    assert_eq!(intake.error(), Some("Please enter your name."));
    assert!(state.complaints.list_complaints().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_teacher_registration_and_login() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;

    let first = register(&state, "Anita", "a@seacollege.edu", "x").await;
    assert!(first.is_authenticated());

    // Same email again is refused and leaves one account
    let duplicate = register(&state, "Other", "a@seacollege.edu", "z").await;
    assert!(!duplicate.is_authenticated());
    assert!(duplicate.auth_error().is_some());
    assert_eq!(state.teachers.list_teachers().await.unwrap().len(), 1);

    let ok = login(&state, "a@seacollege.edu", "x").await;
    assert!(ok.is_authenticated());
    assert_eq!(ok.dashboard().unwrap().teacher().name, "Anita");

    let wrong = login(&state, "a@seacollege.edu", "y").await;
    assert!(!wrong.is_authenticated());
    assert!(wrong.auth_error().is_some());
}

#[tokio::test]
async fn test_registration_requires_college_email() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;

    let portal = register(&state, "Mallory", "mallory@gmail.com", "pw").await;

    assert!(!portal.is_authenticated());
    assert!(state.teachers.list_teachers().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_resolving_complaint_notifies_and_expires() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;
    submit_complaint(&state, "Asha", Branch::Cse, 3, "Broken AC").await;

    let mut portal = register(&state, "Anita", "a@seacollege.edu", "x").await;
    let dashboard = portal.dashboard_mut().unwrap();
    let id = dashboard.pending()[0].id.clone();

    dashboard.mark_solved(&id).await.unwrap();

    assert!(dashboard.pending().is_empty());
    let message = dashboard.notification().unwrap().message.clone();
    assert!(message.contains("Asha"));

    dashboard.dismiss_expired(Instant::now() + NOTIFICATION_TTL + Duration::from_millis(5));
    assert!(dashboard.notification().is_none());

    let stored = state.complaints.list_complaints().await.unwrap();
    assert_eq!(stored[0].status, ComplaintStatus::Solved);
}

#[tokio::test]
async fn test_analysis_without_credentials_stays_available() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;
    submit_complaint(&state, "Ravi", Branch::Me, 5, "Projector flickers").await;

    let mut portal = register(&state, "Anita", "a@seacollege.edu", "x").await;
    let dashboard = portal.dashboard_mut().unwrap();
    let id = dashboard.pending()[0].id.clone();

    dashboard.analyze(&id).await;

    assert!(dashboard.analysis(&id).is_none());
    assert!(!dashboard.is_analyzing(&id));
    assert!(dashboard.begin_analysis(&id).is_some());
}

#[tokio::test]
async fn test_logout_discards_session() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;
    submit_complaint(&state, "Asha", Branch::Cse, 3, "Broken AC").await;

    let mut portal = register(&state, "Anita", "a@seacollege.edu", "x").await;
    let first_session = portal.dashboard().unwrap().session();

    portal.logout();
    assert!(!portal.is_authenticated());
    assert_eq!(portal.mode(), AuthMode::Login);

    portal.form.email = "a@seacollege.edu".to_string();
    portal.form.password = "x".to_string();
    portal.submit_auth().await.unwrap();
    assert_ne!(portal.dashboard().unwrap().session(), first_session);
}

#[tokio::test]
async fn test_root_view_navigation() {
    let temp = TempDir::new().unwrap();
    let (state, _repo) = open_state(temp.path()).await;
    let mut root = RootView::new(state);

    root.open_student();
    assert!(matches!(root.screen(), Screen::Student(_)));

    // Teacher screen is only reachable from the start screen
    root.open_teacher();
    assert!(matches!(root.screen(), Screen::Student(_)));

    root.back();
    assert!(root.is_start());
    root.open_teacher();
    assert!(matches!(root.screen(), Screen::Teacher(_)));
}

#[tokio::test]
async fn test_data_survives_restart() {
    let temp = TempDir::new().unwrap();

    {
        let (state, _repo) = open_state(temp.path()).await;
        submit_complaint(&state, "Asha", Branch::Ce, 7, "Lab door jammed").await;
        register(&state, "Anita", "a@seacollege.edu", "x").await;
    }

    let (state, _repo) = open_state(temp.path()).await;
    let complaints = state.complaints.list_complaints().await.unwrap();
    assert_eq!(complaints.len(), 1);
    assert_eq!(complaints[0].description, "Lab door jammed");

    let portal = login(&state, "a@seacollege.edu", "x").await;
    assert!(portal.is_authenticated());
}

#[tokio::test]
async fn test_stored_layout() {
    let temp = TempDir::new().unwrap();
    let (state, repo) = open_state(temp.path()).await;
    submit_complaint(&state, "Asha", Branch::Cse, 3, "Broken AC").await;
    register(&state, "Anita", "a@seacollege.edu", "secret").await;

    let raw = repo.get_value(COMPLAINTS_KEY).await.unwrap().unwrap();
    let complaints: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let entry = &complaints[0];
    assert_eq!(entry["studentName"], "Asha");
    assert_eq!(entry["branch"], "Computer Science Engineering");
    assert_eq!(entry["semester"], 3);
    assert_eq!(entry["status"], "pending");
    assert!(entry["timestamp"].is_i64());
    assert!(entry.get("photoDataUrl").is_none());

    let raw = repo.get_value(TEACHERS_KEY).await.unwrap().unwrap();
    let teachers: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(teachers[0]["email"], "a@seacollege.edu");
    assert_ne!(teachers[0]["password"], "secret");
}
