//! HTTP API tests
//!
//! Drive the full router in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use studytrack::api::{router, AppState};
use studytrack::db::Database;
use studytrack::storage::UploadStore;
use studytrack::types::LessonCatalog;

struct TestApp {
    router: Router,
    state: AppState,
    uploads: TempDir,
}

fn setup_app() -> TestApp {
    setup_app_with(Database::in_memory().unwrap())
}

fn setup_app_with(db: Database) -> TestApp {
    let uploads = tempdir().unwrap();
    let store = UploadStore::open(uploads.path()).unwrap();
    let lessons = LessonCatalog {
        first_semester: vec![json!("Ethics")],
        second_semester: vec![json!("Logic")],
    };
    let state = AppState::new(db, store, lessons);
    TestApp {
        router: router(state.clone()),
        state,
        uploads,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn post(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn delete(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

const BOUNDARY: &str = "studytrack-test-boundary";

fn multipart_upload(
    subject: &str,
    uploader: Option<&str>,
    name: &str,
    content: &str,
) -> Request<Body> {
    let mut body = String::new();
    body.push_str(&format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"subject\"\r\n\r\n{s}\r\n",
        b = BOUNDARY,
        s = subject
    ));
    if let Some(uploader) = uploader {
        body.push_str(&format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"uploader\"\r\n\r\n{u}\r\n",
            b = BOUNDARY,
            u = uploader
        ));
    }
    body.push_str(&format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{n}\"\r\nContent-Type: text/plain\r\n\r\n{c}\r\n--{b}--\r\n",
        b = BOUNDARY,
        n = name,
        c = content
    ));

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn wait_for_background_tasks(app: &TestApp) {
    let tasks = app.state.tasks();
    tasks.close();
    tasks.wait().await;
}

// =========================================================================
// Notes
// =========================================================================

#[tokio::test]
async fn test_create_note_and_list_by_subject() {
    let app = setup_app();

    let (status, created) = post(
        &app,
        "/notes",
        json!({"subject": "Ethics", "author": "ana", "content": "hi", "isPublic": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["id"].as_i64().unwrap() > 0);
    assert_eq!(created["isPublic"], json!(true));
    assert_eq!(created["comments"], json!([]));
    let created_at = created["createdAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(created_at).is_ok());

    let (status, notes) = get(&app, "/notes?subject=Ethics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notes, json!([created]));
}

#[tokio::test]
async fn test_create_note_missing_field_is_bad_request() {
    let app = setup_app();
    let missing_content = json!({"subject": "Ethics", "author": "ana"});
    let (status, body) = post(&app, "/notes", missing_content).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("content"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = setup_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/notes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_list_notes_requires_subject() {
    let app = setup_app();
    let (status, body) = get(&app, "/notes").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("subject"));
}

#[tokio::test]
async fn test_comment_then_delete_note() {
    let app = setup_app();

    let (_, note) = post(
        &app,
        "/notes",
        json!({"subject": "Ethics", "author": "ana", "content": "hi"}),
    )
    .await;
    assert_eq!(note["isPublic"], json!(false));
    let id = note["id"].as_i64().unwrap();

    let (status, comment) = post(
        &app,
        &format!("/notes/{}/comments", id),
        json!({"author": "bob", "content": "nice"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comment["noteId"], json!(id));

    let (_, notes) = get(&app, "/notes?subject=Ethics").await;
    assert_eq!(notes[0]["comments"], json!([comment]));

    let (status, body) = delete(&app, &format!("/notes/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, notes) = get(&app, "/notes?subject=Ethics").await;
    assert_eq!(notes, json!([]));
    let (_, comments) = get(&app, &format!("/notes/{}/comments", id)).await;
    assert_eq!(comments, json!([]));
}

#[tokio::test]
async fn test_invalid_path_id_is_bad_request() {
    let app = setup_app();
    let (status, body) = delete(&app, "/notes/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

// =========================================================================
// XP & reflections
// =========================================================================

#[tokio::test]
async fn test_get_xp_auto_creates_account() {
    let app = setup_app();

    let (status, body) = get(&app, "/xp?username=ana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], json!("ana"));
    assert_eq!(body["xp"], json!(0));
    assert_eq!(body["level"], json!(1));
    assert_eq!(body["streak"], json!(0));
    assert_eq!(body["last_login"], Value::Null);
    assert_eq!(body["autoCreated"], json!(true));

    let (_, body) = get(&app, "/xp?username=ana").await;
    assert_eq!(body["autoCreated"], json!(false));
}

#[tokio::test]
async fn test_add_xp_levels_up() {
    let app = setup_app();

    // Level-ups apply on the creating award too: 120 XP is level 2 with 20 xp,
    // not the {xp: 120, level: 1} of the no-level-on-create variant.
    let (status, body) = post(&app, "/xp/add", json!({"username": "bob", "amount": 120})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"username": "bob", "xp": 20, "level": 2}));

    let (_, body) = post(&app, "/xp/add", json!({"username": "bob", "amount": 85})).await;
    assert_eq!(body, json!({"username": "bob", "xp": 5, "level": 3}));

    let (_, history) = get(&app, "/xp/history?username=bob").await;
    let amounts: Vec<i64> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["amount"].as_i64().unwrap())
        .collect();
    assert_eq!(amounts, vec![85, 120]);
}

#[tokio::test]
async fn test_add_xp_requires_amount() {
    let app = setup_app();
    let (status, body) = post(&app, "/xp/add", json!({"username": "bob"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_reflection_awards_xp() {
    let app = setup_app();

    let (status, body) = post(
        &app,
        "/reflections",
        json!({"username": "ana", "subject": "Ethics", "content": "learned a lot", "mood": "happy"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isDeleted"], json!(false));
    assert_eq!(body["mood"], json!("happy"));
    assert_eq!(body["xp"], json!({"username": "ana", "xp": 15, "level": 1}));
    assert!(body.get("xpError").is_none());

    let (_, xp) = get(&app, "/xp?username=ana").await;
    assert_eq!(xp["xp"], json!(15));
}

#[tokio::test]
async fn test_reflection_kept_when_xp_award_fails() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("studytrack.db");
    let db = Database::open(&db_path).unwrap();

    // Every exp log insert aborts, so the XP transaction rolls back
    let side = rusqlite::Connection::open(&db_path).unwrap();
    side.execute_batch(
        "CREATE TRIGGER reject_xp BEFORE INSERT ON exp_log
         BEGIN SELECT RAISE(ABORT, 'xp ledger unavailable'); END;",
    )
    .unwrap();
    drop(side);

    let app = setup_app_with(db);
    let (status, body) = post(
        &app,
        "/reflections",
        json!({"username": "ana", "subject": "Ethics", "content": "still here"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].as_i64().unwrap() > 0);
    assert!(body.get("xp").is_none());
    let xp_error = body["xpError"].as_str().unwrap();
    assert!(xp_error.contains("xp ledger unavailable"), "{}", xp_error);

    let (status, listed) = get(&app, "/reflections?username=ana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["content"], json!("still here"));

    let (_, history) = get(&app, "/xp/history?username=ana").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_reflection_soft_delete_and_restore() {
    let app = setup_app();

    let (_, created) = post(
        &app,
        "/reflections",
        json!({"username": "ana", "subject": "Ethics", "content": "entry"}),
    )
    .await;
    let id = created["id"].clone();

    let (status, body) = post(&app, "/reflections/delete", json!({"id": id})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, listed) = get(&app, "/reflections?username=ana").await;
    assert_eq!(listed, json!([]));
    let (_, trash) = get(&app, "/reflections/deleted?username=ana").await;
    assert_eq!(trash.as_array().unwrap().len(), 1);

    let (status, _) = post(&app, "/reflections/restore", json!({"id": id})).await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = get(&app, "/reflections?username=ana").await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id);
    assert_eq!(listed[0]["content"], created["content"]);
    assert_eq!(listed[0]["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn test_restore_unknown_reflection_is_not_found() {
    let app = setup_app();
    let (status, body) = post(&app, "/reflections/restore", json!({"id": 404})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// =========================================================================
// Questions, answers & grades
// =========================================================================

#[tokio::test]
async fn test_question_answer_grade_flow() {
    let app = setup_app();

    let (status, q) = post(
        &app,
        "/questions",
        json!({"subject": "Ethics", "text": "What is virtue?", "createdBy": "instructor", "suggested": "A mean"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(q["suggestedAnswer"], json!("A mean"));
    let qid = q["id"].as_i64().unwrap();

    let (status, a) = post(
        &app,
        "/answers",
        json!({"questionId": qid, "answerText": "Habit", "answeredBy": "ana"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let aid = a["id"].as_i64().unwrap();

    let (status, g) = post(
        &app,
        "/grades",
        json!({"answerId": aid, "questionId": qid, "isCorrect": false, "gradedBy": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(g["gradedBy"], json!("0"));

    let (_, g2) = post(
        &app,
        "/grades",
        json!({"answerId": aid, "questionId": qid, "isCorrect": true, "gradedBy": 0, "feedback": "ok"}),
    )
    .await;

    let (_, grades) = get(&app, &format!("/grades?answerId={}", aid)).await;
    assert_eq!(grades, json!([g2]));

    let (_, answers) = get(&app, &format!("/answers?questionId={}", qid)).await;
    assert_eq!(answers, json!([a]));

    let (status, _) = delete(&app, &format!("/questions/{}", qid)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, questions) = get(&app, "/questions").await;
    assert_eq!(questions, json!([]));
    let (_, answers) = get(&app, &format!("/answers?questionId={}", qid)).await;
    assert_eq!(answers, json!([]));
    let (_, grades) = get(&app, &format!("/grades?answerId={}", aid)).await;
    assert_eq!(grades, json!([]));
}

#[tokio::test]
async fn test_grade_requires_grader() {
    let app = setup_app();
    let (status, body) = post(
        &app,
        "/grades",
        json!({"answerId": 1, "questionId": 1, "isCorrect": true, "gradedBy": null}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("gradedBy"));
}

// =========================================================================
// Progress & lessons
// =========================================================================

#[tokio::test]
async fn test_progress_upsert_over_http() {
    let app = setup_app();

    let (_, first) = post(
        &app,
        "/progress",
        json!({"username": "ana", "subject": "Ethics", "value": 10}),
    )
    .await;
    let (status, second) = post(
        &app,
        "/progress",
        json!({"username": "ana", "subject": "Ethics", "value": 70}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["value"], json!(70));

    let (_, rows) = get(&app, "/progress?username=ana").await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let (_, map) = get(&app, "/progress/map?username=ana").await;
    assert_eq!(map, json!({"Ethics": 70}));
}

#[tokio::test]
async fn test_lessons_catalog() {
    let app = setup_app();
    let (status, body) = get(&app, "/lessons").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"firstSemester": ["Ethics"], "secondSemester": ["Logic"]})
    );
}

// =========================================================================
// Files
// =========================================================================

#[tokio::test]
async fn test_upload_serve_and_delete_file() {
    let app = setup_app();

    let upload = multipart_upload("Ethics", Some("ana"), "notes.txt", "hello");
    let (status, file) = send(&app, upload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(file["originalName"], json!("notes.txt"));
    assert_eq!(file["uploader"], json!("ana"));
    let stored = file["storedPath"].as_str().unwrap().to_string();
    let stored_file = app.uploads.path().join(&stored);
    assert!(stored_file.exists());

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/uploads/{}", stored))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"hello");

    let (_, files) = get(&app, "/files?subject=Ethics").await;
    assert_eq!(files, json!([file.clone()]));

    let id = file["id"].as_i64().unwrap();
    let (status, body) = delete(&app, &format!("/files/{}?user=ana", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    wait_for_background_tasks(&app).await;
    assert!(!stored_file.exists());
    let (_, files) = get(&app, "/files?subject=Ethics").await;
    assert_eq!(files, json!([]));
}

#[tokio::test]
async fn test_upload_defaults_uploader() {
    let app = setup_app();
    let (status, file) = send(&app, multipart_upload("Ethics", None, "a.txt", "x")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(file["uploader"], json!("Unknown"));
}

#[tokio::test]
async fn test_delete_file_by_other_user_is_forbidden() {
    let app = setup_app();

    let upload = multipart_upload("Ethics", Some("ana"), "a.txt", "keep me");
    let (_, file) = send(&app, upload).await;
    let id = file["id"].as_i64().unwrap();
    let stored_file = app.uploads.path().join(file["storedPath"].as_str().unwrap());

    let (status, body) = delete(&app, &format!("/files/{}?user=bob", id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());

    wait_for_background_tasks(&app).await;
    assert!(stored_file.exists());
    let (_, files) = get(&app, "/files?subject=Ethics").await;
    assert_eq!(files.as_array().unwrap().len(), 1);

    let (status, _) = delete(&app, &format!("/files/{}?user=admin", id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_file_is_not_found() {
    let app = setup_app();
    let (status, _) = delete(&app, "/files/77?user=admin").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
