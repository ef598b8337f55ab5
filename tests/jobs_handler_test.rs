//! Integration tests for job handler routes
//!
//! Tests the API endpoints that feed the job queues and report on them:
//! - Export, import and maintenance submissions
//! - Rejection of absent work items
//! - Job status listing

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::json;
use tempfile::TempDir;
use tower::util::ServiceExt;

use health_tracker::handlers;
use health_tracker::jobs::{
    MealExport, PersonImport, PlannedMealExport, PlannedMealImport, PurgePlannedMeals,
    WeightMeasurementExport,
};
use health_tracker::state::AppState;
use health_tracker::test_utils::*;

/// Helper to create a test router with the API routes
fn create_test_router(state: &AppState) -> Router {
    Router::new()
        .nest("/api", handlers::api_routes())
        .with_state(state.clone())
}

/// Helper to parse JSON response body
async fn parse_json_response<T: serde::de::DeserializeOwned>(
    response: axum::response::Response,
) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = parse_json_response(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_export_request_is_queued_with_job_name() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json(
            "/api/export/weightmeasurement",
            json!({
                "person_id": 7,
                "from": null,
                "to": null,
                "file_name": "export.csv"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let queue = state.queues.get::<WeightMeasurementExport>().unwrap();
    assert_eq!(queue.len(), 1);

    let item = queue.dequeue().unwrap();
    assert_eq!(item.person_id, 7);
    assert_eq!(item.file_name, "export.csv");
    assert_eq!(item.job_name, "Weight Measurement Export");
}

#[tokio::test]
async fn test_submitted_job_name_is_replaced() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json(
            "/api/export/meal",
            json!({ "job_name": "Something Else", "file_name": "meals.csv" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let item = state.queues.get::<MealExport>().unwrap().dequeue().unwrap();
    assert_eq!(item.job_name, "Meal Export");
}

#[tokio::test]
async fn test_null_work_item_is_rejected() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(post_json("/api/import/person", serde_json::Value::Null))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.queues.get::<PersonImport>().unwrap().is_empty());
}

#[tokio::test]
async fn test_import_and_purge_requests_are_queued() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    let response = create_test_router(&state)
        .oneshot(post_json(
            "/api/import/person",
            json!({ "content": "\"FirstNames\"\n" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = create_test_router(&state)
        .oneshot(post_json(
            "/api/plannedmeals/purge",
            json!({ "person_id": 3, "cutoff": "2024-01-05T00:00:00" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let import = state.queues.get::<PersonImport>().unwrap().dequeue().unwrap();
    assert_eq!(import.content, "\"FirstNames\"\n");

    let purge = state
        .queues
        .get::<PurgePlannedMeals>()
        .unwrap()
        .dequeue()
        .unwrap();
    assert_eq!(purge.person_id, 3);
    assert_eq!(purge.cutoff, Some(timestamp("2024-01-05 00:00:00")));
    assert_eq!(purge.job_name, "Planned Meal Purge");
}

#[tokio::test]
async fn test_planned_meal_requests_are_queued() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    let response = create_test_router(&state)
        .oneshot(post_json(
            "/api/export/plannedmeal",
            json!({ "person_id": 2, "from": "2024-01-01T00:00:00", "file_name": "planned.csv" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = create_test_router(&state)
        .oneshot(post_json(
            "/api/import/plannedmeal",
            json!({ "content": "\"PersonId\",\"MealType\",\"Date\",\"Meal\"\n" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let export = state.queues.get::<PlannedMealExport>().unwrap().dequeue().unwrap();
    assert_eq!(export.person_id, 2);
    assert_eq!(export.from, Some(timestamp("2024-01-01 00:00:00")));
    assert_eq!(export.to, None);
    assert_eq!(export.job_name, "Planned Meal Export");

    let import = state.queues.get::<PlannedMealImport>().unwrap().dequeue().unwrap();
    assert_eq!(import.job_name, "Planned Meal Import");
}

#[tokio::test]
async fn test_list_job_statuses_empty() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(Request::builder().uri("/api/jobstatus").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_list_job_statuses_with_data() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;

    create_test_job_status(&state.db, "Person Export", "2024-01-01T10:00:00Z", Some("2024-01-01T10:01:00Z")).await;
    create_test_job_status(&state.db, "Meal Export", "2024-01-02T10:00:00Z", None).await;

    let app = create_test_router(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobstatus?from=2024-01-01T00:00:00Z&page=1&page_size=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = parse_json_response(response).await;
    let statuses = body.as_array().unwrap();
    assert_eq!(statuses.len(), 2);
    assert_eq!(statuses[0]["name"], "Meal Export");
    assert_eq!(statuses[0]["state"], "running");
    assert_eq!(statuses[1]["name"], "Person Export");
    assert_eq!(statuses[1]["state"], "succeeded");
    assert_eq!(statuses[1]["records_processed"], 0);
}

#[tokio::test]
async fn test_list_job_statuses_rejects_page_zero() {
    let dir = TempDir::new().unwrap();
    let state = setup_test_app_state(dir.path()).await;
    let app = create_test_router(&state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/jobstatus?page=0")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
