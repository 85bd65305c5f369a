// libs/doctor-cell/tests/schedule_service_test.rs

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::{to_bytes, Body},
    extract::{Path, State},
    http::{Request, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::handlers::*;
use doctor_cell::models::*;
use doctor_cell::router::schedule_routes;
use doctor_cell::services::schedule::ScheduleService;
use doctor_cell::services::store::{InMemoryScheduleStore, ScheduleStore};
use shared_config::AppConfig;
use shared_models::error::AppError;

const DOCTOR: &str = "doc-42";
const HOSPITAL: &str = "hosp-7";

fn service_with(store: Arc<InMemoryScheduleStore>, strict: bool) -> ScheduleService {
    let config = AppConfig {
        strict_schedule_save: strict,
        ..AppConfig::default()
    };
    ScheduleService::new(Arc::new(config), store)
}

fn test_state(store: Arc<InMemoryScheduleStore>) -> Arc<ScheduleState> {
    Arc::new(ScheduleState::new(Arc::new(AppConfig::default()), store))
}

fn path() -> Path<(String, String)> {
    Path((DOCTOR.to_string(), HOSPITAL.to_string()))
}

fn slots_request(weekday: &[&str], weekend: &[&str]) -> ScheduleSlotsRequest {
    ScheduleSlotsRequest {
        weekday: weekday.iter().map(|s| s.to_string()).collect(),
        weekend: weekend.iter().map(|s| s.to_string()).collect(),
    }
}

// ==============================================================================
// SERVICE
// ==============================================================================

#[tokio::test]
async fn test_load_schedule_heals_legacy_record() {
    let store = Arc::new(InMemoryScheduleStore::new());
    store
        .insert_raw(
            DOCTOR,
            HOSPITAL,
            json!({
                "doctor_id": DOCTOR,
                "hospital_id": HOSPITAL,
                "slot_weekday_1": "09:00:00-10:00:00",
                "slot_weekday_2": "11:00-12:00 AM",
                "slot_weekend_1": "3:00PM4:00PM",
                "slot_weekend_2": "garbage"
            }),
        )
        .await;
    let service = service_with(store, false);

    let schedule = service.load_schedule(DOCTOR, HOSPITAL).await.unwrap();

    assert_eq!(schedule.doctor_id.as_deref(), Some(DOCTOR));
    assert_eq!(schedule.weekday, vec!["9:00-10:00 AM", "11:00-12:00 PM"]);
    assert_eq!(schedule.weekend, vec!["3:00-4:00 PM"]);
    assert!(schedule.unrecognized.weekend.contains("garbage"));
}

#[tokio::test]
async fn test_load_schedule_ignores_other_hospital() {
    let store = Arc::new(InMemoryScheduleStore::new());
    store
        .insert_raw(
            DOCTOR,
            HOSPITAL,
            json!({
                "hospital_id": "somewhere-else",
                "weekly_schedule": {"weekday": ["9-10 AM"], "weekend": []}
            }),
        )
        .await;
    let service = service_with(store, false);

    let schedule = service.load_schedule(DOCTOR, HOSPITAL).await.unwrap();

    assert!(schedule.weekday.is_empty());
    assert!(schedule.weekend.is_empty());
}

#[tokio::test]
async fn test_load_schedule_without_record_is_empty() {
    let service = service_with(Arc::new(InMemoryScheduleStore::new()), false);

    let schedule = service.load_schedule(DOCTOR, HOSPITAL).await.unwrap();

    assert!(schedule.weekday.is_empty());
    assert!(schedule.unrecognized.is_empty());
}

#[tokio::test]
async fn test_replace_schedule_writes_canonical_record() {
    let store = Arc::new(InMemoryScheduleStore::new());
    let service = service_with(store.clone(), false);

    let saved = service
        .replace_schedule(
            DOCTOR,
            HOSPITAL,
            slots_request(&["13:00-14:00", "11:00-12:00 AM", "garbage"], &["9-10 AM"]).into(),
        )
        .await
        .unwrap();

    assert_eq!(
        saved.selection.labels(ScheduleCategory::Weekday),
        vec!["11:00-12:00 PM", "1:00-2:00 PM"]
    );
    assert!(saved.dropped.weekday.contains("garbage"));

    let record = store.fetch(DOCTOR, HOSPITAL).await.unwrap().unwrap();
    assert_eq!(record["hospital_id"], HOSPITAL);
    assert_eq!(
        record["weekly_schedule"]["weekday"],
        json!(["11:00-12:00 PM", "1:00-2:00 PM"])
    );
    assert_eq!(record["weekly_schedule"]["saturday"][0]["start"], "09:00:00");
}

#[tokio::test]
async fn test_strict_save_rejects_unrecognized_tokens() {
    let store = Arc::new(InMemoryScheduleStore::new());
    let service = service_with(store.clone(), true);

    let result = service
        .replace_schedule(DOCTOR, HOSPITAL, slots_request(&["9-10 AM", "whenever"], &[]).into())
        .await;

    assert_matches!(result, Err(ScheduleError::Validation(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_toggle_slot_twice_restores_schedule() {
    let store = Arc::new(InMemoryScheduleStore::new());
    let service = service_with(store.clone(), false);
    service
        .replace_schedule(DOCTOR, HOSPITAL, slots_request(&["2:00-3:00 PM"], &[]).into())
        .await
        .unwrap();

    let (on, saved) = service
        .toggle_slot(DOCTOR, HOSPITAL, ScheduleCategory::Weekday, "9:00AM-10:00AM")
        .await
        .unwrap();
    assert!(on.is_selected());
    assert_eq!(
        saved.selection.labels(ScheduleCategory::Weekday),
        vec!["9:00-10:00 AM", "2:00-3:00 PM"]
    );

    let (off, saved) = service
        .toggle_slot(DOCTOR, HOSPITAL, ScheduleCategory::Weekday, "09:00:00-10:00:00")
        .await
        .unwrap();
    assert!(!off.is_selected());
    assert_eq!(saved.selection.labels(ScheduleCategory::Weekday), vec!["2:00-3:00 PM"]);
    assert_eq!(store.len().await, 1);
}

async fn store_with_unreadable_weekday_token() -> Arc<InMemoryScheduleStore> {
    let store = Arc::new(InMemoryScheduleStore::new());
    store
        .insert_raw(
            DOCTOR,
            HOSPITAL,
            json!({
                "hospital_id": HOSPITAL,
                "weekly_schedule": {"weekday": ["9-10 AM", "8:30-9:30 AM"], "weekend": []}
            }),
        )
        .await;
    store
}

#[tokio::test]
async fn test_strict_toggle_keeps_unrecognized_stored_tokens() {
    let store = store_with_unreadable_weekday_token().await;
    let service = service_with(store.clone(), true);

    let result = service
        .toggle_slot(DOCTOR, HOSPITAL, ScheduleCategory::Weekday, "1:00-2:00 PM")
        .await;

    assert_matches!(result, Err(ScheduleError::Validation(ref msg)) if msg.contains("8:30-9:30 AM"));
    let record = store.fetch(DOCTOR, HOSPITAL).await.unwrap().unwrap();
    assert_eq!(record["weekly_schedule"]["weekday"], json!(["9-10 AM", "8:30-9:30 AM"]));
}

#[tokio::test]
async fn test_toggle_reports_unrecognized_stored_tokens_as_dropped() {
    let store = store_with_unreadable_weekday_token().await;
    let service = service_with(store.clone(), false);

    let (outcome, saved) = service
        .toggle_slot(DOCTOR, HOSPITAL, ScheduleCategory::Weekday, "1:00-2:00 PM")
        .await
        .unwrap();

    assert!(outcome.is_selected());
    assert_eq!(
        saved.selection.labels(ScheduleCategory::Weekday),
        vec!["9:00-10:00 AM", "1:00-2:00 PM"]
    );
    assert!(saved.dropped.weekday.contains("8:30-9:30 AM"));
    assert!(saved.dropped.weekend.is_empty());

    let response = saved.to_response(DOCTOR, HOSPITAL);
    assert!(response.unrecognized.weekday.contains("8:30-9:30 AM"));
}

#[tokio::test]
async fn test_blank_ids_are_rejected() {
    let service = service_with(Arc::new(InMemoryScheduleStore::new()), false);

    assert_matches!(
        service.load_schedule(" ", HOSPITAL).await,
        Err(ScheduleError::Validation(_))
    );
    assert_matches!(
        service
            .toggle_slot(DOCTOR, "", ScheduleCategory::Weekend, "9-10 AM")
            .await,
        Err(ScheduleError::Validation(_))
    );
    assert_matches!(
        service
            .toggle_slot(DOCTOR, HOSPITAL, ScheduleCategory::Weekend, "  ")
            .await,
        Err(ScheduleError::Validation(_))
    );
}

// ==============================================================================
// HANDLERS
// ==============================================================================

#[tokio::test]
async fn test_list_canonical_slots_handler() {
    let state = test_state(Arc::new(InMemoryScheduleStore::new()));

    let Json(body) = list_canonical_slots(State(state)).await.unwrap();

    assert_eq!(body["total"], 9);
    assert_eq!(body["labels"][2], "11:00-12:00 PM");
    assert_eq!(body["slots"][3]["start_hour"], 13);
}

#[tokio::test]
async fn test_normalize_token_handler() {
    let state = test_state(Arc::new(InMemoryScheduleStore::new()));

    let Json(body) = normalize_token(
        State(state.clone()),
        Json(NormalizeTokenRequest { token: "11:00 - 12:00 am".to_string() }),
    )
    .await
    .unwrap();

    assert_eq!(body["normalized"], "11:00-12:00PM");
    assert_eq!(body["slot"], "11:00-12:00 PM");
    assert_eq!(body["recognized"], true);

    let Json(body) = normalize_token(
        State(state.clone()),
        Json(NormalizeTokenRequest { token: "garbage".to_string() }),
    )
    .await
    .unwrap();
    assert_eq!(body["slot"], Value::Null);
    assert_eq!(body["recognized"], false);

    let result = normalize_token(
        State(state),
        Json(NormalizeTokenRequest { token: "   ".to_string() }),
    )
    .await;
    assert_matches!(result, Err(AppError::BadRequest(_)));
}

#[tokio::test]
async fn test_reconcile_slots_handler() {
    let state = test_state(Arc::new(InMemoryScheduleStore::new()));

    let Json(body) = reconcile_slots(
        State(state),
        Json(slots_request(
            &["09:00:00-10:00:00", "13:00:00-14:00:00", "11:00:00-12:00:00"],
            &["25:00-26:00"],
        )),
    )
    .await
    .unwrap();

    assert_eq!(body.weekday, vec!["9:00-10:00 AM", "11:00-12:00 PM", "1:00-2:00 PM"]);
    assert!(body.weekend.is_empty());
    assert!(body.unrecognized.weekend.contains("25:00-26:00"));
    assert!(body.doctor_id.is_none());
}

#[tokio::test]
async fn test_doctor_schedule_handlers() {
    let state = test_state(Arc::new(InMemoryScheduleStore::new()));

    let Json(saved) = replace_doctor_schedule(
        State(state.clone()),
        path(),
        Json(slots_request(&["4-5 PM"], &["10:00:00-11:00:00"])),
    )
    .await
    .unwrap();
    assert_eq!(saved.weekday, vec!["4:00-5:00 PM"]);
    assert_eq!(saved.weekend, vec!["10:00-11:00 AM"]);

    let Json(toggled) = toggle_doctor_slot(
        State(state.clone()),
        path(),
        Json(ToggleSlotRequest {
            category: ScheduleCategory::Weekend,
            slot: "10:00AM-11:00AM".to_string(),
        }),
    )
    .await
    .unwrap();
    assert_eq!(toggled["selected"], false);
    assert_eq!(toggled["category"], "weekend");

    let Json(loaded) = get_doctor_schedule(State(state), path()).await.unwrap();
    assert_eq!(loaded.weekday, vec!["4:00-5:00 PM"]);
    assert!(loaded.weekend.is_empty());
    assert_eq!(loaded.hospital_id.as_deref(), Some(HOSPITAL));
}

#[tokio::test]
async fn test_handler_maps_validation_error() {
    let state = test_state(Arc::new(InMemoryScheduleStore::new()));

    let result = get_doctor_schedule(
        State(state),
        Path((" ".to_string(), HOSPITAL.to_string())),
    )
    .await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

// ==============================================================================
// ROUTER
// ==============================================================================

#[tokio::test]
async fn test_schedule_routes_round_trip() {
    let app = schedule_routes(test_state(Arc::new(InMemoryScheduleStore::new())));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(format!("/{}/hospitals/{}/schedule", DOCTOR, HOSPITAL))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"weekday":["9:00AM-10:00AM"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/{}/hospitals/{}/schedule", DOCTOR, HOSPITAL))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["weekday"], json!(["9:00-10:00 AM"]));
}

#[tokio::test]
async fn test_unknown_category_is_rejected_by_extractor() {
    let app = schedule_routes(test_state(Arc::new(InMemoryScheduleStore::new())));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/{}/hospitals/{}/schedule/toggle", DOCTOR, HOSPITAL))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"category":"holiday","slot":"9-10 AM"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
