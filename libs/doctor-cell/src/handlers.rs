use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{
    NormalizeTokenRequest, RawSchedule, ScheduleError, ScheduleResponse, ScheduleSlotsRequest,
    ToggleSlotRequest,
};
use crate::services::{
    normalizer::normalize,
    reconciler::reconcile_schedule,
    schedule::ScheduleService,
    slots::canonical_slots,
    store::{InMemoryScheduleStore, ScheduleStore},
    matcher::SlotMatcher,
};

pub struct ScheduleState {
    pub service: ScheduleService,
}

impl ScheduleState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn ScheduleStore>) -> Self {
        Self {
            service: ScheduleService::new(config, store),
        }
    }

    pub fn in_memory(config: Arc<AppConfig>) -> Self {
        Self::new(config, Arc::new(InMemoryScheduleStore::new()))
    }
}

fn schedule_error(e: ScheduleError) -> AppError {
    match e {
        ScheduleError::InvalidSessionState { .. } => AppError::Conflict(e.to_string()),
        ScheduleError::Storage(msg) => AppError::Storage(msg),
        ScheduleError::Validation(msg) => AppError::ValidationError(msg),
    }
}

// ==============================================================================
// SLOT ENGINE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_canonical_slots(
    State(_state): State<Arc<ScheduleState>>,
) -> Result<Json<Value>, AppError> {
    let slots = canonical_slots();

    Ok(Json(json!({
        "slots": slots,
        "labels": slots.iter().map(|slot| slot.label).collect::<Vec<_>>(),
        "total": slots.len()
    })))
}

#[axum::debug_handler]
pub async fn normalize_token(
    State(_state): State<Arc<ScheduleState>>,
    Json(request): Json<NormalizeTokenRequest>,
) -> Result<Json<Value>, AppError> {
    if request.token.trim().is_empty() {
        return Err(AppError::BadRequest("Token must not be empty".to_string()));
    }

    let key = normalize(&request.token);
    let matched = SlotMatcher::canonical().match_with_strategy(&request.token);
    debug!("Normalized '{}' to '{}'", request.token, key);

    Ok(Json(json!({
        "token": request.token,
        "normalized": key,
        "slot": matched.map(|(slot, _)| slot.label),
        "strategy": matched.map(|(_, strategy)| strategy),
        "recognized": matched.is_some()
    })))
}

#[axum::debug_handler]
pub async fn reconcile_slots(
    State(_state): State<Arc<ScheduleState>>,
    Json(request): Json<ScheduleSlotsRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let raw = RawSchedule::from(request);
    let (selection, unrecognized) = reconcile_schedule(&raw);

    Ok(Json(ScheduleResponse::from_selection(&selection, unrecognized)))
}

// ==============================================================================
// DOCTOR SCHEDULE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(state): State<Arc<ScheduleState>>,
    Path((doctor_id, hospital_id)): Path<(String, String)>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let schedule = state
        .service
        .load_schedule(&doctor_id, &hospital_id)
        .await
        .map_err(schedule_error)?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn replace_doctor_schedule(
    State(state): State<Arc<ScheduleState>>,
    Path((doctor_id, hospital_id)): Path<(String, String)>,
    Json(request): Json<ScheduleSlotsRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let saved = state
        .service
        .replace_schedule(&doctor_id, &hospital_id, RawSchedule::from(request))
        .await
        .map_err(schedule_error)?;

    Ok(Json(saved.to_response(&doctor_id, &hospital_id)))
}

#[axum::debug_handler]
pub async fn toggle_doctor_slot(
    State(state): State<Arc<ScheduleState>>,
    Path((doctor_id, hospital_id)): Path<(String, String)>,
    Json(request): Json<ToggleSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let (outcome, saved) = state
        .service
        .toggle_slot(&doctor_id, &hospital_id, request.category, &request.slot)
        .await
        .map_err(schedule_error)?;

    Ok(Json(json!({
        "slot": request.slot,
        "category": request.category,
        "selected": outcome.is_selected(),
        "schedule": saved.to_response(&doctor_id, &hospital_id)
    })))
}
