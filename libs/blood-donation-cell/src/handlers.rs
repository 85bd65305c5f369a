use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    AvailableDonorsQuery, BloodGroup, CreateDonationRequest, DonationError, DonationRequestStatus,
    RegisterDonorRequest, RequestHistoryQuery, UpdateRequestStatusRequest,
};
use crate::services::registry::DonationRegistry;

#[derive(Debug, Default)]
pub struct DonationState {
    pub registry: RwLock<DonationRegistry>,
}

impl DonationState {
    pub fn new() -> Self {
        Self::default()
    }
}

fn donation_error(e: DonationError) -> AppError {
    match e {
        DonationError::RequestNotFound(_) | DonationError::DonorNotFound(_) => AppError::NotFound(e.to_string()),
        DonationError::InvalidStatusTransition { .. }
        | DonationError::ActiveRequestExists(_)
        | DonationError::DonorAlreadyRegistered(_) => AppError::Conflict(e.to_string()),
        DonationError::UnknownStatus(_) => AppError::BadRequest(e.to_string()),
        DonationError::Validation(msg) => AppError::ValidationError(msg),
    }
}

// ==============================================================================
// DONOR HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn register_donor(
    State(state): State<Arc<DonationState>>,
    Json(request): Json<RegisterDonorRequest>,
) -> Result<Json<Value>, AppError> {
    let donor = state
        .registry
        .write()
        .await
        .register_donor(request, Utc::now())
        .map_err(donation_error)?;

    Ok(Json(json!(donor)))
}

#[axum::debug_handler]
pub async fn get_available_donors(
    State(state): State<Arc<DonationState>>,
    Query(query): Query<AvailableDonorsQuery>,
) -> Result<Json<Value>, AppError> {
    let blood_group = match query.blood_group.as_deref() {
        Some(raw) => Some(raw.parse::<BloodGroup>().map_err(donation_error)?),
        None => None,
    };

    let registry = state.registry.read().await;
    let donors = registry.available_donors(blood_group);

    Ok(Json(json!({
        "donors": donors,
        "total": donors.len()
    })))
}

// ==============================================================================
// REQUEST HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn create_donation_request(
    State(state): State<Arc<DonationState>>,
    Json(request): Json<CreateDonationRequest>,
) -> Result<Json<Value>, AppError> {
    let created = state
        .registry
        .write()
        .await
        .create_request(request, Utc::now())
        .map_err(donation_error)?;

    Ok(Json(json!(created)))
}

#[axum::debug_handler]
pub async fn get_active_requests(
    State(state): State<Arc<DonationState>>,
) -> Result<Json<Value>, AppError> {
    let registry = state.registry.read().await;
    let requests = registry.active_requests();

    Ok(Json(json!({
        "requests": requests,
        "total": requests.len()
    })))
}

#[axum::debug_handler]
pub async fn get_request_history(
    State(state): State<Arc<DonationState>>,
    Query(query): Query<RequestHistoryQuery>,
) -> Result<Json<Value>, AppError> {
    let registry = state.registry.read().await;
    let requests = registry.request_history(query.donor_id.as_deref());

    Ok(Json(json!({
        "requests": requests,
        "total": requests.len()
    })))
}

#[axum::debug_handler]
pub async fn update_request_status(
    State(state): State<Arc<DonationState>>,
    Path(request_id): Path<Uuid>,
    Json(request): Json<UpdateRequestStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let new_status: DonationRequestStatus = request.status.parse().map_err(donation_error)?;

    let updated = state
        .registry
        .write()
        .await
        .transition_request(request_id, new_status, Utc::now())
        .map_err(donation_error)?;

    Ok(Json(json!(updated)))
}
