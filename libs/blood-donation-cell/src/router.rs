use std::sync::Arc;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::handlers::{self, DonationState};

pub fn blood_donation_routes(state: Arc<DonationState>) -> Router {
    Router::new()
        .route("/donors", post(handlers::register_donor))
        .route("/donors/available", get(handlers::get_available_donors))
        .route("/requests", post(handlers::create_donation_request))
        .route("/requests/active", get(handlers::get_active_requests))
        .route("/requests/history", get(handlers::get_request_history))
        .route("/requests/{request_id}/status", patch(handlers::update_request_status))
        .with_state(state)
}
