use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use blood_donation_cell::{handlers::DonationState, router::blood_donation_routes};
use doctor_cell::{handlers::ScheduleState, router::schedule_routes};

pub fn create_router(schedule_state: Arc<ScheduleState>, donation_state: Arc<DonationState>) -> Router {
    Router::new()
        .route("/", get(|| async { "MediOps API is running!" }))
        .nest("/doctors", schedule_routes(schedule_state))
        .nest("/blood-donation", blood_donation_routes(donation_state))
}
