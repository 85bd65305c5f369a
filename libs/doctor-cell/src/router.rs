use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{self, ScheduleState};

pub fn schedule_routes(state: Arc<ScheduleState>) -> Router {
    // Stateless slot engine endpoints
    let engine_routes = Router::new()
        .route("/schedule/slots", get(handlers::list_canonical_slots))
        .route("/schedule/normalize", post(handlers::normalize_token))
        .route("/schedule/reconcile", post(handlers::reconcile_slots));

    // Per doctor, per hospital schedules
    let doctor_routes = Router::new()
        .route(
            "/{doctor_id}/hospitals/{hospital_id}/schedule",
            get(handlers::get_doctor_schedule).put(handlers::replace_doctor_schedule),
        )
        .route(
            "/{doctor_id}/hospitals/{hospital_id}/schedule/toggle",
            post(handlers::toggle_doctor_slot),
        );

    Router::new()
        .merge(engine_routes)
        .merge(doctor_routes)
        .with_state(state)
}
