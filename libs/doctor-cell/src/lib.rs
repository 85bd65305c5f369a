pub mod handlers;
pub mod router;
pub mod models;
pub mod services;

pub use models::*;
pub use services::*;

pub use handlers::ScheduleState;
pub use router::schedule_routes;
