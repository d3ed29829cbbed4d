use axum::{Router, routing::get};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/slots", get(handlers::availability::get_free_slots))
        .route(
            "/api/slots/calendar",
            get(handlers::availability::get_available_days),
        )
}
