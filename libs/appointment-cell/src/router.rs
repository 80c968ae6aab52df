use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/", get(handlers::list_appointments))
        .route("/{appointment_id}", delete(handlers::cancel_appointment))
        .with_state(state)
}
