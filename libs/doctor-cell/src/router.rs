use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::register_doctor))
        .route("/", get(handlers::list_doctors))
        .route("/options", get(handlers::list_doctor_options))
        .route("/{doctor_id}", get(handlers::get_doctor))
        .with_state(state)
}
