pub mod paths;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{health, home, patient},
    server::PatientServer,
};

/// Create landing page and health check routes
pub fn general_routes() -> Router<PatientServer> {
    Router::new()
        .route(paths::HOME, get(home::home))
        .route(paths::HEALTH, get(health::health_check))
}

/// Create patient page routes
pub fn patient_page_routes() -> Router<PatientServer> {
    Router::new()
        .route(paths::patient::LIST, get(patient::list))
        .route(paths::patient::ADD, get(patient::add_form))
        .route(paths::patient::VALIDATE, post(patient::submit_add))
        .route(paths::patient::VIEW, get(patient::view))
        .route(
            paths::patient::UPDATE,
            get(patient::update_form).post(patient::submit_update),
        )
}

/// Create patient JSON API routes
pub fn patient_api_routes() -> Router<PatientServer> {
    Router::new()
        .route(paths::patient_api::ADD, post(patient::api_add))
        .route(paths::patient_api::GET, get(patient::api_get))
        .route(paths::patient_api::UPDATE, put(patient::api_update))
}

/// Create peer service lookup routes
///
/// The static `index` segment takes priority over the `:id` capture.
pub fn retro_routes() -> Router<PatientServer> {
    Router::new()
        .route(paths::retro::INDEX, get(patient::retro_index))
        .route(paths::retro::GET, get(patient::retro_get))
}

/// Create all routes
pub fn create_routes() -> Router<PatientServer> {
    Router::new()
        .merge(general_routes())
        .merge(patient_page_routes())
        .merge(patient_api_routes())
        .merge(retro_routes())
}
