use axum::{extract::State, response::Response};
use serde_json::{Map, Value};
use tracing::info;

use crate::server::PatientServer;
use crate::services::View;

/// Landing page linking the patient list and the history service.
pub async fn home(State(server): State<PatientServer>) -> Response {
    info!("Home page requested");

    let mut context = Map::new();
    context.insert("name".into(), Value::from(server.name()));
    context.insert(
        "urlNote".into(),
        Value::from(server.config.peers.history_url.as_str()),
    );

    server.views.respond(View::page("home", context))
}
