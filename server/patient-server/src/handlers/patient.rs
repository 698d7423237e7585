//! Patient endpoints: HTML pages, the JSON API, and the lookups peer
//! services call. Handlers only translate between HTTP and
//! [`PatientService`](crate::services::PatientService).

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Response,
    Form, Json,
};
use database_layer::Patient;
use logger_redacted::{redacted_debug, PiiRedactor};
use serde_json::Value;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::forms::PatientForm;
use crate::server::PatientServer;

// ---- pages ----

pub async fn list(State(server): State<PatientServer>) -> ApiResult<Response> {
    info!("Patient list requested");
    let view = server.patients.list_page().await?;
    Ok(server.views.respond(view))
}

pub async fn add_form(State(server): State<PatientServer>) -> Response {
    info!("Add patient form requested");
    server.views.respond(server.patients.add_form())
}

pub async fn submit_add(
    State(server): State<PatientServer>,
    Form(form): Form<PatientForm>,
) -> ApiResult<Response> {
    info!("Add patient form submitted");
    let view = server.patients.submit_add(form.into_candidate()).await?;
    Ok(server.views.respond(view))
}

pub async fn view(
    State(server): State<PatientServer>,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    info!(id, "Patient page requested");
    let view = server.patients.view_page(id).await?;
    Ok(server.views.respond(view))
}

pub async fn update_form(
    State(server): State<PatientServer>,
    Path(id): Path<i32>,
) -> ApiResult<Response> {
    info!(id, "Update patient form requested");
    let view = server.patients.update_form(id).await?;
    Ok(server.views.respond(view))
}

pub async fn submit_update(
    State(server): State<PatientServer>,
    Path(id): Path<i32>,
    Form(form): Form<PatientForm>,
) -> ApiResult<Response> {
    info!(id, "Update patient form submitted");
    let view = server.patients.submit_update(id, form.into_candidate()).await?;
    Ok(server.views.respond(view))
}

// ---- JSON API ----

/// Unreadable bodies are reported like any other invalid record. Serde
/// errors can quote field values, so the log copy goes through the redactor.
fn invalid_payload(redactor: &PiiRedactor, rejection: JsonRejection) -> ApiError {
    let detail = rejection.body_text();
    redacted_debug!(redactor, "Unreadable patient payload: {}", detail);
    let mut fields = HashMap::new();
    fields.insert("body".to_string(), vec![detail]);
    ApiError::validation_with_fields("Invalid patient payload", fields)
}

pub async fn api_add(
    State(server): State<PatientServer>,
    payload: Result<Json<Patient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(candidate) = payload.map_err(|e| invalid_payload(&server.redactor, e))?;
    info!("API add");

    let (status, body) = server.patients.api_create(candidate).await?;
    Ok((status, Json(body)))
}

pub async fn api_get(
    State(server): State<PatientServer>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Value>> {
    info!(id, "API get");
    Ok(Json(server.patients.api_get(id).await?))
}

pub async fn api_update(
    State(server): State<PatientServer>,
    payload: Result<Json<Patient>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(candidate) = payload.map_err(|e| invalid_payload(&server.redactor, e))?;
    info!(id = ?candidate.patient_id, "API update");

    Ok(Json(server.patients.api_update(candidate).await?))
}

// ---- peer service lookups ----

/// Flat patient record, or `null` when the id is unknown.
pub async fn retro_get(
    State(server): State<PatientServer>,
    Path(id): Path<i32>,
) -> ApiResult<Json<Option<Patient>>> {
    info!(id, "Peer service patient lookup");
    Ok(Json(server.patients.lookup_for_peer(id).await?))
}

/// `{"<id>": "<given> <family>", ...}`, or `null` if the store's
/// projections disagree.
pub async fn retro_index(
    State(server): State<PatientServer>,
) -> ApiResult<Json<Option<BTreeMap<i32, String>>>> {
    info!("Peer service index lookup");
    Ok(Json(server.patients.build_index().await?))
}
