//! Generic CRUD flows shared by every record type the registry serves.
//!
//! [`CrudService`] only sees a record through [`DomainElement`] and the
//! store through [`RecordStore`]; everything type-specific (routes, template
//! names, context keys) comes from an explicit [`EntityConfig`].

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use axum::http::StatusCode;
use database_layer::{DatabaseError, DomainElement, RecordStore};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, ApiResult};
use crate::validation::field_errors;

/// Template rendered for unknown ids.
pub const ERROR_TEMPLATE: &str = "error";

/// Names a record type uses for its routes, templates and view context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityConfig {
    /// Key of the canonical JSON wrapper, also the form context key.
    pub type_tag: String,
    /// Context key holding the list page's records.
    pub collection_key: String,
    /// Context key holding the record on the view page.
    pub current_key: String,
    pub list_template: String,
    pub add_template: String,
    pub view_template: String,
    pub update_template: String,
    /// Where successful form submissions redirect to.
    pub list_path: String,
}

impl EntityConfig {
    /// Layout used by the registry's record types: templates under
    /// `<tag>/`, records under `<tag>s` and `current<Tag>`, list at
    /// `/<tag>/list`.
    pub fn conventional(type_tag: &str) -> Self {
        let mut chars = type_tag.chars();
        let capitalised: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };

        Self {
            type_tag: type_tag.to_string(),
            collection_key: format!("{}s", type_tag),
            current_key: format!("current{}", capitalised),
            list_template: format!("{}/list", type_tag),
            add_template: format!("{}/add", type_tag),
            view_template: format!("{}/view", type_tag),
            update_template: format!("{}/update", type_tag),
            list_path: format!("/{}/list", type_tag),
        }
    }
}

/// Outcome of a form-facing flow.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Page {
        template: String,
        status: StatusCode,
        context: Map<String, Value>,
    },
    Redirect(String),
}

impl View {
    pub fn page(template: impl Into<String>, context: Map<String, Value>) -> Self {
        View::Page {
            template: template.into(),
            status: StatusCode::OK,
            context,
        }
    }

    pub fn not_found(type_tag: &str, id: i32) -> Self {
        let mut context = Map::new();
        context.insert("status".into(), Value::from(404));
        context.insert(
            "message".into(),
            Value::from(format!("No {} with id {}", type_tag, id)),
        );
        View::Page {
            template: ERROR_TEMPLATE.to_string(),
            status: StatusCode::NOT_FOUND,
            context,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            View::Page { status, .. } => *status,
            View::Redirect(_) => StatusCode::FOUND,
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError<E: fmt::Debug> {
    #[error("{} failed validation", field_list(.errors))]
    ValidationFailed {
        candidate: Box<E>,
        errors: ValidationErrors,
    },

    #[error("{entity} not found")]
    NotFound { entity: String, id: Option<i32> },

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

fn field_list(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = field_errors(errors).into_keys().collect();
    fields.sort();
    fields.join(", ")
}

impl<E: fmt::Debug> From<ServiceError<E>> for ApiError {
    fn from(error: ServiceError<E>) -> Self {
        match error {
            ServiceError::ValidationFailed { errors, .. } => ApiError::from(errors),
            ServiceError::NotFound { entity, id: Some(id) } => {
                ApiError::not_found(format!("{} {}", entity, id))
            }
            ServiceError::NotFound { entity, id: None } => {
                ApiError::not_found(format!("{} without id", entity))
            }
            ServiceError::Store(e) => ApiError::Database(e),
        }
    }
}

/// CRUD operations and their form/API flows for one record type.
pub struct CrudService<E, S: ?Sized> {
    store: Arc<S>,
    entity: EntityConfig,
    context: Map<String, Value>,
    _element: PhantomData<fn() -> E>,
}

impl<E, S> CrudService<E, S>
where
    E: DomainElement,
    S: RecordStore<E> + ?Sized,
{
    pub fn new(store: Arc<S>, entity: EntityConfig) -> Self {
        Self {
            store,
            entity,
            context: Map::new(),
            _element: PhantomData,
        }
    }

    /// Add a value to the context of every rendered page.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn not_found(&self, id: Option<i32>) -> ServiceError<E> {
        debug!(entity = %self.entity.type_tag, id = ?id, "Record not found");
        ServiceError::NotFound {
            entity: self.entity.type_tag.clone(),
            id,
        }
    }

    fn rejected(&self, candidate: E, errors: ValidationErrors) -> ServiceError<E> {
        debug!(
            entity = %self.entity.type_tag,
            fields = %field_list(&errors),
            "Candidate failed validation"
        );
        ServiceError::ValidationFailed {
            candidate: Box::new(candidate),
            errors,
        }
    }

    // ---- core operations ----

    pub async fn list(&self) -> Result<Vec<E>, ServiceError<E>> {
        Ok(self.store.find_all().await?)
    }

    pub async fn view(&self, id: i32) -> Result<E, ServiceError<E>> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(record),
            None => Err(self.not_found(Some(id))),
        }
    }

    /// Validate and insert. Nothing is written when validation fails.
    pub async fn create(&self, mut candidate: E) -> Result<E, ServiceError<E>> {
        if let Err(errors) = candidate.validate() {
            return Err(self.rejected(candidate, errors));
        }

        candidate.clear_id();
        let saved = self.store.save(candidate).await?;
        info!(entity = %self.entity.type_tag, id = ?saved.id(), "Record created");
        Ok(saved)
    }

    /// Validate, check the id exists, then replace the whole record.
    pub async fn update(&self, id: i32, mut candidate: E) -> Result<E, ServiceError<E>> {
        candidate.set_id(id);
        if let Err(errors) = candidate.validate() {
            return Err(self.rejected(candidate, errors));
        }
        self.replace(id, candidate).await
    }

    /// Replace an existing row with an already validated candidate.
    async fn replace(&self, id: i32, mut candidate: E) -> Result<E, ServiceError<E>> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(self.not_found(Some(id)));
        }

        candidate.set_id(id);
        let saved = self.store.save(candidate).await?;
        info!(entity = %self.entity.type_tag, id, "Record updated");
        Ok(saved)
    }

    // ---- form flows ----

    fn page(&self, template: &str, entries: Vec<(&str, Value)>) -> View {
        let mut context = self.context.clone();
        for (key, value) in entries {
            context.insert(key.to_string(), value);
        }
        View::page(template, context)
    }

    fn form(&self, template: &str, record: &E, errors: HashMap<String, Vec<String>>) -> View {
        self.page(
            template,
            vec![
                (self.entity.type_tag.as_str(), to_value(record)),
                ("errors", to_value(&errors)),
            ],
        )
    }

    pub async fn list_page(&self) -> Result<View, ServiceError<E>> {
        let records = self.list().await?;
        Ok(self.page(
            &self.entity.list_template,
            vec![(self.entity.collection_key.as_str(), to_value(&records))],
        ))
    }

    pub fn add_form(&self) -> View {
        self.form(&self.entity.add_template, &E::default(), HashMap::new())
    }

    pub async fn submit_add(&self, candidate: E) -> Result<View, ServiceError<E>> {
        match self.create(candidate).await {
            Ok(_) => Ok(View::Redirect(self.entity.list_path.clone())),
            Err(ServiceError::ValidationFailed { candidate, errors }) => Ok(self.form(
                &self.entity.add_template,
                &candidate,
                field_errors(&errors),
            )),
            Err(e) => Err(e),
        }
    }

    pub async fn view_page(&self, id: i32) -> Result<View, ServiceError<E>> {
        match self.view(id).await {
            Ok(record) => Ok(self.page(
                &self.entity.view_template,
                vec![(self.entity.current_key.as_str(), to_value(&record))],
            )),
            Err(ServiceError::NotFound { .. }) => Ok(View::not_found(&self.entity.type_tag, id)),
            Err(e) => Err(e),
        }
    }

    pub async fn update_form(&self, id: i32) -> Result<View, ServiceError<E>> {
        match self.view(id).await {
            Ok(record) => Ok(self.form(&self.entity.update_template, &record, HashMap::new())),
            Err(ServiceError::NotFound { .. }) => Ok(View::not_found(&self.entity.type_tag, id)),
            Err(e) => Err(e),
        }
    }

    pub async fn submit_update(&self, id: i32, candidate: E) -> Result<View, ServiceError<E>> {
        match self.update(id, candidate).await {
            Ok(_) => Ok(View::Redirect(self.entity.list_path.clone())),
            Err(ServiceError::ValidationFailed { candidate, errors }) => Ok(self.form(
                &self.entity.update_template,
                &candidate,
                field_errors(&errors),
            )),
            Err(ServiceError::NotFound { .. }) => Ok(View::not_found(&self.entity.type_tag, id)),
            Err(e) => Err(e),
        }
    }

    // ---- API flows ----

    pub async fn api_create(&self, candidate: E) -> ApiResult<(StatusCode, Value)> {
        let saved = self.create(candidate).await?;
        Ok((StatusCode::CREATED, saved.render(&self.entity.type_tag)))
    }

    pub async fn api_get(&self, id: i32) -> ApiResult<Value> {
        let record = self.view(id).await?;
        Ok(record.render(&self.entity.type_tag))
    }

    /// Validation is checked before the id, so an invalid payload is a 400
    /// even when it names no record.
    pub async fn api_update(&self, candidate: E) -> ApiResult<Value> {
        if let Err(errors) = candidate.validate() {
            return Err(self.rejected(candidate, errors).into());
        }
        let id = match candidate.id() {
            Some(id) => id,
            None => return Err(self.not_found(None).into()),
        };

        let saved = self.replace(id, candidate).await?;
        Ok(saved.render(&self.entity.type_tag))
    }
}

fn to_value<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
