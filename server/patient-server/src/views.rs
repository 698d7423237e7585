//! Handlebars rendering of [`View`]s into HTTP responses.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use handlebars::{Handlebars, RenderError, TemplateError};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ApiError;
use crate::services::View;

const PARTIALS: &[(&str, &str)] = &[
    ("layout", include_str!("templates/layout.hbs")),
    ("patient_fields", include_str!("templates/patient/_fields.hbs")),
];

const TEMPLATES: &[(&str, &str)] = &[
    ("home", include_str!("templates/home.hbs")),
    ("error", include_str!("templates/error.hbs")),
    ("patient/list", include_str!("templates/patient/list.hbs")),
    ("patient/add", include_str!("templates/patient/add.hbs")),
    ("patient/view", include_str!("templates/patient/view.hbs")),
    ("patient/update", include_str!("templates/patient/update.hbs")),
];

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Template error: {0}")]
    Template(#[from] Box<TemplateError>),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub struct ViewRenderer {
    registry: Handlebars<'static>,
}

impl ViewRenderer {
    /// Compile the built-in templates. Fails on a template syntax error.
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);

        for (name, source) in PARTIALS {
            registry
                .register_partial(name, *source)
                .map_err(Box::new)?;
        }
        for (name, source) in TEMPLATES {
            registry
                .register_template_string(name, *source)
                .map_err(Box::new)?;
        }

        Ok(Self { registry })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    pub fn render(&self, template: &str, context: &Map<String, Value>) -> Result<String, ViewError> {
        Ok(self.registry.render(template, context)?)
    }

    /// Turn a flow outcome into a response: a rendered page with its status,
    /// or a `302 Found` redirect.
    pub fn respond(&self, view: View) -> Response {
        match view {
            View::Redirect(location) => {
                (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
            }
            View::Page {
                template,
                status,
                context,
            } => match self.render(&template, &context) {
                Ok(body) => (status, Html(body)).into_response(),
                Err(e) => ApiError::internal(format!("Failed to render {}: {}", template, e))
                    .into_response(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_all_templates_compile() {
        let renderer = ViewRenderer::new().unwrap();
        for (name, _) in TEMPLATES {
            assert!(renderer.has_template(name), "{name} not registered");
        }
    }

    #[test]
    fn test_list_renders_rows_and_peer_links() {
        let renderer = ViewRenderer::new().unwrap();
        let html = renderer
            .render(
                "patient/list",
                &context(json!({
                    "urlAsmt": "http://assessment:8080",
                    "patients": [
                        {"patientId": 3, "familyName": "Carman", "givenName": "Tessa",
                         "dob": "1952-09-27", "sex": "F"}
                    ]
                })),
            )
            .unwrap();

        assert!(html.contains("/patient/view/3"));
        assert!(html.contains("Carman"));
        assert!(html.contains("http://assessment:8080/assess/3"));
    }

    #[test]
    fn test_form_shows_field_errors_escaped() {
        let renderer = ViewRenderer::new().unwrap();
        let html = renderer
            .render(
                "patient/add",
                &context(json!({
                    "patient": {"familyName": "<script>", "phone": "phone"},
                    "errors": {"phone": ["Phone must match the format 000-000-0000"]}
                })),
            )
            .unwrap();

        assert!(html.contains("Phone must match the format 000-000-0000"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains(r#"action="/patient/validate""#));
    }

    #[test]
    fn test_redirect_is_302() {
        let renderer = ViewRenderer::new().unwrap();
        let response = renderer.respond(View::Redirect("/patient/list".into()));

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/patient/list"
        );
    }

    #[test]
    fn test_not_found_page_status() {
        let renderer = ViewRenderer::new().unwrap();
        let response = renderer.respond(View::not_found("patient", 42));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
