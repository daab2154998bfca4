//! View rendering: named templates compiled into the binary.
//!
//! Handlers never touch template syntax; they hand a template name and a
//! data map to [`render`] (usually through [`View`]).

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use minijinja::{AutoEscape, Environment, Value};
use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::error;

pub const INDEX: &str = "Index";
pub const SHOW: &str = "Show";
pub const NEW: &str = "New";
pub const EDIT: &str = "Edit";
pub const CATEGORIES: &str = "Categories";
pub const NEW_CATEGORY: &str = "NewCategory";
pub const EDIT_CATEGORY: &str = "EditCategory";
pub const ERROR: &str = "Error";

const TEMPLATES: &[(&str, &str)] = &[
    ("layout", include_str!("../templates/layout.html")),
    (INDEX, include_str!("../templates/index.html")),
    (SHOW, include_str!("../templates/show.html")),
    (NEW, include_str!("../templates/new.html")),
    (EDIT, include_str!("../templates/edit.html")),
    (CATEGORIES, include_str!("../templates/categories.html")),
    (NEW_CATEGORY, include_str!("../templates/new_category.html")),
    (EDIT_CATEGORY, include_str!("../templates/edit_category.html")),
    (ERROR, include_str!("../templates/error.html")),
];

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    // Template names carry no extension, so escaping is switched on explicitly.
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    for &(name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            error!("Template '{name}' failed to compile: {e}");
        }
    }
    env
});

/// Render `template` with `data` as its context.
pub fn render<S: Serialize>(template: &str, data: S) -> Result<String, minijinja::Error> {
    ENV.get_template(template)?.render(data)
}

/// A rendered page: status code, template name and context.
#[derive(Debug)]
pub struct View {
    status: StatusCode,
    template: &'static str,
    data: Value,
}

impl View {
    /// A `200 OK` page.
    pub fn ok<S: Serialize>(template: &'static str, data: S) -> Self {
        Self::with_status(StatusCode::OK, template, data)
    }

    pub fn with_status<S: Serialize>(status: StatusCode, template: &'static str, data: S) -> Self {
        Self {
            status,
            template,
            data: Value::from_serialize(&data),
        }
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        match render(self.template, &self.data) {
            Ok(body) => (self.status, Html(body)).into_response(),
            Err(e) => {
                error!("Rendering '{}' failed: {e:#}", self.template);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("template error: {e}"),
                )
                    .into_response()
            }
        }
    }
}

/// `301 Moved Permanently` to a listing page after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovedTo(pub &'static str);

impl IntoResponse for MovedTo {
    fn into_response(self) -> Response {
        (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, self.0)]).into_response()
    }
}
