use actix_web::{HttpResponse, http::StatusCode};
use std::sync::Arc;
use tera::Tera;

use crate::domain::users::UserRole;

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Loads every template under `templates/`
  pub fn new() -> Result<Self, tera::Error> {
    Self::from_glob("templates/**/*.html.tera")
  }

  pub fn from_glob(glob: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(glob)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }

  /// Render a template into an HTML response with the given status
  pub fn respond(
    &self,
    status: StatusCode,
    template: &str,
    context: &tera::Context,
  ) -> Result<HttpResponse, actix_web::Error> {
    let html = self.render(template, context).map_err(|e| {
      tracing::error!(template, error = ?e, "Failed to render template");
      actix_web::error::ErrorInternalServerError(e)
    })?;

    Ok(
      HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(html),
    )
  }
}

/// Context shared by every page
pub fn page_context(title: &str) -> tera::Context {
  let mut context = tera::Context::new();
  context.insert("title", title);
  context.insert(
    "roles",
    &UserRole::ALL.iter().map(UserRole::as_str).collect::<Vec<_>>(),
  );
  context
}
