use handlebars::Handlebars;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::RenderError;

static TEMPLATE_REGISTRY: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("explanation_page", include_str!("explanation_page.hbs"));
    m.insert("explain_changes", include_str!("explain_changes.hbs"));
    m
});

/// Render a template by name using Handlebars.
///
/// Usage:
///     render("explain_changes", &json!({"panel": false}))
///
pub fn render<T: Serialize>(name: &str, ctx: &T) -> Result<String, RenderError> {
    let template = TEMPLATE_REGISTRY
        .get(name)
        .ok_or_else(|| RenderError::UnknownTemplate(name.to_string()))?;

    let mut hb = Handlebars::new();
    hb.set_strict_mode(true); // fail if a variable is missing

    hb.render_template(template, ctx)
        .map_err(|e| RenderError::Template {
            name: name.to_string(),
            message: e.to_string(),
        })
}
