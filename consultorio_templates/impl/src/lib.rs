use std::sync::Arc;

use anyhow::Context;
use consultorio_templates_contracts::{Template, TemplateService, BASE_TEMPLATE, TEMPLATES};
use tera::Tera;

#[derive(Debug, Clone)]
pub struct TemplateServiceImpl {
    tera: Arc<Tera>,
}

impl TemplateServiceImpl {
    pub fn new() -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![""]);
        tera.add_raw_templates(
            std::iter::once(BASE_TEMPLATE)
                .chain(TEMPLATES.iter().copied())
                .map(|(name, source)| (name, collapse_lines(source))),
        )
        .context("Failed to compile email templates")?;

        Ok(Self { tera: tera.into() })
    }
}

impl TemplateService for TemplateServiceImpl {
    #[tracing::instrument(skip_all, fields(template = T::NAME))]
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String> {
        let context = tera::Context::from_serialize(template)?;
        self.tera.render(T::NAME, &context).map_err(Into::into)
    }
}

/// Joins the trimmed, non-empty lines of a template source, so the layout of the
/// template files does not leak into the email body. Interpolated values are left
/// untouched.
fn collapse_lines(source: &str) -> String {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}
