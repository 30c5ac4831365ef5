//! Email template rendering
//!
//! The email body is one HTML document with Jinja-style placeholders,
//! loaded from disk at startup and rendered per contact. Reminders reuse
//! the same template with `is_reminder` / `reminder_number` set so the
//! template can show a follow-up banner.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use anyhow::{Context, Result};
use minijinja::Environment;
use serde::Serialize;

/// The variable set the template is rendered with
///
/// Field names are the placeholder names recognized inside the template.
#[derive(Debug, Clone, Serialize)]
pub struct TemplateVars {
    pub contact_name: String,
    pub contact_email: String,
    pub contact_company: String,
    pub company_name: String,
    pub product_name: String,
    pub sender_name: String,
    pub interested_link: String,
    pub not_interested_link: String,
    pub is_reminder: bool,
    pub reminder_number: Option<u32>,
}

/// A loaded, parse-checked email template
pub struct EmailTemplate {
    env: Environment<'static>,
}

const TEMPLATE_NAME: &str = "email";

impl EmailTemplate {
    /// Load and parse the template file
    pub fn from_file(path: &str) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read email template {path}"))?;
        Self::from_source(source)
    }

    /// Parse a template from an in-memory source
    pub fn from_source(source: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template_owned(TEMPLATE_NAME.to_string(), source.into())
            .context("failed to parse email template")?;
        Ok(EmailTemplate { env })
    }

    /// Render the HTML body for one contact
    pub fn render(&self, vars: &TemplateVars) -> Result<String> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .context("email template missing from environment")?;
        template.render(vars).context("failed to render email template")
    }
}
