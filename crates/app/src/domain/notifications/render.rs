//! Email template rendering.
//!
//! Tenant templates use `$NAME$` placeholders. Known placeholders are
//! substituted, anything else between dollar signs is left as written. The
//! HTML fragments and the branded layout are autoescaped tera templates.

use tera::{Context, Tera, escape_html};
use thiserror::Error;

use crate::domain::{branding::TenantBranding, locale::Locale};

const LAYOUT_TEMPLATE: &str = "layout.html";
const PUBLIC_LINK_TEMPLATE: &str = "public_link.html";
const PASSWORD_BLOCK_TEMPLATE: &str = "password_block.html";

fn templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();

    tera.add_raw_templates([
        (LAYOUT_TEMPLATE, include_str!("templates/layout.html")),
        (PUBLIC_LINK_TEMPLATE, include_str!("templates/public_link.html")),
        (PASSWORD_BLOCK_TEMPLATE, include_str!("templates/password_block.html")),
    ])?;

    Ok(tera)
}

/// Placeholders every email body must contain.
pub const REQUIRED_PLACEHOLDERS: [Placeholder; 2] =
    [Placeholder::PublicLink, Placeholder::PasswordBlock];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    DocumentNumber,
    PatientName,
    ClinicName,
    PublicLink,
    PasswordBlock,
    ExpiresAt,
}

impl Placeholder {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DocumentNumber => "DOCUMENT_NUMBER",
            Self::PatientName => "PATIENT_NAME",
            Self::ClinicName => "CLINIC_NAME",
            Self::PublicLink => "PUBLIC_LINK",
            Self::PasswordBlock => "PASSWORD_BLOCK",
            Self::ExpiresAt => "EXPIRES_AT",
        }
    }

    /// The placeholder as written in a template, e.g. `$PUBLIC_LINK$`.
    #[must_use]
    pub fn token(self) -> String {
        format!("${}$", self.name())
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "DOCUMENT_NUMBER" => Some(Self::DocumentNumber),
            "PATIENT_NAME" => Some(Self::PatientName),
            "CLINIC_NAME" => Some(Self::ClinicName),
            "PUBLIC_LINK" => Some(Self::PublicLink),
            "PASSWORD_BLOCK" => Some(Self::PasswordBlock),
            "EXPIRES_AT" => Some(Self::ExpiresAt),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateValidationError {
    #[error("email subject cannot be empty")]
    EmptySubject,

    #[error("email body must contain {0}")]
    MissingPlaceholder(String),
}

/// Check a template before it is stored.
///
/// # Errors
///
/// Returns an error when the subject is blank or the body lacks one of the
/// [`REQUIRED_PLACEHOLDERS`].
pub fn validate_template(subject: &str, body: &str) -> Result<(), TemplateValidationError> {
    if subject.trim().is_empty() {
        return Err(TemplateValidationError::EmptySubject);
    }

    for placeholder in REQUIRED_PLACEHOLDERS {
        let token = placeholder.token();

        if !body.contains(&token) {
            return Err(TemplateValidationError::MissingPlaceholder(token));
        }
    }

    Ok(())
}

/// Values substituted into an access link email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailVariables {
    pub document_number: String,
    pub patient_name: String,
    pub clinic_name: String,
    pub public_link: String,
    pub password: String,
    pub expires_at: Option<String>,
    pub locale: Locale,
}

impl EmailVariables {
    fn text(&self, placeholder: Placeholder) -> String {
        match placeholder {
            Placeholder::DocumentNumber => self.document_number.clone(),
            Placeholder::PatientName => self.patient_name.clone(),
            Placeholder::ClinicName => self.clinic_name.clone(),
            Placeholder::PublicLink => self.public_link.clone(),
            Placeholder::PasswordBlock => match self.locale {
                Locale::PtBr => format!("Senha de acesso: {}", self.password),
                Locale::EnUs => format!("Access password: {}", self.password),
            },
            Placeholder::ExpiresAt => self.expires_at_text(),
        }
    }

    fn link_html(&self, tera: &Tera) -> Result<String, tera::Error> {
        let mut context = Context::new();
        context.insert("link", &self.public_link);

        tera.render(PUBLIC_LINK_TEMPLATE, &context)
    }

    fn password_block_html(&self, tera: &Tera) -> Result<String, tera::Error> {
        let label = match self.locale {
            Locale::PtBr => "Sua senha de acesso",
            Locale::EnUs => "Your access password",
        };

        let mut context = Context::new();
        context.insert("label", label);
        context.insert("password", &self.password);

        tera.render(PASSWORD_BLOCK_TEMPLATE, &context)
    }

    fn expires_at_text(&self) -> String {
        self.expires_at.clone().unwrap_or_else(|| {
            match self.locale {
                Locale::PtBr => "sem data de expiração",
                Locale::EnUs => "no expiration date",
            }
            .to_string()
        })
    }
}

/// Substitute placeholders into a plain-text template such as a subject.
#[must_use]
pub fn render_text(template: &str, variables: &EmailVariables) -> String {
    substitute(template, |placeholder| variables.text(placeholder))
}

/// Substitute placeholders into an HTML body, escaping every value.
///
/// # Errors
///
/// Returns an error when a built-in fragment fails to render.
pub fn render_html(template: &str, variables: &EmailVariables) -> Result<String, tera::Error> {
    let tera = templates()?;
    let link = variables.link_html(&tera)?;
    let password_block = variables.password_block_html(&tera)?;

    Ok(substitute(template, |placeholder| match placeholder {
        Placeholder::PublicLink => link.clone(),
        Placeholder::PasswordBlock => password_block.clone(),
        other => escape_html(&variables.text(other)),
    }))
}

fn substitute(template: &str, value: impl Fn(Placeholder) -> String) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('$') {
        let (before, from_dollar) = rest.split_at(start);
        output.push_str(before);

        let after_dollar = from_dollar.get(1..).unwrap_or_default();

        let Some(end) = after_dollar.find('$') else {
            output.push_str(from_dollar);
            return output;
        };

        let name = after_dollar.get(..end).unwrap_or_default();

        if let Some(placeholder) = Placeholder::from_name(name) {
            output.push_str(&value(placeholder));
            rest = after_dollar.get(end + 1..).unwrap_or_default();
        } else {
            // Not a placeholder: keep this dollar and rescan from the next one.
            output.push('$');
            rest = after_dollar;
        }
    }

    output.push_str(rest);
    output
}

/// Wrap a rendered body in the tenant's branded email layout.
///
/// Colours that are not hex fall back to the house colours and only http(s)
/// logos are shown.
///
/// # Errors
///
/// Returns an error when the layout fails to render.
pub fn wrap_in_layout(
    body_html: &str,
    branding: &TenantBranding,
    clinic_name: &str,
) -> Result<String, tera::Error> {
    let contacts: Vec<&str> = [
        branding.contact_email.as_deref(),
        branding.contact_phone.as_deref(),
        branding.website.as_deref(),
    ]
    .into_iter()
    .flatten()
    .filter(|value| !value.trim().is_empty())
    .collect();

    let mut context = Context::new();
    context.insert("body", body_html);
    context.insert("clinic_name", clinic_name);
    context.insert("primary_color", branding.primary_color_or_default());
    context.insert("secondary_color", branding.secondary_color_or_default());
    context.insert("logo_url", &branding.web_logo_url());
    context.insert("contacts", &contacts);

    templates()?.render(LAYOUT_TEMPLATE, &context)
}
