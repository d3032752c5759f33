//! Branding Records

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIMARY_COLOR: &str = "#0f766e";
pub const DEFAULT_SECONDARY_COLOR: &str = "#14b8a6";

/// `#rgb` or `#rrggbb`, the only colour forms branding accepts.
#[must_use]
pub fn is_hex_color(value: &str) -> bool {
    value.strip_prefix('#').is_some_and(|hex| {
        matches!(hex.len(), 3 | 6) && hex.bytes().all(|byte| byte.is_ascii_hexdigit())
    })
}

/// Visual identity applied to emails and public pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantBranding {
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub whatsapp: Option<String>,
}

impl TenantBranding {
    /// Name shown to patients, falling back to the tenant's own name.
    #[must_use]
    pub fn display_name<'a>(&'a self, tenant_name: &'a str) -> &'a str {
        self.company_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(tenant_name)
    }

    /// Primary colour, or the house colour when the stored value is not hex.
    #[must_use]
    pub fn primary_color_or_default(&self) -> &str {
        hex_or(&self.primary_color, DEFAULT_PRIMARY_COLOR)
    }

    #[must_use]
    pub fn secondary_color_or_default(&self) -> &str {
        hex_or(&self.secondary_color, DEFAULT_SECONDARY_COLOR)
    }

    /// Logo address when it is an absolute http(s) URL.
    #[must_use]
    pub fn web_logo_url(&self) -> Option<&str> {
        self.logo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| url.starts_with("https://") || url.starts_with("http://"))
    }
}

fn hex_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if is_hex_color(value) { value } else { fallback }
}

impl Default for TenantBranding {
    fn default() -> Self {
        Self {
            company_name: None,
            logo_url: None,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            contact_email: None,
            contact_phone: None,
            website: None,
            instagram: None,
            facebook: None,
            whatsapp: None,
        }
    }
}
