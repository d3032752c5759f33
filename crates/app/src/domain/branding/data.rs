//! Branding Data

use crate::domain::branding::records::is_hex_color;

/// Branding Update Data
///
/// Replaces the stored branding wholesale. Unset colours fall back to the
/// defaults when read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandingUpdate {
    pub company_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub website: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub whatsapp: Option<String>,
}

impl BrandingUpdate {
    /// The first colour that is set but not `#rgb` or `#rrggbb`.
    #[must_use]
    pub fn invalid_color(&self) -> Option<&str> {
        [self.primary_color.as_deref(), self.secondary_color.as_deref()]
            .into_iter()
            .flatten()
            .find(|color| !is_hex_color(color))
    }
}
