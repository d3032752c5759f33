//! Settings Models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use tq_app::domain::branding::{TenantBranding, data::BrandingUpdate};

/// Clinic branding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BrandingResponse {
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

impl From<TenantBranding> for BrandingResponse {
    fn from(branding: TenantBranding) -> Self {
        Self {
            company_name: branding.company_name,
            logo_url: branding.logo_url,
            primary_color: branding.primary_color,
            secondary_color: branding.secondary_color,
            contact_email: branding.contact_email,
            contact_phone: branding.contact_phone,
            website: branding.website,
            instagram: branding.instagram,
            facebook: branding.facebook,
            whatsapp: branding.whatsapp,
        }
    }
}

/// Branding Update Request
///
/// Omitted colours fall back to the defaults.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BrandingRequest {
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

impl From<BrandingRequest> for BrandingUpdate {
    fn from(request: BrandingRequest) -> Self {
        Self {
            company_name: request.company_name,
            logo_url: request.logo_url,
            primary_color: request.primary_color,
            secondary_color: request.secondary_color,
            contact_email: request.contact_email,
            contact_phone: request.contact_phone,
            website: request.website,
            instagram: request.instagram,
            facebook: request.facebook,
            whatsapp: request.whatsapp,
        }
    }
}
