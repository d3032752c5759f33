//! Branding Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::branding::{
    data::BrandingUpdate,
    records::{DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, TenantBranding},
};

const GET_BRANDING_SQL: &str = include_str!("sql/get_branding.sql");
const UPSERT_BRANDING_SQL: &str = include_str!("sql/upsert_branding.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBrandingRepository;

impl PgBrandingRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Load the tenant's branding, or the defaults when none is stored.
    pub(crate) async fn get_branding(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<TenantBranding, sqlx::Error> {
        Ok(query_as::<Postgres, TenantBranding>(GET_BRANDING_SQL)
            .fetch_optional(&mut **tx)
            .await?
            .unwrap_or_default())
    }

    pub(crate) async fn save_branding(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        branding: &BrandingUpdate,
    ) -> Result<TenantBranding, sqlx::Error> {
        query_as::<Postgres, TenantBranding>(UPSERT_BRANDING_SQL)
            .bind(&branding.company_name)
            .bind(&branding.logo_url)
            .bind(&branding.primary_color)
            .bind(&branding.secondary_color)
            .bind(&branding.contact_email)
            .bind(&branding.contact_phone)
            .bind(&branding.website)
            .bind(&branding.instagram)
            .bind(&branding.facebook)
            .bind(&branding.whatsapp)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TenantBranding {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            company_name: row.try_get("company_name")?,
            logo_url: row.try_get("logo_url")?,
            primary_color: row
                .try_get::<Option<String>, _>("primary_color")?
                .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string()),
            secondary_color: row
                .try_get::<Option<String>, _>("secondary_color")?
                .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string()),
            contact_email: row.try_get("contact_email")?,
            contact_phone: row.try_get("contact_phone")?,
            website: row.try_get("website")?,
            instagram: row.try_get("instagram")?,
            facebook: row.try_get("facebook")?,
            whatsapp: row.try_get("whatsapp")?,
        })
    }
}
