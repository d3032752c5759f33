//! Tenant Records

use jiff::{Timestamp, tz::TimeZone};

use crate::{domain::locale::Locale, uuids::TypedUuid};

/// Tenant UUID
pub type TenantUuid = TypedUuid<TenantRecord>;

/// Tenant Record
#[derive(Debug, Clone)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable tenant name.
    pub name: String,

    /// IANA timezone the tenant operates in.
    pub timezone: Option<String>,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

impl TenantRecord {
    /// Language used for this tenant's emails and public pages.
    #[must_use]
    pub fn locale(&self) -> Locale {
        Locale::resolve(self.timezone.as_deref())
    }

    /// The tenant's timezone, or UTC when unset or unknown.
    #[must_use]
    pub fn time_zone(&self) -> TimeZone {
        self.timezone
            .as_deref()
            .and_then(|name| TimeZone::get(name.trim()).ok())
            .unwrap_or(TimeZone::UTC)
    }
}
