//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::{Depot, StatusError};

use tq_app::domain::tenants::records::TenantUuid;

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    /// Record the tenant an authenticated request acts for.
    fn insert_tenant_uuid(&mut self, tenant: TenantUuid);

    /// The authenticated tenant, or 401 when the auth middleware did not run.
    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_tenant_uuid(&mut self, tenant: TenantUuid) {
        self.inject(tenant);
    }

    fn tenant_uuid_or_401(&self) -> Result<TenantUuid, StatusError> {
        self.obtain::<TenantUuid>()
            .copied()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
