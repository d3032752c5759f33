//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, Db},
    domain::{
        access_links::{AccessLinksService, PgAccessLinksService},
        documents::{DocumentsService, PgDocumentsService},
        notifications::{AccessLinkNotifier, SmtpMailer},
        settings::{PgSettingsService, SettingsService},
        tenants::{PgTenantsService, TenantsService},
    },
    secrets::{OpenBaoClient, OpenBaoConfig, SecretCipher},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

/// Everything needed to wire the services together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub openbao: OpenBaoConfig,

    /// Base URL public links are built on.
    pub origin: String,
}

#[derive(Clone)]
pub struct AppContext {
    pub tenants: Arc<dyn TenantsService>,
    pub documents: Arc<dyn DocumentsService>,
    pub access_links: Arc<dyn AccessLinksService>,
    pub settings: Arc<dyn SettingsService>,
    pub auth: Arc<dyn AuthService>,
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when the database is unreachable or the connected
    /// role would bypass row-level security.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(&config.database_url, config.database_max_connections)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Database)?;

        let db = Db::new(pool.clone());

        let cipher: Arc<dyn SecretCipher> = Arc::new(OpenBaoClient::new(config.openbao));
        let notifier = AccessLinkNotifier::new(
            db.clone(),
            Arc::clone(&cipher),
            Arc::new(SmtpMailer::new()),
        );

        Ok(Self {
            tenants: Arc::new(PgTenantsService::new(pool.clone())),
            documents: Arc::new(PgDocumentsService::new(db.clone())),
            access_links: Arc::new(PgAccessLinksService::new(
                db.clone(),
                notifier,
                config.origin,
            )),
            settings: Arc::new(PgSettingsService::new(db, cipher)),
            auth: Arc::new(PgAuthService::new(pool)),
        })
    }
}
