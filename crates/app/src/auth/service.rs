//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, AuthServiceError, IssuedApiToken, NewApiToken, format_api_token,
        generate_api_token_secret, hash_api_token, parse_api_token, repository::PgAuthRepository,
    },
    domain::tenants::records::TenantUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    pool: PgPool,
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            repository: PgAuthRepository::new(),
        }
    }

    /// Issue a new API token for the given tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant does not exist or insertion fails.
    pub async fn issue_api_token(
        &self,
        tenant: TenantUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, &secret);

        let metadata = self
            .repository
            .create_api_token(
                &self.pool,
                &NewApiToken {
                    uuid: token_uuid,
                    tenant_uuid: tenant,
                    token_hash: hash_api_token(&token),
                    expires_at,
                },
            )
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given tenant, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        self.repository
            .list_api_tokens_by_tenant(&self.pool, tenant)
            .await
            .map_err(AuthServiceError::from)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        self.repository
            .revoke_api_token(&self.pool, token_uuid)
            .await
            .map(|record| record.is_some())
            .map_err(AuthServiceError::from)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(
        &self,
        bearer_token: &str,
    ) -> Result<TenantUuid, AuthServiceError> {
        let parsed_token = parse_api_token(bearer_token)
            .ok()
            .ok_or(AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token_by_hash(&self.pool, &hash_api_token(bearer_token))
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.uuid != parsed_token.token_uuid {
            return Err(AuthServiceError::NotFound);
        }

        // Auth success does not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(&self.pool, token.uuid)
            .await
        {
            warn!(token_uuid = %token.uuid, error = %error, "failed to record API token use");
        }

        Ok(token.tenant_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the tenant it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str)
    -> Result<TenantUuid, AuthServiceError>;
}
