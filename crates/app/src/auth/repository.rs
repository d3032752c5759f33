//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgExecutor, Postgres, Row, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    auth::models::{ApiTokenMetadata, NewApiToken},
    domain::tenants::records::TenantUuid,
};

const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const FIND_ACTIVE_API_TOKEN_BY_HASH_SQL: &str =
    include_str!("sql/find_active_api_token_by_hash.sql");
const LIST_API_TOKENS_BY_TENANT_SQL: &str = include_str!("sql/list_api_tokens_by_tenant.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");
const TOUCH_API_TOKEN_LAST_USED_SQL: &str = include_str!("sql/touch_api_token_last_used.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuthRepository;

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_api_token<'e, E>(
        &self,
        executor: E,
        token: &NewApiToken,
    ) -> Result<ApiTokenMetadata, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query_as::<Postgres, ApiTokenMetadata>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.tenant_uuid.into_uuid())
            .bind(&token.token_hash)
            .bind(token.expires_at.map(SqlxTimestamp::from))
            .fetch_one(executor)
            .await
    }

    pub(crate) async fn find_active_api_token_by_hash<'e, E>(
        &self,
        executor: E,
        token_hash: &str,
    ) -> Result<Option<ApiTokenMetadata>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query_as::<Postgres, ApiTokenMetadata>(FIND_ACTIVE_API_TOKEN_BY_HASH_SQL)
            .bind(token_hash)
            .fetch_optional(executor)
            .await
    }

    pub(crate) async fn list_api_tokens_by_tenant<'e, E>(
        &self,
        executor: E,
        tenant: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query_as::<Postgres, ApiTokenMetadata>(LIST_API_TOKENS_BY_TENANT_SQL)
            .bind(tenant.into_uuid())
            .fetch_all(executor)
            .await
    }

    pub(crate) async fn revoke_api_token<'e, E>(
        &self,
        executor: E,
        token_uuid: Uuid,
    ) -> Result<Option<ApiTokenMetadata>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query_as::<Postgres, ApiTokenMetadata>(REVOKE_API_TOKEN_SQL)
            .bind(token_uuid)
            .fetch_optional(executor)
            .await
    }

    pub(crate) async fn touch_api_token_last_used<'e, E>(
        &self,
        executor: E,
        token_uuid: Uuid,
    ) -> Result<(), sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query(TOUCH_API_TOKEN_LAST_USED_SQL)
            .bind(token_uuid)
            .execute(executor)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
