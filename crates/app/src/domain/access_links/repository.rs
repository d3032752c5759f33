//! Access Links Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, PgExecutor, Postgres, Row, Transaction, postgres::PgRow, query, query_as,
    query_scalar, types::Json,
};
use uuid::Uuid;

use crate::{
    database::{decode_parsed, decode_u64},
    domain::{
        access_links::{
            records::{AccessLinkRecord, AccessLinkUuid, LinkChannel},
            token::AccessToken,
        },
        content::{ContentPackage, records::PageTemplateUuid},
        documents::records::{DocumentKind, DocumentUuid},
        tenants::records::TenantUuid,
    },
};

const CREATE_ACCESS_LINK_SQL: &str = include_str!("sql/create_access_link.sql");
const INDEX_ACCESS_TOKEN_SQL: &str = include_str!("sql/index_access_token.sql");
const FIND_TOKEN_TENANT_SQL: &str = include_str!("sql/find_token_tenant.sql");
const FIND_ACTIVE_BY_TOKEN_SQL: &str = include_str!("sql/find_active_access_link_by_token.sql");
const LOCK_ACCESS_LINK_SQL: &str = include_str!("sql/lock_access_link.sql");
const LIST_ACTIVE_ACCESS_LINKS_SQL: &str = include_str!("sql/list_active_access_links.sql");
const INCREMENT_VIEWS_SQL: &str = include_str!("sql/increment_access_link_views.sql");
const REVOKE_ACCESS_LINK_SQL: &str = include_str!("sql/revoke_access_link.sql");
const SET_PASSWORD_HASH_SQL: &str = include_str!("sql/set_access_link_password_hash.sql");
const DELETE_ACCESS_LINK_SQL: &str = include_str!("sql/delete_access_link.sql");

/// Row to insert for a new link.
#[derive(Debug, Clone)]
pub(crate) struct AccessLinkRow<'a> {
    pub uuid: AccessLinkUuid,
    pub document_uuid: DocumentUuid,
    pub document_kind: DocumentKind,
    pub channel: LinkChannel,
    pub access_token: &'a AccessToken,
    pub password_hash: &'a str,
    pub recipient_email: &'a str,
    pub template_uuid: Option<PageTemplateUuid>,
    pub content: &'a ContentPackage,
    pub expires_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccessLinksRepository;

impl PgAccessLinksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert a link and register its token in the global token index.
    pub(crate) async fn create_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        row: &AccessLinkRow<'_>,
    ) -> Result<AccessLinkRecord, sqlx::Error> {
        let link = query_as::<Postgres, AccessLinkRecord>(CREATE_ACCESS_LINK_SQL)
            .bind(row.uuid.into_uuid())
            .bind(row.document_uuid.into_uuid())
            .bind(row.document_kind.as_str())
            .bind(row.channel.as_str())
            .bind(row.access_token.as_str())
            .bind(row.password_hash)
            .bind(row.recipient_email)
            .bind(row.template_uuid.map(PageTemplateUuid::into_uuid))
            .bind(Json(row.content))
            .bind(row.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&mut **tx)
            .await?;

        query(INDEX_ACCESS_TOKEN_SQL)
            .bind(row.access_token.as_str())
            .bind(tenant.into_uuid())
            .bind(row.uuid.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(link)
    }

    /// Resolve which tenant owns a token. Runs without tenant context.
    pub(crate) async fn find_token_tenant<'e, E>(
        &self,
        executor: E,
        token: &AccessToken,
    ) -> Result<Option<TenantUuid>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        query_scalar::<Postgres, Uuid>(FIND_TOKEN_TENANT_SQL)
            .bind(token.as_str())
            .fetch_optional(executor)
            .await
            .map(|tenant| tenant.map(TenantUuid::from_uuid))
    }

    /// Find an active link by token. Expired links are still returned.
    pub(crate) async fn find_active_by_token(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: &AccessToken,
    ) -> Result<Option<AccessLinkRecord>, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(FIND_ACTIVE_BY_TOKEN_SQL)
            .bind(token.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn lock_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(LOCK_ACCESS_LINK_SQL)
            .bind(link.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Active links for a document on one channel, newest first.
    pub(crate) async fn list_active_for_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
        channel: LinkChannel,
    ) -> Result<Vec<AccessLinkRecord>, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(LIST_ACTIVE_ACCESS_LINKS_SQL)
            .bind(document.into_uuid())
            .bind(channel.as_str())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn increment_views(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(INCREMENT_VIEWS_SQL)
            .bind(link.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn revoke_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(REVOKE_ACCESS_LINK_SQL)
            .bind(link.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_password_hash(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        link: AccessLinkUuid,
        password_hash: Option<&str>,
    ) -> Result<AccessLinkRecord, sqlx::Error> {
        query_as::<Postgres, AccessLinkRecord>(SET_PASSWORD_HASH_SQL)
            .bind(link.into_uuid())
            .bind(password_hash)
            .fetch_one(&mut **tx)
            .await
    }

    /// Physically remove a link. Its token index row cascades.
    pub(crate) async fn delete_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        link: AccessLinkUuid,
    ) -> Result<u64, sqlx::Error> {
        query(DELETE_ACCESS_LINK_SQL)
            .bind(link.into_uuid())
            .execute(&mut **tx)
            .await
            .map(|result| result.rows_affected())
    }
}

impl<'r> FromRow<'r, PgRow> for AccessLinkRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let access_token: String = row.try_get("access_token")?;

        Ok(Self {
            uuid: AccessLinkUuid::from_uuid(row.try_get("uuid")?),
            document_uuid: DocumentUuid::from_uuid(row.try_get("document_uuid")?),
            document_kind: decode_parsed(row, "document_kind")?,
            channel: decode_parsed(row, "channel")?,
            access_token: AccessToken::parse(&access_token).map_err(|error| {
                sqlx::Error::ColumnDecode {
                    index: "access_token".to_string(),
                    source: Box::new(error),
                }
            })?,
            password_hash: row.try_get("password_hash")?,
            recipient_email: row.try_get("recipient_email")?,
            template_uuid: row
                .try_get::<Option<Uuid>, _>("template_uuid")?
                .map(PageTemplateUuid::from_uuid),
            content: row.try_get::<Json<ContentPackage>, _>("content")?.0,
            active: row.try_get("active")?,
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            views_count: decode_u64(row, "views_count")?,
            last_viewed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_viewed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
