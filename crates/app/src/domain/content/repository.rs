//! Page Templates Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use serde_json::Value;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};

use crate::domain::content::records::{PageTemplateRecord, PageTemplateUuid, builtin_template};

const CREATE_PAGE_TEMPLATE_SQL: &str = include_str!("sql/create_page_template.sql");
const GET_PAGE_TEMPLATE_SQL: &str = include_str!("sql/get_page_template.sql");
const GET_DEFAULT_PAGE_TEMPLATE_SQL: &str = include_str!("sql/get_default_page_template.sql");
const CLEAR_DEFAULT_PAGE_TEMPLATE_SQL: &str = include_str!("sql/clear_default_page_template.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPageTemplatesRepository;

impl PgPageTemplatesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PageTemplateUuid,
        name: &str,
        definition: &Value,
        is_default: bool,
    ) -> Result<PageTemplateRecord, sqlx::Error> {
        query_as::<Postgres, PageTemplateRecord>(CREATE_PAGE_TEMPLATE_SQL)
            .bind(uuid.into_uuid())
            .bind(name)
            .bind(Json(definition))
            .bind(is_default)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: PageTemplateUuid,
    ) -> Result<PageTemplateRecord, sqlx::Error> {
        query_as::<Postgres, PageTemplateRecord>(GET_PAGE_TEMPLATE_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_default_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<PageTemplateRecord>, sqlx::Error> {
        query_as::<Postgres, PageTemplateRecord>(GET_DEFAULT_PAGE_TEMPLATE_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn clear_default_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        query(CLEAR_DEFAULT_PAGE_TEMPLATE_SQL)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Pick the layout for a package: the requested template, else the
    /// tenant default, else the built-in layout.
    ///
    /// An explicitly requested template that does not exist is an error.
    pub(crate) async fn resolve_definition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        requested: Option<PageTemplateUuid>,
    ) -> Result<Value, sqlx::Error> {
        if let Some(uuid) = requested {
            return Ok(self.get_template(tx, uuid).await?.definition);
        }

        Ok(self
            .find_default_template(tx)
            .await?
            .map_or_else(builtin_template, |template| template.definition))
    }
}

impl<'r> FromRow<'r, PgRow> for PageTemplateRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PageTemplateUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            definition: row.try_get::<Json<Value>, _>("definition")?.0,
            is_default: row.try_get("is_default")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
