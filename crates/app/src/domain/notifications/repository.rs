//! Notification Settings Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::decode_parsed,
    domain::{
        documents::records::DocumentKind,
        notifications::{
            data::{NewEmailTemplate, NewSmtpSettings},
            records::{EmailTemplateRecord, SmtpSettingsRecord},
        },
    },
};

const GET_EMAIL_TEMPLATE_SQL: &str = include_str!("sql/get_email_template.sql");
const UPSERT_EMAIL_TEMPLATE_SQL: &str = include_str!("sql/upsert_email_template.sql");
const GET_SMTP_SETTINGS_SQL: &str = include_str!("sql/get_smtp_settings.sql");
const UPSERT_SMTP_SETTINGS_SQL: &str = include_str!("sql/upsert_smtp_settings.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_email_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        kind: DocumentKind,
    ) -> Result<Option<EmailTemplateRecord>, sqlx::Error> {
        query_as::<Postgres, EmailTemplateRecord>(GET_EMAIL_TEMPLATE_SQL)
            .bind(kind.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn save_email_template(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        template: &NewEmailTemplate,
    ) -> Result<EmailTemplateRecord, sqlx::Error> {
        query_as::<Postgres, EmailTemplateRecord>(UPSERT_EMAIL_TEMPLATE_SQL)
            .bind(template.kind.as_str())
            .bind(&template.subject)
            .bind(&template.body)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn find_smtp_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<SmtpSettingsRecord>, sqlx::Error> {
        query_as::<Postgres, SmtpSettingsRecord>(GET_SMTP_SETTINGS_SQL)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn save_smtp_settings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        settings: &NewSmtpSettings,
    ) -> Result<SmtpSettingsRecord, sqlx::Error> {
        query_as::<Postgres, SmtpSettingsRecord>(UPSERT_SMTP_SETTINGS_SQL)
            .bind(&settings.host)
            .bind(i32::from(settings.port))
            .bind(settings.secure)
            .bind(&settings.username)
            .bind(&settings.password_ciphertext)
            .bind(&settings.from_address)
            .bind(&settings.from_name)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for EmailTemplateRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            kind: decode_parsed(row, "kind")?,
            subject: row.try_get("subject")?,
            body: row.try_get("body")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SmtpSettingsRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let port: i32 = row.try_get("smtp_port")?;

        Ok(Self {
            host: row.try_get("smtp_host")?,
            port: u16::try_from(port).map_err(|error| sqlx::Error::ColumnDecode {
                index: "smtp_port".to_string(),
                source: Box::new(error),
            })?,
            secure: row.try_get("smtp_secure")?,
            username: row.try_get("smtp_username")?,
            password_ciphertext: row.try_get("smtp_password_ciphertext")?,
            from_address: row.try_get("from_address")?,
            from_name: row.try_get("from_name")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
