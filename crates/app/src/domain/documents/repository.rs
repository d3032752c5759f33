//! Documents Repository

use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{decode_parsed, decode_u32, decode_u64, encode_u32, encode_u64},
    domain::documents::{
        data::{DocumentUpdate, NewDocument, NewDocumentItem, NewPatient},
        records::{
            DocumentBundle, DocumentItemRecord, DocumentItemUuid, DocumentRecord, DocumentStatus,
            DocumentUuid, PatientRecord, PatientUuid,
        },
    },
};

const CREATE_PATIENT_SQL: &str = include_str!("sql/create_patient.sql");
const GET_PATIENT_SQL: &str = include_str!("sql/get_patient.sql");
const CREATE_DOCUMENT_SQL: &str = include_str!("sql/create_document.sql");
const GET_DOCUMENT_SQL: &str = include_str!("sql/get_document.sql");
const LOCK_DOCUMENT_SQL: &str = include_str!("sql/lock_document.sql");
const UPDATE_DOCUMENT_SQL: &str = include_str!("sql/update_document.sql");
const SET_DOCUMENT_STATUS_SQL: &str = include_str!("sql/set_document_status.sql");
const CREATE_DOCUMENT_ITEM_SQL: &str = include_str!("sql/create_document_item.sql");
const LIST_DOCUMENT_ITEMS_SQL: &str = include_str!("sql/list_document_items.sql");
const DELETE_DOCUMENT_ITEMS_SQL: &str = include_str!("sql/delete_document_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDocumentsRepository;

impl PgDocumentsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: &NewPatient,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(CREATE_PATIENT_SQL)
            .bind(patient.uuid.into_uuid())
            .bind(&patient.first_name)
            .bind(&patient.last_name)
            .bind(&patient.email)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_patient(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient: PatientUuid,
    ) -> Result<PatientRecord, sqlx::Error> {
        query_as::<Postgres, PatientRecord>(GET_PATIENT_SQL)
            .bind(patient.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: &NewDocument,
    ) -> Result<DocumentRecord, sqlx::Error> {
        query_as::<Postgres, DocumentRecord>(CREATE_DOCUMENT_SQL)
            .bind(document.uuid.into_uuid())
            .bind(document.patient_uuid.into_uuid())
            .bind(document.kind.as_str())
            .bind(&document.number)
            .bind(document.status.as_str())
            .bind(encode_u64("total", document.total)?)
            .bind(SqlxDate::from(document.issued_on))
            .bind(document.valid_until.map(SqlxDate::from))
            .bind(&document.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
    ) -> Result<DocumentRecord, sqlx::Error> {
        query_as::<Postgres, DocumentRecord>(GET_DOCUMENT_SQL)
            .bind(document.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch a document and hold a row lock until the transaction ends.
    pub(crate) async fn lock_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
    ) -> Result<DocumentRecord, sqlx::Error> {
        query_as::<Postgres, DocumentRecord>(LOCK_DOCUMENT_SQL)
            .bind(document.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_document(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
        update: &DocumentUpdate,
    ) -> Result<DocumentRecord, sqlx::Error> {
        query_as::<Postgres, DocumentRecord>(UPDATE_DOCUMENT_SQL)
            .bind(document.into_uuid())
            .bind(encode_u64("total", update.total)?)
            .bind(update.valid_until.map(SqlxDate::from))
            .bind(&update.notes)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
        status: DocumentStatus,
    ) -> Result<DocumentRecord, sqlx::Error> {
        query_as::<Postgres, DocumentRecord>(SET_DOCUMENT_STATUS_SQL)
            .bind(document.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn replace_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
        items: &[NewDocumentItem],
    ) -> Result<Vec<DocumentItemRecord>, sqlx::Error> {
        query(DELETE_DOCUMENT_ITEMS_SQL)
            .bind(document.into_uuid())
            .execute(&mut **tx)
            .await?;

        let mut created = Vec::with_capacity(items.len());

        for (position, item) in (0_u32..).zip(items) {
            let record = query_as::<Postgres, DocumentItemRecord>(CREATE_DOCUMENT_ITEM_SQL)
                .bind(DocumentItemUuid::new().into_uuid())
                .bind(document.into_uuid())
                .bind(encode_u32("position", position)?)
                .bind(&item.description)
                .bind(encode_u32("quantity", item.quantity)?)
                .bind(encode_u64("base_price", item.base_price)?)
                .bind(encode_u64("discount", item.discount)?)
                .bind(encode_u64("final_price", item.final_price)?)
                .fetch_one(&mut **tx)
                .await?;

            created.push(record);
        }

        Ok(created)
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
    ) -> Result<Vec<DocumentItemRecord>, sqlx::Error> {
        query_as::<Postgres, DocumentItemRecord>(LIST_DOCUMENT_ITEMS_SQL)
            .bind(document.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Load a document with its patient and ordered line items.
    pub(crate) async fn get_bundle(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        document: DocumentUuid,
    ) -> Result<DocumentBundle, sqlx::Error> {
        let document = self.get_document(tx, document).await?;
        let patient = self.get_patient(tx, document.patient_uuid).await?;
        let items = self.list_items(tx, document.uuid).await?;

        Ok(DocumentBundle {
            document,
            patient,
            items,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for PatientRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PatientUuid::from_uuid(row.try_get("uuid")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DocumentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DocumentUuid::from_uuid(row.try_get("uuid")?),
            patient_uuid: PatientUuid::from_uuid(row.try_get("patient_uuid")?),
            kind: decode_parsed(row, "kind")?,
            number: row.try_get("number")?,
            status: decode_parsed(row, "status")?,
            total: decode_u64(row, "total")?,
            issued_on: row.try_get::<SqlxDate, _>("issued_on")?.to_jiff(),
            valid_until: row
                .try_get::<Option<SqlxDate>, _>("valid_until")?
                .map(SqlxDate::to_jiff),
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DocumentItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: DocumentItemUuid::from_uuid(row.try_get("uuid")?),
            position: decode_u32(row, "position")?,
            description: row.try_get("description")?,
            quantity: decode_u32(row, "quantity")?,
            base_price: decode_u64(row, "base_price")?,
            discount: decode_u64(row, "discount")?,
            final_price: decode_u64(row, "final_price")?,
        })
    }
}
