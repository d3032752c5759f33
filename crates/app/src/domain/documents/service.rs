//! Documents service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        documents::{
            data::{DocumentUpdate, NewDocument, NewPatient},
            errors::DocumentsServiceError,
            records::{DocumentBundle, DocumentUuid, PatientRecord},
            repository::PgDocumentsRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgDocumentsService {
    db: Db,
    repository: PgDocumentsRepository,
}

impl PgDocumentsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgDocumentsRepository::new(),
        }
    }
}

#[async_trait]
impl DocumentsService for PgDocumentsService {
    async fn create_patient(
        &self,
        tenant: TenantUuid,
        patient: NewPatient,
    ) -> Result<PatientRecord, DocumentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_patient(&mut tx, &patient).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn create_document(
        &self,
        tenant: TenantUuid,
        document: NewDocument,
    ) -> Result<DocumentBundle, DocumentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_document(&mut tx, &document).await?;
        let patient = self
            .repository
            .get_patient(&mut tx, created.patient_uuid)
            .await?;
        let items = self
            .repository
            .replace_items(&mut tx, created.uuid, &document.items)
            .await?;

        tx.commit().await?;

        Ok(DocumentBundle {
            document: created,
            patient,
            items,
        })
    }

    async fn get_document(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
    ) -> Result<DocumentBundle, DocumentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let bundle = self.repository.get_bundle(&mut tx, document).await?;

        tx.commit().await?;

        Ok(bundle)
    }

    async fn update_document(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
        update: DocumentUpdate,
    ) -> Result<DocumentBundle, DocumentsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.lock_document(&mut tx, document).await?;
        self.repository
            .update_document(&mut tx, document, &update)
            .await?;

        if let Some(items) = &update.items {
            self.repository
                .replace_items(&mut tx, document, items)
                .await?;
        }

        let bundle = self.repository.get_bundle(&mut tx, document).await?;

        tx.commit().await?;

        Ok(bundle)
    }
}

#[automock]
#[async_trait]
pub trait DocumentsService: Send + Sync {
    /// Register a patient that documents can be issued to.
    async fn create_patient(
        &self,
        tenant: TenantUuid,
        patient: NewPatient,
    ) -> Result<PatientRecord, DocumentsServiceError>;

    /// Create a document along with its line items.
    async fn create_document(
        &self,
        tenant: TenantUuid,
        document: NewDocument,
    ) -> Result<DocumentBundle, DocumentsServiceError>;

    /// Fetch a document with its patient and items.
    async fn get_document(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
    ) -> Result<DocumentBundle, DocumentsServiceError>;

    /// Update a document's commercial fields, optionally replacing its items.
    async fn update_document(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
        update: DocumentUpdate,
    ) -> Result<DocumentBundle, DocumentsServiceError>;
}
