//! Fixtures shared by service tests.

use jiff::civil::date;
use lettre::Address;
use zeroize::Zeroizing;

use crate::{
    domain::{
        documents::{
            DocumentsService, DocumentsServiceError,
            data::{NewDocument, NewPatient},
            records::{DocumentKind, DocumentStatus, DocumentUuid, PatientRecord, PatientUuid},
        },
        notifications::{
            MailerError,
            data::{NewEmailTemplate, NewSmtpSettings},
            records::{EmailTemplateRecord, SmtpSettingsRecord},
            repository::PgNotificationsRepository,
        },
        tenants::records::TenantUuid,
    },
    secrets::MockSecretCipher,
};

use super::TestContext;

/// Patient "Ana Souza".
pub(crate) async fn create_patient(
    ctx: &TestContext,
    tenant: TenantUuid,
    email: Option<&str>,
) -> Result<PatientRecord, DocumentsServiceError> {
    ctx.documents
        .create_patient(
            tenant,
            NewPatient {
                uuid: PatientUuid::new(),
                first_name: "Ana".to_string(),
                last_name: "Souza".to_string(),
                email: email.map(str::to_string),
            },
        )
        .await
}

fn new_document(kind: DocumentKind, patient: PatientUuid, number: &str) -> NewDocument {
    NewDocument {
        uuid: DocumentUuid::new(),
        patient_uuid: patient,
        kind,
        number: number.to_string(),
        status: DocumentStatus::Sent,
        total: 10_000,
        issued_on: date(2025, 1, 5),
        valid_until: None,
        notes: None,
        items: Vec::new(),
    }
}

/// A sent quote totalling 100.00, issued 2025-01-05, without items.
pub(crate) fn new_quote(patient: PatientUuid, number: &str) -> NewDocument {
    new_document(DocumentKind::Quote, patient, number)
}

pub(crate) fn new_prevention(patient: PatientUuid, number: &str) -> NewDocument {
    new_document(DocumentKind::Prevention, patient, number)
}

/// SMTP settings for `smtp.example.com` with an already encrypted password.
pub(crate) async fn seed_smtp_settings(
    ctx: &TestContext,
    tenant: TenantUuid,
) -> Result<SmtpSettingsRecord, sqlx::Error> {
    let mut tx = ctx.app_db.begin_tenant_transaction(tenant).await?;

    let settings = PgNotificationsRepository::new()
        .save_smtp_settings(
            &mut tx,
            &NewSmtpSettings {
                host: "smtp.example.com".to_string(),
                port: 587,
                secure: false,
                username: "clinic".to_string(),
                password_ciphertext: "vault:v1:test".to_string(),
                from_address: "no-reply@example.com".to_string(),
                from_name: None,
            },
        )
        .await?;

    tx.commit().await?;

    Ok(settings)
}

/// Template with subject "Quote $DOCUMENT_NUMBER$" (or "Prevention …").
pub(crate) async fn seed_email_template(
    ctx: &TestContext,
    tenant: TenantUuid,
    kind: DocumentKind,
) -> Result<EmailTemplateRecord, sqlx::Error> {
    let subject = match kind {
        DocumentKind::Quote => "Quote $DOCUMENT_NUMBER$",
        DocumentKind::Prevention => "Prevention $DOCUMENT_NUMBER$",
    };

    let mut tx = ctx.app_db.begin_tenant_transaction(tenant).await?;

    let template = PgNotificationsRepository::new()
        .save_email_template(
            &mut tx,
            &NewEmailTemplate {
                kind,
                subject: subject.to_string(),
                body: "<p>Hello $PATIENT_NAME$,</p><p>$PUBLIC_LINK$</p>$PASSWORD_BLOCK$\
                       <p>$CLINIC_NAME$</p>"
                    .to_string(),
            },
        )
        .await?;

    tx.commit().await?;

    Ok(template)
}

/// A cipher that decrypts every ciphertext to `plaintext`.
pub(crate) fn cipher_returning(plaintext: &str) -> MockSecretCipher {
    let plaintext = plaintext.to_string();

    let mut cipher = MockSecretCipher::new();
    cipher
        .expect_decrypt()
        .returning(move |_| Ok(Zeroizing::new(plaintext.clone())));

    cipher
}

/// Any error a mailer can return.
pub(crate) fn delivery_failure() -> MailerError {
    MailerError::from(
        "not an address"
            .parse::<Address>()
            .expect_err("address should be rejected"),
    )
}
