//! Access link email delivery.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        branding::repository::PgBrandingRepository,
        content::format::format_date,
        documents::records::DocumentKind,
        notifications::{
            errors::NotificationError,
            mailer::{Mailer, OutgoingEmail, SmtpTransportSettings},
            render::{EmailVariables, render_html, render_text, wrap_in_layout},
            repository::PgNotificationsRepository,
        },
        tenants::{records::TenantUuid, repository::PgTenantsRepository},
    },
    secrets::SecretCipher,
};

/// Everything needed to tell a patient about a new or reset access link.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessLinkEmail {
    pub kind: DocumentKind,
    pub recipient: String,
    pub document_number: String,
    pub patient_name: String,
    pub public_link: String,
    pub password: String,
    pub expires_at: Option<Timestamp>,
}

impl fmt::Debug for AccessLinkEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLinkEmail")
            .field("kind", &self.kind)
            .field("recipient", &self.recipient)
            .field("document_number", &self.document_number)
            .field("password", &"**redacted**")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Renders and sends access link emails with the tenant's own SMTP server,
/// template and branding.
#[derive(Clone)]
pub struct AccessLinkNotifier {
    db: Db,
    cipher: Arc<dyn SecretCipher>,
    mailer: Arc<dyn Mailer>,
    tenants: PgTenantsRepository,
    branding: PgBrandingRepository,
    repository: PgNotificationsRepository,
}

impl fmt::Debug for AccessLinkNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessLinkNotifier").finish_non_exhaustive()
    }
}

impl AccessLinkNotifier {
    #[must_use]
    pub fn new(db: Db, cipher: Arc<dyn SecretCipher>, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db,
            cipher,
            mailer,
            tenants: PgTenantsRepository::new(),
            branding: PgBrandingRepository::new(),
            repository: PgNotificationsRepository::new(),
        }
    }

    /// Send the access link email for `tenant`.
    ///
    /// # Errors
    ///
    /// Fails when SMTP settings or the email template are missing, when the
    /// SMTP password cannot be decrypted, or when delivery fails.
    pub async fn send_access_link(
        &self,
        tenant: TenantUuid,
        email: AccessLinkEmail,
    ) -> Result<(), NotificationError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let tenant_record = self.tenants.get_tenant(&mut *tx, tenant).await?;

        let settings = self
            .repository
            .find_smtp_settings(&mut tx)
            .await?
            .ok_or(NotificationError::SmtpNotConfigured)?;

        let template = self
            .repository
            .find_email_template(&mut tx, email.kind)
            .await?
            .ok_or(NotificationError::TemplateMissing)?;

        let branding = self.branding.get_branding(&mut tx).await?;

        tx.commit().await?;

        let password = self
            .cipher
            .decrypt(&settings.password_ciphertext)
            .await
            .map_err(NotificationError::Cipher)?;

        let locale = tenant_record.locale();
        let clinic_name = branding.display_name(&tenant_record.name).to_string();
        let time_zone = tenant_record.time_zone();

        let variables = EmailVariables {
            document_number: email.document_number,
            patient_name: email.patient_name,
            clinic_name: clinic_name.clone(),
            public_link: email.public_link,
            password: email.password,
            expires_at: email.expires_at.map(|expires_at| {
                format_date(expires_at.to_zoned(time_zone.clone()).date(), locale)
            }),
            locale,
        };

        let subject = render_text(&template.subject, &variables);
        let body = render_html(&template.body, &variables).map_err(NotificationError::Render)?;

        let outgoing = OutgoingEmail {
            from_address: settings.from_address,
            from_name: settings.from_name.or_else(|| Some(clinic_name.clone())),
            to: email.recipient,
            subject,
            html_body: wrap_in_layout(&body, &branding, &clinic_name)
                .map_err(NotificationError::Render)?,
        };

        let transport = SmtpTransportSettings {
            host: settings.host,
            port: settings.port,
            secure: settings.secure,
            username: settings.username,
            password,
        };

        self.mailer
            .send(&transport, outgoing)
            .await
            .map_err(NotificationError::Delivery)?;

        info!(
            tenant_uuid = %tenant,
            kind = %email.kind,
            "access link email sent"
        );

        Ok(())
    }
}
