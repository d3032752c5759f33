//! Settings service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        branding::{TenantBranding, data::BrandingUpdate, repository::PgBrandingRepository},
        content::{
            records::{PageTemplateRecord, PageTemplateUuid},
            repository::PgPageTemplatesRepository,
        },
        notifications::{
            data::{NewEmailTemplate, NewSmtpSettings},
            records::{EmailTemplateRecord, SmtpSettingsRecord},
            render::validate_template,
            repository::PgNotificationsRepository,
        },
        settings::{
            data::{NewPageTemplate, SmtpSettingsInput},
            errors::SettingsServiceError,
        },
        tenants::records::TenantUuid,
    },
    secrets::SecretCipher,
};

#[derive(Clone)]
pub struct PgSettingsService {
    db: Db,
    cipher: Arc<dyn SecretCipher>,
    notifications: PgNotificationsRepository,
    branding: PgBrandingRepository,
    templates: PgPageTemplatesRepository,
}

impl fmt::Debug for PgSettingsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgSettingsService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgSettingsService {
    #[must_use]
    pub fn new(db: Db, cipher: Arc<dyn SecretCipher>) -> Self {
        Self {
            db,
            cipher,
            notifications: PgNotificationsRepository::new(),
            branding: PgBrandingRepository::new(),
            templates: PgPageTemplatesRepository::new(),
        }
    }
}

#[async_trait]
impl SettingsService for PgSettingsService {
    async fn save_email_template(
        &self,
        tenant: TenantUuid,
        template: NewEmailTemplate,
    ) -> Result<EmailTemplateRecord, SettingsServiceError> {
        validate_template(&template.subject, &template.body)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let saved = self
            .notifications
            .save_email_template(&mut tx, &template)
            .await?;

        tx.commit().await?;

        info!(tenant_uuid = %tenant, kind = %template.kind, "email template saved");

        Ok(saved)
    }

    async fn save_smtp_settings(
        &self,
        tenant: TenantUuid,
        settings: SmtpSettingsInput,
    ) -> Result<SmtpSettingsRecord, SettingsServiceError> {
        let password_ciphertext = self
            .cipher
            .encrypt(&settings.password)
            .await
            .map_err(SettingsServiceError::Cipher)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let saved = self
            .notifications
            .save_smtp_settings(
                &mut tx,
                &NewSmtpSettings {
                    host: settings.host.trim().to_string(),
                    port: settings.port,
                    secure: settings.secure,
                    username: settings.username,
                    password_ciphertext,
                    from_address: settings.from_address.trim().to_string(),
                    from_name: settings.from_name,
                },
            )
            .await?;

        tx.commit().await?;

        info!(tenant_uuid = %tenant, host = %saved.host, "SMTP settings saved");

        Ok(saved)
    }

    async fn get_branding(&self, tenant: TenantUuid) -> Result<TenantBranding, SettingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let branding = self.branding.get_branding(&mut tx).await?;

        tx.commit().await?;

        Ok(branding)
    }

    async fn save_branding(
        &self,
        tenant: TenantUuid,
        branding: BrandingUpdate,
    ) -> Result<TenantBranding, SettingsServiceError> {
        if let Some(color) = branding.invalid_color() {
            return Err(SettingsServiceError::InvalidColor(color.to_string()));
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let saved = self.branding.save_branding(&mut tx, &branding).await?;

        tx.commit().await?;

        Ok(saved)
    }

    async fn create_page_template(
        &self,
        tenant: TenantUuid,
        template: NewPageTemplate,
    ) -> Result<PageTemplateRecord, SettingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        if template.is_default {
            self.templates.clear_default_template(&mut tx).await?;
        }

        let created = self
            .templates
            .create_template(
                &mut tx,
                PageTemplateUuid::new(),
                &template.name,
                &template.definition,
                template.is_default,
            )
            .await?;

        tx.commit().await?;

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait SettingsService: Send + Sync {
    /// Store the email template for one document kind, replacing any previous
    /// one. Templates missing a required placeholder are rejected.
    async fn save_email_template(
        &self,
        tenant: TenantUuid,
        template: NewEmailTemplate,
    ) -> Result<EmailTemplateRecord, SettingsServiceError>;

    /// Encrypt the SMTP password and store the tenant's mail server settings.
    async fn save_smtp_settings(
        &self,
        tenant: TenantUuid,
        settings: SmtpSettingsInput,
    ) -> Result<SmtpSettingsRecord, SettingsServiceError>;

    /// Branding, or the default colours when none is stored.
    async fn get_branding(&self, tenant: TenantUuid) -> Result<TenantBranding, SettingsServiceError>;

    async fn save_branding(
        &self,
        tenant: TenantUuid,
        branding: BrandingUpdate,
    ) -> Result<TenantBranding, SettingsServiceError>;

    async fn create_page_template(
        &self,
        tenant: TenantUuid,
        template: NewPageTemplate,
    ) -> Result<PageTemplateRecord, SettingsServiceError>;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use crate::{
        domain::{
            branding::records::{DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR},
            documents::records::DocumentKind,
            notifications::render::TemplateValidationError,
        },
        secrets::{MockSecretCipher, OpenBaoError},
        test::TestContext,
    };

    use super::*;

    fn service(ctx: &TestContext, cipher: MockSecretCipher) -> PgSettingsService {
        PgSettingsService::new(ctx.app_db.clone(), Arc::new(cipher))
    }

    fn smtp_input() -> SmtpSettingsInput {
        SmtpSettingsInput {
            host: " smtp.example.com ".to_string(),
            port: 587,
            secure: false,
            username: "clinic".to_string(),
            password: Zeroizing::new("smtp-secret".to_string()),
            from_address: "no-reply@example.com".to_string(),
            from_name: Some("Clínica Sorriso".to_string()),
        }
    }

    #[tokio::test]
    async fn smtp_passwords_are_stored_encrypted() -> TestResult {
        let ctx = TestContext::new().await;

        let mut cipher = MockSecretCipher::new();
        cipher
            .expect_encrypt()
            .withf(|plaintext| plaintext == "smtp-secret")
            .times(1)
            .returning(|_| Ok("vault:v1:ciphertext".to_string()));

        let saved = service(&ctx, cipher)
            .save_smtp_settings(ctx.tenant_uuid, smtp_input())
            .await?;

        assert_eq!(saved.host, "smtp.example.com");
        assert_eq!(saved.port, 587);
        assert_eq!(saved.password_ciphertext, "vault:v1:ciphertext");

        Ok(())
    }

    #[tokio::test]
    async fn saving_smtp_settings_twice_replaces_them() -> TestResult {
        let ctx = TestContext::new().await;

        let mut cipher = MockSecretCipher::new();
        cipher
            .expect_encrypt()
            .returning(|_| Ok("vault:v1:ciphertext".to_string()));

        let svc = service(&ctx, cipher);

        svc.save_smtp_settings(ctx.tenant_uuid, smtp_input()).await?;

        let mut input = smtp_input();
        input.port = 465;
        input.secure = true;

        let saved = svc.save_smtp_settings(ctx.tenant_uuid, input).await?;

        assert_eq!(saved.port, 465);
        assert!(saved.secure);

        Ok(())
    }

    #[tokio::test]
    async fn cipher_failures_store_nothing() {
        let ctx = TestContext::new().await;

        let mut cipher = MockSecretCipher::new();
        cipher.expect_encrypt().returning(|_| {
            Err(OpenBaoError::UnexpectedResponse(
                "missing ciphertext".to_string(),
            ))
        });

        let result = service(&ctx, cipher)
            .save_smtp_settings(ctx.tenant_uuid, smtp_input())
            .await;

        assert!(
            matches!(result, Err(SettingsServiceError::Cipher(_))),
            "expected Cipher, got {result:?}"
        );
    }

    #[tokio::test]
    async fn email_templates_require_link_and_password_placeholders() {
        let ctx = TestContext::new().await;

        let result = service(&ctx, MockSecretCipher::new())
            .save_email_template(
                ctx.tenant_uuid,
                NewEmailTemplate {
                    kind: DocumentKind::Quote,
                    subject: "Your quote".to_string(),
                    body: "<p>$PUBLIC_LINK$</p>".to_string(),
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(SettingsServiceError::InvalidTemplate(
                    TemplateValidationError::MissingPlaceholder(_)
                ))
            ),
            "expected InvalidTemplate, got {result:?}"
        );
    }

    #[tokio::test]
    async fn email_templates_are_replaced_per_kind() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = service(&ctx, MockSecretCipher::new());

        for subject in ["First $DOCUMENT_NUMBER$", "Second $DOCUMENT_NUMBER$"] {
            svc.save_email_template(
                ctx.tenant_uuid,
                NewEmailTemplate {
                    kind: DocumentKind::Quote,
                    subject: subject.to_string(),
                    body: "$PUBLIC_LINK$ $PASSWORD_BLOCK$".to_string(),
                },
            )
            .await?;
        }

        let saved = svc
            .save_email_template(
                ctx.tenant_uuid,
                NewEmailTemplate {
                    kind: DocumentKind::Prevention,
                    subject: "Prevention $DOCUMENT_NUMBER$".to_string(),
                    body: "$PUBLIC_LINK$ $PASSWORD_BLOCK$".to_string(),
                },
            )
            .await?;

        assert_eq!(saved.kind, DocumentKind::Prevention);

        Ok(())
    }

    #[tokio::test]
    async fn branding_defaults_until_saved() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = service(&ctx, MockSecretCipher::new());

        let branding = svc.get_branding(ctx.tenant_uuid).await?;

        assert_eq!(branding.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(branding.secondary_color, DEFAULT_SECONDARY_COLOR);
        assert_eq!(branding.company_name, None);

        svc.save_branding(
            ctx.tenant_uuid,
            BrandingUpdate {
                company_name: Some("Clínica Sorriso".to_string()),
                primary_color: Some("#123456".to_string()),
                ..BrandingUpdate::default()
            },
        )
        .await?;

        let branding = svc.get_branding(ctx.tenant_uuid).await?;

        assert_eq!(branding.company_name.as_deref(), Some("Clínica Sorriso"));
        assert_eq!(branding.primary_color, "#123456");
        assert_eq!(branding.secondary_color, DEFAULT_SECONDARY_COLOR);

        Ok(())
    }

    #[tokio::test]
    async fn branding_colors_must_be_hex() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = service(&ctx, MockSecretCipher::new());

        let result = svc
            .save_branding(
                ctx.tenant_uuid,
                BrandingUpdate {
                    primary_color: Some(
                        "red;background-image:url(https://evil.example/x.png)".to_string(),
                    ),
                    ..BrandingUpdate::default()
                },
            )
            .await;

        assert!(
            matches!(result, Err(SettingsServiceError::InvalidColor(_))),
            "expected InvalidColor, got {result:?}"
        );

        let branding = svc.get_branding(ctx.tenant_uuid).await?;

        assert_eq!(branding.primary_color, DEFAULT_PRIMARY_COLOR);

        svc.save_branding(
            ctx.tenant_uuid,
            BrandingUpdate {
                primary_color: Some("#abc".to_string()),
                secondary_color: Some("#A1B2C3".to_string()),
                ..BrandingUpdate::default()
            },
        )
        .await?;

        let branding = svc.get_branding(ctx.tenant_uuid).await?;

        assert_eq!(branding.primary_color, "#abc");
        assert_eq!(branding.secondary_color, "#A1B2C3");

        Ok(())
    }

    #[tokio::test]
    async fn database_refuses_non_hex_colors() -> TestResult {
        let ctx = TestContext::new().await;

        let mut tx = ctx.app_db.begin_tenant_transaction(ctx.tenant_uuid).await?;

        let result = sqlx::query("INSERT INTO tenant_branding (secondary_color) VALUES ($1)")
            .bind("url(https://evil.example/x.png)")
            .execute(&mut *tx)
            .await
            .map_err(SettingsServiceError::from);

        assert!(
            matches!(result, Err(SettingsServiceError::InvalidData)),
            "expected a check violation, got {result:?}"
        );

        tx.rollback().await?;

        Ok(())
    }

    #[tokio::test]
    async fn branding_is_isolated_per_tenant() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_tenant("Other Clinic").await;
        let svc = service(&ctx, MockSecretCipher::new());

        svc.save_branding(
            ctx.tenant_uuid,
            BrandingUpdate {
                primary_color: Some("#123456".to_string()),
                ..BrandingUpdate::default()
            },
        )
        .await?;

        let branding = svc.get_branding(other).await?;

        assert_eq!(branding.primary_color, DEFAULT_PRIMARY_COLOR);

        Ok(())
    }

    #[tokio::test]
    async fn new_default_page_templates_replace_the_old_default() -> TestResult {
        let ctx = TestContext::new().await;
        let svc = service(&ctx, MockSecretCipher::new());

        let first = svc
            .create_page_template(
                ctx.tenant_uuid,
                NewPageTemplate {
                    name: "Classic".to_string(),
                    definition: json!({ "sections": [] }),
                    is_default: true,
                },
            )
            .await?;

        let second = svc
            .create_page_template(
                ctx.tenant_uuid,
                NewPageTemplate {
                    name: "Modern".to_string(),
                    definition: json!({ "sections": [{ "type": "header" }] }),
                    is_default: true,
                },
            )
            .await?;

        assert!(first.is_default);
        assert!(second.is_default);

        let mut tx = ctx.app_db.begin_tenant_transaction(ctx.tenant_uuid).await?;

        let default = PgPageTemplatesRepository::new()
            .find_default_template(&mut tx)
            .await?;

        assert_eq!(default.map(|template| template.uuid), Some(second.uuid));

        Ok(())
    }
}
