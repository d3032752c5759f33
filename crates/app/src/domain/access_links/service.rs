//! Access links service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{error, info, warn};

use crate::{
    database::Db,
    domain::{
        access_links::{
            data::{DocumentActionOutcome, IssuedAccessLink, NewAccessLink, OpenedLink},
            errors::AccessLinksServiceError,
            password::{check_password, generate_password, hash_password},
            records::{AccessLinkRecord, AccessLinkUuid, LinkChannel},
            repository::{AccessLinkRow, PgAccessLinksRepository},
            token::AccessToken,
        },
        branding::repository::PgBrandingRepository,
        content::{
            ContentPackage, build_content_package, records::PageTemplateUuid,
            repository::PgPageTemplatesRepository,
        },
        documents::{
            records::{DocumentAction, DocumentBundle, DocumentUuid},
            repository::PgDocumentsRepository,
        },
        notifications::{AccessLinkEmail, AccessLinkNotifier},
        tenants::{records::TenantUuid, repository::PgTenantsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgAccessLinksService {
    db: Db,
    notifier: AccessLinkNotifier,
    origin: String,
    repository: PgAccessLinksRepository,
    documents: PgDocumentsRepository,
    templates: PgPageTemplatesRepository,
    tenants: PgTenantsRepository,
    branding: PgBrandingRepository,
}

impl PgAccessLinksService {
    /// `origin` is the public base URL links are built on, e.g.
    /// `https://app.example.com`.
    #[must_use]
    pub fn new(db: Db, notifier: AccessLinkNotifier, origin: impl Into<String>) -> Self {
        Self {
            db,
            notifier,
            origin: origin.into().trim_end_matches('/').to_string(),
            repository: PgAccessLinksRepository::new(),
            documents: PgDocumentsRepository::new(),
            templates: PgPageTemplatesRepository::new(),
            tenants: PgTenantsRepository::new(),
            branding: PgBrandingRepository::new(),
        }
    }

    fn public_url(&self, channel: LinkChannel, token: &AccessToken) -> String {
        format!(
            "{}/{}/{}",
            self.origin,
            channel.path_segment(),
            token.as_str()
        )
    }

    /// Snapshot a document exactly as a link created now would freeze it.
    async fn build_package(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        document: DocumentUuid,
        template: Option<PageTemplateUuid>,
    ) -> Result<(DocumentBundle, ContentPackage), AccessLinksServiceError> {
        let locale = self.tenants.get_tenant(&mut **tx, tenant).await?.locale();
        let bundle = self.documents.get_bundle(tx, document).await?;

        let definition = self
            .templates
            .resolve_definition(tx, template)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => AccessLinksServiceError::TemplateNotFound,
                other => other.into(),
            })?;

        let package = build_content_package(definition, &bundle, locale);

        Ok((bundle, package))
    }

    /// Resolve a public token to an accessible link the viewer has unlocked.
    ///
    /// The lookup transaction is finished before the password hash is
    /// checked, so no pooled connection is held while bcrypt runs.
    async fn unlock(
        &self,
        channel: LinkChannel,
        token: &str,
        password: &str,
    ) -> Result<(TenantUuid, AccessLinkRecord), AccessLinksServiceError> {
        let token = AccessToken::parse(token)
            .ok()
            .ok_or(AccessLinksServiceError::NotFound)?;

        let tenant = self
            .repository
            .find_token_tenant(self.db.pool(), &token)
            .await?
            .ok_or(AccessLinksServiceError::NotFound)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;
        let link = self.repository.find_active_by_token(&mut tx, &token).await?;
        tx.commit().await?;

        let link = link.ok_or(AccessLinksServiceError::NotFound)?;

        if link.channel != channel || link.is_expired() {
            return Err(AccessLinksServiceError::NotFound);
        }

        if !link.verify_password(password).await? {
            return Err(AccessLinksServiceError::InvalidPassword);
        }

        Ok((tenant, link))
    }

    /// Re-read an unlocked link under a row lock before acting on it.
    ///
    /// A link revoked, expired or given a new password since it was unlocked
    /// is rejected.
    async fn lock_unlocked_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unlocked: &AccessLinkRecord,
    ) -> Result<AccessLinkRecord, AccessLinksServiceError> {
        let current = self.repository.lock_link(tx, unlocked.uuid).await?;

        if !current.active || current.is_expired() {
            return Err(AccessLinksServiceError::NotFound);
        }

        if current.password_hash != unlocked.password_hash {
            return Err(AccessLinksServiceError::InvalidPassword);
        }

        Ok(current)
    }

    async fn lock_channel_link(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        channel: LinkChannel,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, AccessLinksServiceError> {
        let record = self.repository.lock_link(tx, link).await?;

        if record.channel != channel {
            return Err(AccessLinksServiceError::NotFound);
        }

        Ok(record)
    }

    /// Undo a link whose notification email could not be sent.
    async fn discard_unsent_link(&self, tenant: TenantUuid, link: AccessLinkUuid) {
        let result = async {
            let mut tx = self.db.begin_tenant_transaction(tenant).await?;
            self.repository.delete_link(&mut tx, link).await?;
            tx.commit().await
        }
        .await;

        if let Err(source) = result {
            error!(
                tenant_uuid = %tenant,
                link_uuid = %link,
                error = %source,
                "failed to delete access link after email failure"
            );
        }
    }

    async fn restore_password_hash(
        &self,
        tenant: TenantUuid,
        link: AccessLinkUuid,
        previous: Option<&str>,
    ) {
        let result = async {
            let mut tx = self.db.begin_tenant_transaction(tenant).await?;
            self.repository
                .set_password_hash(&mut tx, link, previous)
                .await?;
            tx.commit().await
        }
        .await;

        if let Err(source) = result {
            error!(
                tenant_uuid = %tenant,
                link_uuid = %link,
                error = %source,
                "failed to restore access link password after email failure"
            );
        }
    }
}

#[async_trait]
impl AccessLinksService for PgAccessLinksService {
    async fn create_link(
        &self,
        tenant: TenantUuid,
        link: NewAccessLink,
    ) -> Result<IssuedAccessLink, AccessLinksServiceError> {
        if let Some(password) = link.password.as_deref() {
            check_password(password)?;
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let (bundle, content) = self
            .build_package(&mut tx, tenant, link.document_uuid, link.template_uuid)
            .await?;

        let kind = bundle.document.kind;

        if !link.channel.accepts(kind) {
            return Err(AccessLinksServiceError::ChannelMismatch(kind));
        }

        let recipient = link
            .recipient_email
            .as_deref()
            .or(bundle.patient.email.as_deref())
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(AccessLinksServiceError::RecipientMissing)?
            .to_string();

        let password = link.password.unwrap_or_else(generate_password);
        let password_hash = hash_password(password.clone()).await?;
        let access_token = AccessToken::generate();

        let created = self
            .repository
            .create_link(
                &mut tx,
                tenant,
                &AccessLinkRow {
                    uuid: AccessLinkUuid::new(),
                    document_uuid: bundle.document.uuid,
                    document_kind: kind,
                    channel: link.channel,
                    access_token: &access_token,
                    password_hash: &password_hash,
                    recipient_email: &recipient,
                    template_uuid: link.template_uuid,
                    content: &content,
                    expires_at: link.expires_at,
                },
            )
            .await?;

        tx.commit().await?;

        let url = self.public_url(link.channel, &access_token);

        let sent = self
            .notifier
            .send_access_link(
                tenant,
                AccessLinkEmail {
                    kind,
                    recipient,
                    document_number: bundle.document.number.clone(),
                    patient_name: content.resolved_data.patient.full_name.clone(),
                    public_link: url.clone(),
                    password: password.clone(),
                    expires_at: created.expires_at,
                },
            )
            .await;

        if let Err(source) = sent {
            warn!(
                tenant_uuid = %tenant,
                link_uuid = %created.uuid,
                error = %source,
                "access link email failed; discarding link"
            );

            self.discard_unsent_link(tenant, created.uuid).await;

            return Err(AccessLinksServiceError::from_notification(kind, source));
        }

        info!(
            tenant_uuid = %tenant,
            link_uuid = %created.uuid,
            channel = %created.channel,
            "access link created"
        );

        Ok(IssuedAccessLink {
            link: created,
            url,
            password,
        })
    }

    async fn list_links_for_document(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        document: DocumentUuid,
    ) -> Result<Vec<AccessLinkRecord>, AccessLinksServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let links = self
            .repository
            .list_active_for_document(&mut tx, document, channel)
            .await?;

        tx.commit().await?;

        Ok(links)
    }

    async fn revoke_link(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, AccessLinksServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.lock_channel_link(&mut tx, channel, link).await?;

        let revoked = self.repository.revoke_link(&mut tx, link).await?;

        tx.commit().await?;

        info!(tenant_uuid = %tenant, link_uuid = %link, "access link revoked");

        Ok(revoked)
    }

    async fn rotate_password(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        link: AccessLinkUuid,
    ) -> Result<IssuedAccessLink, AccessLinksServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let current = self.lock_channel_link(&mut tx, channel, link).await?;

        if !current.active {
            return Err(AccessLinksServiceError::NotFound);
        }

        let recipient = current
            .recipient_email
            .clone()
            .ok_or(AccessLinksServiceError::RecipientMissing)?;

        let password = generate_password();
        let password_hash = hash_password(password.clone()).await?;

        let updated = self
            .repository
            .set_password_hash(&mut tx, link, Some(&password_hash))
            .await?;

        tx.commit().await?;

        let url = self.public_url(channel, &updated.access_token);
        let resolved = &updated.content.resolved_data;

        let sent = self
            .notifier
            .send_access_link(
                tenant,
                AccessLinkEmail {
                    kind: updated.document_kind,
                    recipient,
                    document_number: resolved.document.document().number.clone(),
                    patient_name: resolved.patient.full_name.clone(),
                    public_link: url.clone(),
                    password: password.clone(),
                    expires_at: updated.expires_at,
                },
            )
            .await;

        if let Err(source) = sent {
            warn!(
                tenant_uuid = %tenant,
                link_uuid = %link,
                error = %source,
                "password reset email failed; restoring previous password"
            );

            self.restore_password_hash(tenant, link, current.password_hash.as_deref())
                .await;

            return Err(AccessLinksServiceError::from_notification(
                updated.document_kind,
                source,
            ));
        }

        info!(tenant_uuid = %tenant, link_uuid = %link, "access link password rotated");

        Ok(IssuedAccessLink {
            link: updated,
            url,
            password,
        })
    }

    async fn preview_content(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
        template: Option<PageTemplateUuid>,
    ) -> Result<ContentPackage, AccessLinksServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let (_, package) = self
            .build_package(&mut tx, tenant, document, template)
            .await?;

        tx.commit().await?;

        Ok(package)
    }

    async fn open_link(
        &self,
        channel: LinkChannel,
        token: &str,
        password: &str,
    ) -> Result<OpenedLink, AccessLinksServiceError> {
        let (tenant, unlocked) = self.unlock(channel, token, password).await?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;
        let link = self.lock_unlocked_link(&mut tx, &unlocked).await?;

        let viewed = self.repository.increment_views(&mut tx, link.uuid).await?;
        let branding = self.branding.get_branding(&mut tx).await?;

        tx.commit().await?;

        Ok(OpenedLink {
            content: viewed.content,
            branding,
        })
    }

    async fn apply_action(
        &self,
        channel: LinkChannel,
        token: &str,
        password: &str,
        action: DocumentAction,
    ) -> Result<DocumentActionOutcome, AccessLinksServiceError> {
        let (tenant, unlocked) = self.unlock(channel, token, password).await?;

        if !unlocked.document_kind.supports(action) {
            return Err(AccessLinksServiceError::UnsupportedAction(
                unlocked.document_kind,
            ));
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;
        let link = self.lock_unlocked_link(&mut tx, &unlocked).await?;

        let document = self
            .documents
            .lock_document(&mut tx, link.document_uuid)
            .await?;

        let outcome = match action
            .transition(document.status)
            .map_err(AccessLinksServiceError::Conflict)?
        {
            Some(status) => {
                let updated = self
                    .documents
                    .set_status(&mut tx, document.uuid, status)
                    .await?;

                DocumentActionOutcome {
                    document_number: updated.number,
                    status: updated.status,
                    changed: true,
                }
            }
            None => DocumentActionOutcome {
                document_number: document.number,
                status: document.status,
                changed: false,
            },
        };

        tx.commit().await?;

        Ok(outcome)
    }
}

#[automock]
#[async_trait]
pub trait AccessLinksService: Send + Sync {
    /// Snapshot a document into a new link and email it to the patient.
    ///
    /// The link is removed again when the email cannot be sent.
    async fn create_link(
        &self,
        tenant: TenantUuid,
        link: NewAccessLink,
    ) -> Result<IssuedAccessLink, AccessLinksServiceError>;

    /// Active links for a document on one channel, newest first.
    async fn list_links_for_document(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        document: DocumentUuid,
    ) -> Result<Vec<AccessLinkRecord>, AccessLinksServiceError>;

    /// Permanently deactivate a link.
    async fn revoke_link(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        link: AccessLinkUuid,
    ) -> Result<AccessLinkRecord, AccessLinksServiceError>;

    /// Replace a link's password and email the new one. The previous password
    /// stays valid when the email cannot be sent.
    async fn rotate_password(
        &self,
        tenant: TenantUuid,
        channel: LinkChannel,
        link: AccessLinkUuid,
    ) -> Result<IssuedAccessLink, AccessLinksServiceError>;

    /// Build the package a new link would freeze, without storing anything.
    async fn preview_content(
        &self,
        tenant: TenantUuid,
        document: DocumentUuid,
        template: Option<PageTemplateUuid>,
    ) -> Result<ContentPackage, AccessLinksServiceError>;

    /// Unlock a link with its password and count the view.
    async fn open_link(
        &self,
        channel: LinkChannel,
        token: &str,
        password: &str,
    ) -> Result<OpenedLink, AccessLinksServiceError>;

    /// Apply a viewer action, such as approval, to the linked document.
    async fn apply_action(
        &self,
        channel: LinkChannel,
        token: &str,
        password: &str,
        action: DocumentAction,
    ) -> Result<DocumentActionOutcome, AccessLinksServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use jiff::{Timestamp, ToSpan};
    use testresult::TestResult;

    use crate::{
        domain::{
            documents::{
                DocumentsService,
                data::DocumentUpdate,
                records::{DocumentKind, DocumentStatus},
            },
            notifications::mailer::MockMailer,
        },
        test::{
            TestContext,
            helpers::{
                cipher_returning, create_patient, delivery_failure, new_prevention, new_quote,
                seed_email_template, seed_smtp_settings,
            },
        },
    };

    use super::*;

    const PASSWORD: &str = "Ab3xZ9Qr";

    fn service(ctx: &TestContext, mailer: MockMailer) -> PgAccessLinksService {
        let notifier = AccessLinkNotifier::new(
            ctx.app_db.clone(),
            Arc::new(cipher_returning("smtp-secret")),
            Arc::new(mailer),
        );

        PgAccessLinksService::new(ctx.app_db.clone(), notifier, "https://tq.example.com/")
    }

    fn delivering() -> MockMailer {
        let mut mailer = MockMailer::new();
        mailer.expect_send().returning(|_, _| Ok(()));
        mailer
    }

    fn new_link(channel: LinkChannel, document: DocumentUuid) -> NewAccessLink {
        NewAccessLink {
            channel,
            document_uuid: document,
            template_uuid: None,
            expires_at: None,
            password: Some(PASSWORD.to_string()),
            recipient_email: None,
        }
    }

    async fn seed_mail(ctx: &TestContext) -> TestResult {
        seed_smtp_settings(ctx, ctx.tenant_uuid).await?;
        seed_email_template(ctx, ctx.tenant_uuid, DocumentKind::Quote).await?;
        seed_email_template(ctx, ctx.tenant_uuid, DocumentKind::Prevention).await?;

        Ok(())
    }

    async fn quote(ctx: &TestContext) -> TestResult<DocumentUuid> {
        let patient = create_patient(ctx, ctx.tenant_uuid, Some("ana@example.com")).await?;

        let bundle = ctx
            .documents
            .create_document(ctx.tenant_uuid, new_quote(patient.uuid, "Q-001"))
            .await?;

        Ok(bundle.document.uuid)
    }

    async fn prevention(ctx: &TestContext) -> TestResult<DocumentUuid> {
        let patient = create_patient(ctx, ctx.tenant_uuid, Some("ana@example.com")).await?;

        let bundle = ctx
            .documents
            .create_document(ctx.tenant_uuid, new_prevention(patient.uuid, "P-001"))
            .await?;

        Ok(bundle.document.uuid)
    }

    #[tokio::test]
    async fn created_links_open_with_their_password() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|_, email| {
                email.to == "ana@example.com" && email.html_body.contains("https:&#x2F;&#x2F;tq.example.com&#x2F;pq&#x2F;")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let svc = service(&ctx, mailer);

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        assert_eq!(issued.password, PASSWORD);
        assert_eq!(
            issued.url,
            format!(
                "https://tq.example.com/pq/{}",
                issued.link.access_token.as_str()
            )
        );
        assert_eq!(issued.link.recipient_email.as_deref(), Some("ana@example.com"));
        assert!(issued.link.password_hash.is_some());

        let opened = svc
            .open_link(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                PASSWORD,
            )
            .await?;

        let resolved = &opened.content.resolved_data;

        assert_eq!(resolved.document.kind(), DocumentKind::Quote);
        assert_eq!(resolved.document.document().number, "Q-001");
        assert_eq!(resolved.document.document().total, "$100.00");
        assert_eq!(opened.branding.primary_color, "#0f766e");

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert_eq!(links.len(), 1);
        assert_eq!(links.first().map(|link| link.views_count), Some(1));
        assert!(links.first().is_some_and(|link| link.last_viewed_at.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn generated_passwords_are_returned_once() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let mut link = new_link(LinkChannel::PublicQuote, document);
        link.password = None;

        let issued = svc.create_link(ctx.tenant_uuid, link).await?;

        assert_eq!(issued.password.len(), 8);
        assert!(!format!("{issued:?}").contains(&issued.password));

        svc.open_link(
            LinkChannel::PublicQuote,
            issued.link.access_token.as_str(),
            &issued.password,
        )
        .await?;

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let result = svc
            .open_link(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                "wrong",
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::InvalidPassword)),
            "expected InvalidPassword, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_and_malformed_tokens_are_not_found() {
        let ctx = TestContext::new().await;
        let svc = service(&ctx, MockMailer::new());

        let unknown = AccessToken::generate();

        for token in [unknown.as_str(), "not-a-token", ""] {
            let result = svc
                .open_link(LinkChannel::PublicQuote, token, PASSWORD)
                .await;

            assert!(
                matches!(result, Err(AccessLinksServiceError::NotFound)),
                "expected NotFound, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn revoked_links_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let revoked = svc
            .revoke_link(ctx.tenant_uuid, LinkChannel::PublicQuote, issued.link.uuid)
            .await?;

        assert!(!revoked.active);

        let result = svc
            .open_link(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                PASSWORD,
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn expired_links_are_not_found_before_the_password_is_checked() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let mut link = new_link(LinkChannel::PublicQuote, document);
        link.expires_at = Some(Timestamp::now() - 1.hour());

        let issued = svc.create_link(ctx.tenant_uuid, link).await?;

        for password in [PASSWORD, "wrong"] {
            let result = svc
                .open_link(
                    LinkChannel::PublicQuote,
                    issued.link.access_token.as_str(),
                    password,
                )
                .await;

            assert!(
                matches!(result, Err(AccessLinksServiceError::NotFound)),
                "expected NotFound, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn links_only_open_on_their_own_channel() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let result = svc
            .open_link(
                LinkChannel::LandingPage,
                issued.link.access_token.as_str(),
                PASSWORD,
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let result = svc
            .revoke_link(ctx.tenant_uuid, LinkChannel::LandingPage, issued.link.uuid)
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn public_quote_links_reject_preventions() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = prevention(&ctx).await?;

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let result = service(&ctx, mailer)
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await;

        assert!(
            matches!(
                result,
                Err(AccessLinksServiceError::ChannelMismatch(
                    DocumentKind::Prevention
                ))
            ),
            "expected ChannelMismatch, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn blank_and_overlong_passwords_are_refused() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, MockMailer::new());

        for password in [String::new(), "x".repeat(73)] {
            let mut link = new_link(LinkChannel::PublicQuote, document);
            link.password = Some(password);

            let result = svc.create_link(ctx.tenant_uuid, link).await;

            assert!(
                matches!(result, Err(AccessLinksServiceError::PasswordRejected(_))),
                "expected PasswordRejected, got {result:?}"
            );
        }

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty(), "no link should be stored: {links:?}");

        Ok(())
    }

    #[tokio::test]
    async fn links_of_deleted_tenants_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        sqlx::query("UPDATE tenants SET deleted_at = now() WHERE uuid = $1")
            .bind(ctx.tenant_uuid.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = svc
            .open_link(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                PASSWORD,
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unlocked_links_are_rechecked_before_use() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let rotated = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;
        let revoked = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let (_, unlocked_rotated) = svc
            .unlock(
                LinkChannel::PublicQuote,
                rotated.link.access_token.as_str(),
                PASSWORD,
            )
            .await?;
        let (_, unlocked_revoked) = svc
            .unlock(
                LinkChannel::PublicQuote,
                revoked.link.access_token.as_str(),
                PASSWORD,
            )
            .await?;

        svc.rotate_password(ctx.tenant_uuid, LinkChannel::PublicQuote, rotated.link.uuid)
            .await?;
        svc.revoke_link(ctx.tenant_uuid, LinkChannel::PublicQuote, revoked.link.uuid)
            .await?;

        let mut tx = ctx.app_db.begin_tenant_transaction(ctx.tenant_uuid).await?;

        let after_rotation = svc.lock_unlocked_link(&mut tx, &unlocked_rotated).await;
        assert!(
            matches!(after_rotation, Err(AccessLinksServiceError::InvalidPassword)),
            "expected InvalidPassword, got {after_rotation:?}"
        );

        let after_revoke = svc.lock_unlocked_link(&mut tx, &unlocked_revoked).await;
        assert!(
            matches!(after_revoke, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {after_revoke:?}"
        );

        tx.rollback().await?;

        Ok(())
    }

    #[tokio::test]
    async fn content_is_frozen_at_creation() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        ctx.documents
            .update_document(
                ctx.tenant_uuid,
                document,
                DocumentUpdate {
                    total: 25_000,
                    valid_until: None,
                    notes: Some("Revised".to_string()),
                    items: None,
                },
            )
            .await?;

        let opened = svc
            .open_link(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                PASSWORD,
            )
            .await?;

        assert_eq!(opened.content, issued.link.content);

        let resolved = opened.content.resolved_data.document.document();

        assert_eq!(resolved.total, "$100.00");
        assert_eq!(resolved.notes, None);

        let preview = svc
            .preview_content(ctx.tenant_uuid, document, None)
            .await?;

        assert_eq!(preview.resolved_data.document.document().total, "$250.00");

        Ok(())
    }

    #[tokio::test]
    async fn preview_does_not_store_a_link() -> TestResult {
        let ctx = TestContext::new().await;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, MockMailer::new());

        let preview = svc
            .preview_content(ctx.tenant_uuid, document, None)
            .await?;

        assert_eq!(preview.resolved_data.patient.full_name, "Ana Souza");

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unknown_templates_are_reported() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let mut link = new_link(LinkChannel::PublicQuote, document);
        link.template_uuid = Some(PageTemplateUuid::new());

        let result = service(&ctx, MockMailer::new())
            .create_link(ctx.tenant_uuid, link)
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::TemplateNotFound)),
            "expected TemplateNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_documents_are_not_found() {
        let ctx = TestContext::new().await;

        let result = service(&ctx, MockMailer::new())
            .create_link(
                ctx.tenant_uuid,
                new_link(LinkChannel::PublicQuote, DocumentUuid::new()),
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn patients_without_email_cannot_receive_links() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let patient = create_patient(&ctx, ctx.tenant_uuid, None).await?;

        let bundle = ctx
            .documents
            .create_document(ctx.tenant_uuid, new_quote(patient.uuid, "Q-002"))
            .await?;

        let svc = service(&ctx, MockMailer::new());

        let result = svc
            .create_link(
                ctx.tenant_uuid,
                new_link(LinkChannel::PublicQuote, bundle.document.uuid),
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::RecipientMissing)),
            "expected RecipientMissing, got {result:?}"
        );

        let links = svc
            .list_links_for_document(
                ctx.tenant_uuid,
                LinkChannel::PublicQuote,
                bundle.document.uuid,
            )
            .await?;

        assert!(links.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn explicit_recipients_override_the_patient_email() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|_, email| email.to == "guardian@example.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut link = new_link(LinkChannel::PublicQuote, document);
        link.recipient_email = Some(" guardian@example.com ".to_string());

        let issued = service(&ctx, mailer)
            .create_link(ctx.tenant_uuid, link)
            .await?;

        assert_eq!(
            issued.link.recipient_email.as_deref(),
            Some("guardian@example.com")
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_emails_discard_the_new_link() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_, _| Err(delivery_failure()));

        let svc = service(&ctx, mailer);

        let result = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await;

        assert!(
            matches!(&result, Err(error) if error.code() == Some("QUOTE_EMAIL_FAILED")),
            "expected QUOTE_EMAIL_FAILED, got {result:?}"
        );

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn missing_smtp_settings_discard_the_new_link() -> TestResult {
        let ctx = TestContext::new().await;
        let document = quote(&ctx).await?;

        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let svc = service(&ctx, mailer);

        let result = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::SmtpNotConfigured)),
            "expected SmtpNotConfigured, got {result:?}"
        );

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn links_are_listed_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let first = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;
        let second = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let links = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::PublicQuote, document)
            .await?;

        let uuids: Vec<_> = links.iter().map(|link| link.uuid).collect();

        assert_eq!(uuids, vec![second.link.uuid, first.link.uuid]);

        let landing = svc
            .list_links_for_document(ctx.tenant_uuid, LinkChannel::LandingPage, document)
            .await?;

        assert!(landing.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn approving_twice_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let token = issued.link.access_token.as_str();

        let outcome = svc
            .apply_action(
                LinkChannel::PublicQuote,
                token,
                PASSWORD,
                DocumentAction::Approve,
            )
            .await?;

        assert_eq!(
            outcome,
            DocumentActionOutcome {
                document_number: "Q-001".to_string(),
                status: DocumentStatus::Approved,
                changed: true,
            }
        );

        let result = svc
            .apply_action(
                LinkChannel::PublicQuote,
                token,
                PASSWORD,
                DocumentAction::Approve,
            )
            .await;

        assert!(
            matches!(
                result,
                Err(AccessLinksServiceError::Conflict(DocumentStatus::Approved))
            ),
            "expected Conflict, got {result:?}"
        );

        let bundle = ctx
            .documents
            .get_document(ctx.tenant_uuid, document)
            .await?;

        assert_eq!(bundle.document.status, DocumentStatus::Approved);

        Ok(())
    }

    #[tokio::test]
    async fn actions_require_the_password() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let result = svc
            .apply_action(
                LinkChannel::PublicQuote,
                issued.link.access_token.as_str(),
                "wrong",
                DocumentAction::Approve,
            )
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::InvalidPassword)),
            "expected InvalidPassword, got {result:?}"
        );

        let bundle = ctx
            .documents
            .get_document(ctx.tenant_uuid, document)
            .await?;

        assert_eq!(bundle.document.status, DocumentStatus::Sent);

        Ok(())
    }

    #[tokio::test]
    async fn mark_viewed_is_idempotent_for_preventions() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = prevention(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::LandingPage, document))
            .await?;

        let token = issued.link.access_token.as_str();

        let first = svc
            .apply_action(
                LinkChannel::LandingPage,
                token,
                PASSWORD,
                DocumentAction::MarkViewed,
            )
            .await?;

        assert!(first.changed);
        assert_eq!(first.status, DocumentStatus::Viewed);

        let second = svc
            .apply_action(
                LinkChannel::LandingPage,
                token,
                PASSWORD,
                DocumentAction::MarkViewed,
            )
            .await?;

        assert!(!second.changed);
        assert_eq!(second.status, DocumentStatus::Viewed);

        let result = svc
            .apply_action(
                LinkChannel::LandingPage,
                token,
                PASSWORD,
                DocumentAction::Approve,
            )
            .await;

        assert!(
            matches!(
                result,
                Err(AccessLinksServiceError::UnsupportedAction(
                    DocumentKind::Prevention
                ))
            ),
            "expected UnsupportedAction, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rotated_passwords_replace_the_old_one() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let rotated = svc
            .rotate_password(ctx.tenant_uuid, LinkChannel::PublicQuote, issued.link.uuid)
            .await?;

        assert_ne!(rotated.password, PASSWORD);
        assert_eq!(rotated.url, issued.url);

        let token = issued.link.access_token.as_str();

        let result = svc
            .open_link(LinkChannel::PublicQuote, token, PASSWORD)
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::InvalidPassword)),
            "expected InvalidPassword, got {result:?}"
        );

        svc.open_link(LinkChannel::PublicQuote, token, &rotated.password)
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn failed_rotation_keeps_the_old_password() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut mailer = MockMailer::new();
        mailer.expect_send().times(2).returning(move |_, _| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(delivery_failure())
            }
        });

        let svc = service(&ctx, mailer);

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let result = svc
            .rotate_password(ctx.tenant_uuid, LinkChannel::PublicQuote, issued.link.uuid)
            .await;

        assert!(
            matches!(
                result,
                Err(AccessLinksServiceError::EmailFailed {
                    kind: DocumentKind::Quote,
                    ..
                })
            ),
            "expected EmailFailed, got {result:?}"
        );

        svc.open_link(
            LinkChannel::PublicQuote,
            issued.link.access_token.as_str(),
            PASSWORD,
        )
        .await?;

        assert_eq!(calls.load(Ordering::SeqCst), 2);

        Ok(())
    }

    #[tokio::test]
    async fn revoked_links_cannot_be_rotated() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        svc.revoke_link(ctx.tenant_uuid, LinkChannel::PublicQuote, issued.link.uuid)
            .await?;

        let result = svc
            .rotate_password(ctx.tenant_uuid, LinkChannel::PublicQuote, issued.link.uuid)
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tokens_never_cross_tenants() -> TestResult {
        let ctx = TestContext::new().await;
        seed_mail(&ctx).await?;
        let document = quote(&ctx).await?;
        let other = ctx.create_tenant("Other Clinic").await;

        let svc = service(&ctx, delivering());

        let issued = svc
            .create_link(ctx.tenant_uuid, new_link(LinkChannel::PublicQuote, document))
            .await?;

        let result = svc
            .revoke_link(other, LinkChannel::PublicQuote, issued.link.uuid)
            .await;

        assert!(
            matches!(result, Err(AccessLinksServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let links = svc
            .list_links_for_document(other, LinkChannel::PublicQuote, document)
            .await?;

        assert!(links.is_empty());

        Ok(())
    }
}
