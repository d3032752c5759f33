//! Test helpers.

use std::sync::Arc;

use jiff::{Timestamp, civil::date};
use salvo::{affix_state::inject, prelude::*};
use serde_json::json;
use uuid::Uuid;

use tq_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        access_links::{
            MockAccessLinksService,
            data::IssuedAccessLink,
            records::{AccessLinkRecord, AccessLinkUuid, LinkChannel},
            token::AccessToken,
        },
        branding::TenantBranding,
        content::{
            ContentPackage,
            package::{DocumentSection, ResolvedData, ResolvedDocument, ResolvedPatient},
        },
        documents::{
            MockDocumentsService,
            records::{
                DocumentBundle, DocumentKind, DocumentRecord, DocumentStatus, DocumentUuid,
                PatientRecord, PatientUuid,
            },
        },
        settings::MockSettingsService,
        tenants::{MockTenantsService, records::TenantUuid},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::nil());

pub(crate) const TEST_TOKEN: &str =
    "3f7a9c1e5b2d4f6a8c0e2b4d6f8a0c2e4b6d8f0a2c4e6b8d0f2a4c6e8b0d2f4a";

#[salvo::handler]
pub(crate) async fn inject_tenant(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_tenant_uuid(TEST_TENANT_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn sql_error() -> sqlx::Error {
    sqlx::Error::PoolTimedOut
}

fn strict_tenants_mock() -> MockTenantsService {
    let mut tenants = MockTenantsService::new();

    tenants.expect_create_tenant().never();
    tenants.expect_get_tenant().never();

    tenants
}

fn strict_documents_mock() -> MockDocumentsService {
    let mut documents = MockDocumentsService::new();

    documents.expect_create_patient().never();
    documents.expect_create_document().never();
    documents.expect_get_document().never();
    documents.expect_update_document().never();

    documents
}

fn strict_access_links_mock() -> MockAccessLinksService {
    let mut access_links = MockAccessLinksService::new();

    access_links.expect_create_link().never();
    access_links.expect_list_links_for_document().never();
    access_links.expect_revoke_link().never();
    access_links.expect_rotate_password().never();
    access_links.expect_preview_content().never();
    access_links.expect_open_link().never();
    access_links.expect_apply_action().never();

    access_links
}

fn strict_settings_mock() -> MockSettingsService {
    let mut settings = MockSettingsService::new();

    settings.expect_save_email_template().never();
    settings.expect_save_smtp_settings().never();
    settings.expect_get_branding().never();
    settings.expect_save_branding().never();
    settings.expect_create_page_template().never();

    settings
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

fn strict_app() -> AppContext {
    AppContext {
        tenants: Arc::new(strict_tenants_mock()),
        documents: Arc::new(strict_documents_mock()),
        access_links: Arc::new(strict_access_links_mock()),
        settings: Arc::new(strict_settings_mock()),
        auth: Arc::new(strict_auth_mock()),
    }
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    State::from_app_context(AppContext {
        auth: Arc::new(auth),
        ..strict_app()
    })
}

pub(crate) fn state_with_documents(documents: MockDocumentsService) -> Arc<State> {
    State::from_app_context(AppContext {
        documents: Arc::new(documents),
        ..strict_app()
    })
}

pub(crate) fn state_with_access_links(access_links: MockAccessLinksService) -> Arc<State> {
    State::from_app_context(AppContext {
        access_links: Arc::new(access_links),
        ..strict_app()
    })
}

pub(crate) fn state_with_settings(settings: MockSettingsService) -> Arc<State> {
    State::from_app_context(AppContext {
        settings: Arc::new(settings),
        ..strict_app()
    })
}

/// A service for authenticated routes, with the test tenant already resolved.
pub(crate) fn staff_service(state: Arc<State>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state))
            .hoop(inject_tenant)
            .push(route),
    )
}

/// A service for public routes, without any tenant.
pub(crate) fn public_service(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn make_package(kind: DocumentKind, number: &str, total: &str) -> ContentPackage {
    let document = ResolvedDocument {
        number: number.to_string(),
        status: "sent".to_string(),
        total: total.to_string(),
        issued_on: "Jan 5, 2025".to_string(),
        valid_until: None,
        notes: None,
    };

    ContentPackage {
        template: json!({ "layout": "default" }),
        resolved_data: ResolvedData {
            document: match kind {
                DocumentKind::Quote => DocumentSection::Quote(document),
                DocumentKind::Prevention => DocumentSection::Prevention(document),
            },
            patient: ResolvedPatient {
                first_name: "Ana".to_string(),
                last_name: "Souza".to_string(),
                full_name: "Ana Souza".to_string(),
                email: Some("ana@example.com".to_string()),
            },
            items: Vec::new(),
        },
    }
}

pub(crate) fn make_branding() -> TenantBranding {
    TenantBranding {
        company_name: Some("Clínica Sorriso".to_string()),
        logo_url: None,
        primary_color: "#0f766e".to_string(),
        secondary_color: "#14b8a6".to_string(),
        contact_email: None,
        contact_phone: None,
        website: None,
        instagram: None,
        facebook: None,
        whatsapp: None,
    }
}

pub(crate) fn make_link(uuid: AccessLinkUuid, channel: LinkChannel) -> AccessLinkRecord {
    AccessLinkRecord {
        uuid,
        document_uuid: DocumentUuid::from_uuid(Uuid::nil()),
        document_kind: DocumentKind::Quote,
        channel,
        access_token: AccessToken::generate(),
        password_hash: Some("$2b$10$hash".to_string()),
        recipient_email: Some("ana@example.com".to_string()),
        template_uuid: None,
        content: make_package(DocumentKind::Quote, "Q-001", "$100.00"),
        active: true,
        expires_at: None,
        views_count: 0,
        last_viewed_at: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_issued_link(uuid: AccessLinkUuid, channel: LinkChannel) -> IssuedAccessLink {
    let link = make_link(uuid, channel);

    IssuedAccessLink {
        url: format!(
            "https://app.example.com/{}/{}",
            channel.path_segment(),
            link.access_token.as_str()
        ),
        link,
        password: "Ab3xZ9Qr".to_string(),
    }
}

pub(crate) fn make_bundle(uuid: DocumentUuid, kind: DocumentKind) -> DocumentBundle {
    let patient_uuid = PatientUuid::from_uuid(Uuid::nil());

    DocumentBundle {
        document: DocumentRecord {
            uuid,
            patient_uuid,
            kind,
            number: "Q-001".to_string(),
            status: DocumentStatus::Sent,
            total: 10_000,
            issued_on: date(2025, 1, 5),
            valid_until: None,
            notes: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        patient: PatientRecord {
            uuid: patient_uuid,
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: Some("ana@example.com".to_string()),
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        },
        items: Vec::new(),
    }
}
