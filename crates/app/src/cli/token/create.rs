use clap::Args;
use jiff::Timestamp;
use tq_app::{auth::PgAuthService, domain::tenants::records::TenantUuid};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTokenArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Tenant UUID that should own the token
    #[arg(long)]
    tenant_uuid: Uuid,

    /// Optional expiry (RFC 3339)
    #[arg(long)]
    expires_at: Option<Timestamp>,
}

pub(crate) async fn run(args: CreateTokenArgs) -> Result<(), String> {
    if args
        .expires_at
        .is_some_and(|expires_at| expires_at <= Timestamp::now())
    {
        return Err("expires-at must be in the future".to_string());
    }

    let pool = args.database.connect().await?;

    let issued = PgAuthService::new(pool)
        .issue_api_token(TenantUuid::from_uuid(args.tenant_uuid), args.expires_at)
        .await
        .map_err(|error| format!("failed to create token: {error}"))?;

    println!("token_uuid: {}", issued.metadata.uuid);
    println!("tenant_uuid: {}", issued.metadata.tenant_uuid);
    println!("created_at: {}", issued.metadata.created_at);

    if let Some(expires_at) = issued.metadata.expires_at {
        println!("expires_at: {expires_at}");
    }

    println!("api_token: {}", issued.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
