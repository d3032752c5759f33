use clap::Args;
use jiff::tz::TimeZone;
use tq_app::domain::tenants::{
    PgTenantsService, TenantsService, data::NewTenant, records::TenantUuid,
};
use uuid::Uuid;

use crate::cli::DatabaseArgs;

#[derive(Debug, Args)]
pub(crate) struct CreateTenantArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Tenant display name
    #[arg(long)]
    name: String,

    /// IANA timezone, e.g. America/Sao_Paulo; picks the email and page language
    #[arg(long)]
    timezone: Option<String>,

    /// Optional tenant UUID; generated when omitted
    #[arg(long)]
    tenant_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateTenantArgs) -> Result<(), String> {
    if let Some(timezone) = args.timezone.as_deref() {
        TimeZone::get(timezone.trim())
            .map_err(|error| format!("invalid timezone `{timezone}`: {error}"))?;
    }

    let pool = args.database.connect().await?;

    let tenant = PgTenantsService::new(pool)
        .create_tenant(NewTenant {
            uuid: args
                .tenant_uuid
                .map_or_else(TenantUuid::new, TenantUuid::from_uuid),
            name: args.name,
            timezone: args.timezone,
        })
        .await
        .map_err(|error| format!("failed to create tenant: {error}"))?;

    println!("tenant_uuid: {}", tenant.uuid);
    println!("tenant_name: {}", tenant.name);
    println!("tenant_locale: {}", tenant.locale());

    Ok(())
}
