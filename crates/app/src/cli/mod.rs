use clap::{Parser, Subcommand};

mod db;
mod tenant;
mod token;

#[derive(Debug, Parser)]
#[command(name = "tq-app", about = "Administration for public document links", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage tenants
    Tenant(tenant::TenantCommand),

    /// Manage staff API tokens
    Token(token::TokenCommand),

    /// Database administration
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Tenant(command) => tenant::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Shared connection argument for every subcommand.
#[derive(Debug, clap::Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub(crate) database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn connect(&self) -> Result<sqlx::PgPool, String> {
        tq_app::database::connect(&self.database_url, 1)
            .await
            .map_err(|error| format!("failed to connect to database: {error}"))
    }
}
