//! Server configuration module

use clap::Parser;

use tq_app::context::AppConfig;

use crate::config::{
    db::DatabaseConfig,
    links::PublicLinksConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    openbao::OpenBaoArgs,
    server::ServerRuntimeConfig,
};

pub(crate) mod db;
pub(crate) mod links;
pub(crate) mod observability;
pub(crate) mod openbao;
pub(crate) mod server;

/// TQ JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "tq-json", about = "TQ JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Request observability settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// `OpenBao` Transit settings used to protect SMTP passwords.
    #[command(flatten)]
    pub openbao: OpenBaoArgs,

    /// Public link settings.
    #[command(flatten)]
    pub links: PublicLinksConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings the application services are built from.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            database_max_connections: self.database.database_max_connections,
            openbao: self.openbao.to_openbao_config(),
            origin: self.links.origin.clone(),
        }
    }
}
