//! Public Links Config

use clap::Args;

/// Public link settings.
#[derive(Debug, Args)]
pub struct PublicLinksConfig {
    /// Base URL public quote and landing page links are built on
    #[arg(long, env = "TQ_ORIGIN")]
    pub origin: String,
}
