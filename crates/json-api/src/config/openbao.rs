//! OpenBao Config

use clap::Args;

use tq_app::secrets::OpenBaoConfig;

/// `OpenBao` Transit settings.
#[derive(Debug, Args)]
pub struct OpenBaoArgs {
    /// `OpenBao` server address
    #[arg(long = "openbao-addr", env = "OPENBAO_ADDR")]
    pub addr: String,

    /// `OpenBao` authentication token
    #[arg(long = "openbao-token", env = "OPENBAO_TOKEN", hide_env_values = true)]
    pub token: String,

    /// `OpenBao` Transit key name
    #[arg(long = "openbao-transit-key", env = "OPENBAO_TRANSIT_KEY")]
    pub transit_key: String,
}

impl OpenBaoArgs {
    pub(crate) fn to_openbao_config(&self) -> OpenBaoConfig {
        OpenBaoConfig {
            addr: self.addr.clone(),
            token: self.token.clone(),
            transit_key: self.transit_key.clone(),
        }
    }
}
