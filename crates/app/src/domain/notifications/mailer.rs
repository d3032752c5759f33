//! Outbound email delivery over SMTP.

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    address::AddressError,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        self,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use mockall::automock;
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

/// Connection details for a tenant's SMTP server.
#[derive(Debug, Clone)]
pub struct SmtpTransportSettings {
    pub host: String,
    pub port: u16,

    /// Implicit TLS when set, opportunistic STARTTLS otherwise.
    pub secure: bool,

    pub username: String,
    pub password: Zeroizing<String>,
}

/// A fully rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from_address: String,
    pub from_name: Option<String>,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("invalid email address")]
    InvalidAddress(#[from] AddressError),

    #[error("failed to build email message")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error")]
    Transport(#[from] smtp::Error),
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver `email` through the given SMTP server.
    async fn send(
        &self,
        transport: &SmtpTransportSettings,
        email: OutgoingEmail,
    ) -> Result<(), MailerError>;
}

/// Sends mail through `lettre`, opening a transport per tenant server.
#[derive(Debug, Clone, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(
        &self,
        transport: &SmtpTransportSettings,
        email: OutgoingEmail,
    ) -> Result<(), MailerError> {
        let message = build_message(email)?;
        let mailer = build_transport(transport)?;

        let response = mailer.send(message).await?;

        debug!(
            host = %transport.host,
            code = %response.code(),
            "email accepted by SMTP server"
        );

        Ok(())
    }
}

fn build_transport(
    settings: &SmtpTransportSettings,
) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
    let credentials = Credentials::new(settings.username.clone(), settings.password.to_string());

    let builder = if settings.secure {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
    } else {
        let parameters = TlsParameters::new(settings.host.clone())?;

        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .tls(Tls::Opportunistic(parameters))
    };

    Ok(builder
        .port(settings.port)
        .credentials(credentials)
        .build())
}

fn build_message(email: OutgoingEmail) -> Result<Message, MailerError> {
    let from = Mailbox::new(email.from_name, email.from_address.parse::<Address>()?);
    let to = Mailbox::new(None, email.to.parse::<Address>()?);

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject)
        .header(ContentType::TEXT_HTML)
        .body(email.html_body)?)
}
