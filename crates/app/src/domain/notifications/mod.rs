//! Notifications
//!
//! Tenant email templates, SMTP settings and delivery of access link emails.

pub mod data;
pub mod errors;
pub mod mailer;
pub mod notifier;
pub mod records;
pub mod render;
pub(crate) mod repository;

pub use errors::NotificationError;
pub use mailer::{Mailer, MailerError, SmtpMailer};
pub use notifier::{AccessLinkEmail, AccessLinkNotifier};
