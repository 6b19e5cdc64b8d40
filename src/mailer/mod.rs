//! Outgoing email. Handlers and the dispatcher only see the `Mailer` trait.

mod smtp;

pub use smtp::SmtpMailer;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::config::SmtpConfig;
use crate::error::DeskError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: &'static str,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub attachments: Vec<MailAttachment>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DeskError>;
}

/// Used when no SMTP host is configured; every send fails and is logged by the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DeskError> {
        Err(DeskError::MailError(format!(
            "SMTP is not configured; dropped \"{}\"",
            mail.subject
        )))
    }
}

/// SMTP when `smtp.host` is set, otherwise the disabled mailer.
pub fn from_config(cfg: &SmtpConfig) -> Result<Arc<dyn Mailer>, DeskError> {
    match cfg.host.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(host) => Ok(Arc::new(SmtpMailer::new(host, cfg)?)),
        None => {
            warn!("smtp.host is not set; outgoing email is disabled");
            Ok(Arc::new(DisabledMailer))
        }
    }
}
