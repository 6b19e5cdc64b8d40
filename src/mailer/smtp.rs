use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use super::{Mailer, OutgoingMail};
use crate::config::SmtpConfig;
use crate::error::DeskError;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(host: &str, cfg: &SmtpConfig) -> Result<Self, DeskError> {
        let builder = if cfg.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        }
        .map_err(|e| DeskError::MailError(format!("invalid smtp relay {host}: {e}")))?
        .port(cfg.port);

        let builder = match (cfg.user.as_deref(), cfg.pass.as_deref()) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.to_string(), pass.to_string()))
            }
            _ => builder,
        };

        let from: Mailbox = cfg
            .from
            .parse()
            .map_err(|e| DeskError::MailError(format!("invalid smtp.from {:?}: {e}", cfg.from)))?;

        info!(host, port = cfg.port, starttls = cfg.starttls, "SMTP mailer configured");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

fn build_message(from: &Mailbox, mail: OutgoingMail) -> Result<Message, DeskError> {
    let mut builder = Message::builder().from(from.clone()).subject(mail.subject);
    for to in &mail.to {
        let mailbox: Mailbox = to
            .parse()
            .map_err(|e| DeskError::MailError(format!("invalid recipient {to:?}: {e}")))?;
        builder = builder.to(mailbox);
    }

    let mut body = MultiPart::mixed().singlepart(SinglePart::plain(mail.body));
    for a in mail.attachments {
        let content_type = ContentType::parse(a.content_type)
            .map_err(|e| DeskError::MailError(format!("bad content type {}: {e}", a.content_type)))?;
        body = body.singlepart(Attachment::new(a.filename).body(a.data, content_type));
    }

    builder
        .multipart(body)
        .map_err(|e| DeskError::MailError(format!("failed to build message: {e}")))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DeskError> {
        let recipients = mail.to.len();
        let message = build_message(&self.from, mail)?;
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DeskError::MailError(format!("smtp send failed: {e}")))?;
        debug!(recipients, code = %response.code(), "mail accepted by relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MailAttachment;

    #[test]
    fn message_carries_attachments() {
        let from: Mailbox = "Front Desk <desk@example.com>".parse().unwrap();
        let mail = OutgoingMail {
            to: vec!["manager@example.com".to_string()],
            subject: "Shift report".to_string(),
            body: "See attached.".to_string(),
            attachments: vec![MailAttachment {
                filename: "report.csv".to_string(),
                content_type: "text/csv",
                data: b"a,b\n1,2\n".to_vec(),
            }],
        };
        let message = build_message(&from, mail).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Shift report"));
        assert!(raw.contains("report.csv"));
    }

    #[test]
    fn bad_recipient_is_rejected() {
        let from: Mailbox = "desk@example.com".parse().unwrap();
        let mail = OutgoingMail {
            to: vec!["not an address".to_string()],
            subject: "x".to_string(),
            body: String::new(),
            attachments: Vec::new(),
        };
        assert!(matches!(
            build_message(&from, mail),
            Err(DeskError::MailError(_))
        ));
    }
}
