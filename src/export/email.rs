use shiftdesk_core::Shift;

use super::csv_report::render_csv;
use super::pdf::render_pdf;
use super::{Line, report_filename, report_lines};
use crate::db::{EmailSettings, ReportBundle};
use crate::error::DeskError;
use crate::mailer::{MailAttachment, OutgoingMail};

/// Which files ride along with the report email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentChoice {
    pub pdf: bool,
    pub csv: bool,
}

impl AttachmentChoice {
    pub fn from_settings(settings: Option<&EmailSettings>) -> Self {
        match settings {
            Some(s) => Self {
                pdf: s.attach_pdf,
                csv: s.attach_csv,
            },
            None => Self {
                pdf: true,
                csv: false,
            },
        }
    }
}

pub fn subject(bundle: &ReportBundle, shift: Shift) -> String {
    format!(
        "[{}] {} shift report - {}",
        bundle.property.name, shift, bundle.report.report_date
    )
}

/// Plain-text body: the shift's section of the report.
pub fn body(bundle: &ReportBundle, shift: Shift) -> String {
    let mut out = String::new();
    for line in report_lines(bundle, Some(shift)) {
        match line {
            Line::Title(t) | Line::Heading(t) => {
                out.push_str(&t);
                out.push('\n');
                out.push_str(&"-".repeat(t.chars().count()));
            }
            Line::Text(t) => out.push_str(&t),
            Line::Blank => {}
        }
        out.push('\n');
    }
    out
}

/// Builds the report email. PDF rendering is CPU-bound and runs on the blocking pool.
pub async fn compose(
    bundle: ReportBundle,
    shift: Shift,
    recipients: Vec<String>,
    attach: AttachmentChoice,
) -> Result<OutgoingMail, DeskError> {
    tokio::task::spawn_blocking(move || -> Result<OutgoingMail, DeskError> {
        let mut attachments = Vec::new();
        if attach.pdf {
            attachments.push(MailAttachment {
                filename: report_filename(&bundle, "pdf"),
                content_type: "application/pdf",
                data: render_pdf(&bundle, None)?,
            });
        }
        if attach.csv {
            attachments.push(MailAttachment {
                filename: report_filename(&bundle, "csv"),
                content_type: "text/csv",
                data: render_csv(&bundle)?,
            });
        }
        Ok(OutgoingMail {
            to: recipients,
            subject: subject(&bundle, shift),
            body: body(&bundle, shift),
            attachments,
        })
    })
    .await
    .map_err(|e| DeskError::UnexpectedError(format!("report render task failed: {e}")))?
}
