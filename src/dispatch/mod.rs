//! Report emailing: the scheduled 07:00 / 15:00 / 23:00 pass and on-demand sends.
//!
//! All sends go through one actor, so the "already sent" check and the write that marks a
//! shift sent never interleave with another send of the same report.

mod actor;

pub use actor::{DispatchArgs, DispatcherHandle, spawn};

use chrono::NaiveDate;
use serde::Serialize;
use shiftdesk_core::Shift;
use shiftdesk_schema::DispatchSummary;
use std::sync::Arc;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::db::{DailyReport, DbActorHandle, EmailSettings};
use crate::error::DeskError;
use crate::export::email::{AttachmentChoice, compose};
use crate::mailer::Mailer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    AlreadySent,
    AutoSendOff,
}

/// Result of an on-demand send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    pub report_id: i64,
    pub shift: Shift,
    pub recipients: Vec<String>,
    pub attachments: Vec<String>,
}

/// Property recipients, or the configured fallback list when the property has none.
pub fn resolve_recipients(settings: Option<&EmailSettings>, defaults: &[String]) -> Vec<String> {
    match settings {
        Some(s) if !s.recipients.is_empty() => s.recipients.0.clone(),
        _ => defaults.to_vec(),
    }
}

#[derive(Clone)]
pub struct Dispatcher {
    db: DbActorHandle,
    mailer: Arc<dyn Mailer>,
    default_recipients: Arc<[String]>,
    clock: Clock,
}

impl Dispatcher {
    pub fn new(
        db: DbActorHandle,
        mailer: Arc<dyn Mailer>,
        default_recipients: Vec<String>,
        clock: Clock,
    ) -> Self {
        Self {
            db,
            mailer,
            default_recipients: default_recipients.into(),
            clock,
        }
    }

    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Emails every report dated `date` whose current shift is `shift` and that has not
    /// been sent for that shift yet. A failing report is logged and counted; the pass goes on.
    pub async fn run(&self, date: NaiveDate, shift: Shift) -> Result<DispatchSummary, DeskError> {
        let reports = self.db.reports_due_for_dispatch(date, shift).await?;
        let mut summary = DispatchSummary {
            date,
            shift,
            sent: 0,
            skipped: 0,
            failed: 0,
        };

        for report in &reports {
            match self.dispatch_one(report, shift).await {
                Ok(Outcome::Sent) => summary.sent += 1,
                Ok(outcome) => {
                    info!(report_id = report.id, shift = %shift, ?outcome, "report skipped");
                    summary.skipped += 1;
                }
                Err(e) => {
                    warn!(
                        report_id = report.id,
                        property_id = report.property_id,
                        shift = %shift,
                        error = %e,
                        "report dispatch failed"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            date = %summary.date,
            shift = %summary.shift,
            sent = summary.sent,
            skipped = summary.skipped,
            failed = summary.failed,
            "dispatch pass finished"
        );
        Ok(summary)
    }

    async fn dispatch_one(&self, report: &DailyReport, shift: Shift) -> Result<Outcome, DeskError> {
        if report.shift_status.is_sent(shift) {
            return Ok(Outcome::AlreadySent);
        }
        let settings = self.db.get_email_settings(report.property_id).await?;
        if settings.as_ref().is_some_and(|s| !s.auto_send) {
            return Ok(Outcome::AutoSendOff);
        }
        self.deliver(report.id, shift, None, settings.as_ref()).await?;
        Ok(Outcome::Sent)
    }

    /// Sends one report now, regardless of its sent flag, then marks the shift sent.
    /// `shift` defaults to the report's current shift, then to the shift of the current hour.
    pub async fn send_now(
        &self,
        report_id: i64,
        shift: Option<Shift>,
        recipients: Option<Vec<String>>,
    ) -> Result<SendReceipt, DeskError> {
        let report = self.db.get_report(report_id).await?;
        let shift = shift
            .or(report.current_shift)
            .unwrap_or_else(|| Shift::classify(self.clock.hour()));
        let settings = self.db.get_email_settings(report.property_id).await?;
        self.deliver(report.id, shift, recipients, settings.as_ref())
            .await
    }

    async fn deliver(
        &self,
        report_id: i64,
        shift: Shift,
        recipients: Option<Vec<String>>,
        settings: Option<&EmailSettings>,
    ) -> Result<SendReceipt, DeskError> {
        let recipients = recipients
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| resolve_recipients(settings, &self.default_recipients));
        if recipients.is_empty() {
            return Err(DeskError::NoRecipients);
        }

        let bundle = self.db.report_details(report_id).await?;
        let mail = compose(
            bundle,
            shift,
            recipients.clone(),
            AttachmentChoice::from_settings(settings),
        )
        .await?;
        let attachments = mail.attachments.iter().map(|a| a.filename.clone()).collect();

        self.mailer.send(mail).await?;
        self.db
            .mark_shift_sent(report_id, shift, self.clock.now_utc())
            .await?;

        info!(
            report_id,
            shift = %shift,
            recipients = recipients.len(),
            "report emailed"
        );
        Ok(SendReceipt {
            report_id,
            shift,
            recipients,
            attachments,
        })
    }
}
