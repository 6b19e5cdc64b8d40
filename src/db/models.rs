use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use shiftdesk_core::{
    PackageStatus, Role, RosterEntry, RosterRange, Shift, ShiftStatusMap,
};
use sqlx::{FromRow, types::Json};

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordResetToken {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One report per property per calendar day.
#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyReport {
    pub id: i64,
    pub property_id: i64,
    pub report_date: NaiveDate,
    pub agent_name: Option<String>,
    pub current_shift: Option<Shift>,
    pub shift_status: Json<ShiftStatusMap>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuestCheckin {
    pub id: i64,
    pub report_id: i64,
    pub shift: Shift,
    pub guest_name: String,
    pub unit: Option<String>,
    pub resident_id: Option<i64>,
    pub purpose: Option<String>,
    pub id_verified: bool,
    pub checked_in_at: NaiveDateTime,
    pub checked_out_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i64,
    pub report_id: i64,
    pub shift: Shift,
    pub recipient_name: String,
    pub unit: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub status: PackageStatus,
    pub received_at: NaiveDateTime,
    pub picked_up_at: Option<NaiveDateTime>,
    pub picked_up_by: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PackageAudit {
    pub id: i64,
    pub report_id: i64,
    pub shift: Shift,
    pub packages_on_hand: i64,
    pub discrepancies: Option<String>,
    pub audited_by: Option<String>,
    pub audited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DailyDuty {
    pub id: i64,
    pub report_id: i64,
    /// Set when the duty was seeded from a template.
    pub template_id: Option<i64>,
    pub shift: Shift,
    pub task: String,
    pub sort_order: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ShiftNotes {
    pub id: i64,
    pub report_id: i64,
    pub shift: Shift,
    pub content: String,
    pub agent_name: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub id: i64,
    pub property_id: i64,
    pub recipients: Json<Vec<String>>,
    pub auto_send: bool,
    pub attach_pdf: bool,
    pub attach_csv: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub unit: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DutyTemplate {
    pub id: i64,
    pub property_id: i64,
    pub shift: Shift,
    pub task: String,
    pub sort_order: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AgentShiftAssignment {
    pub id: i64,
    pub property_id: i64,
    pub shift_range: RosterRange,
    pub agent_name: String,
    pub created_at: DateTime<Utc>,
}

impl RosterEntry for AgentShiftAssignment {
    fn roster_range(&self) -> RosterRange {
        self.shift_range
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: i64,
    pub property_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub created_by: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Announcement {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// Everything that goes into an exported or emailed report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportBundle {
    pub report: DailyReport,
    pub property: Property,
    pub checkins: Vec<GuestCheckin>,
    pub packages: Vec<Package>,
    pub package_audits: Vec<PackageAudit>,
    pub duties: Vec<DailyDuty>,
    pub notes: Vec<ShiftNotes>,
}

impl ReportBundle {
    pub fn notes_for(&self, shift: Shift) -> Option<&ShiftNotes> {
        self.notes.iter().find(|n| n.shift == shift)
    }

    pub fn audit_for(&self, shift: Shift) -> Option<&PackageAudit> {
        self.package_audits.iter().find(|a| a.shift == shift)
    }
}
