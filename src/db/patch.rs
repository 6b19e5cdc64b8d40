use shiftdesk_core::Role;

// Request payloads double as storage payloads; re-exported so callers only need `db::patch`.
pub use shiftdesk_schema::{
    agent::AgentShiftCreate,
    announcement::AnnouncementCreate,
    checkin::{CheckinCreate, CheckinPatch},
    duty::{DutyCreate, DutyPatch},
    email::EmailSettingsUpsert,
    notes::NotesUpsert,
    package::{PackageAuditUpsert, PackageCreate, PackagePatch},
    property::{PropertyCreate, PropertyPatch},
    report::{ReportCreate, ReportPatch},
    resident::{ResidentCreate, ResidentPatch},
    template::{DutyTemplateCreate, DutyTemplatePatch},
};

/// New account with the password already hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Role,
}

/// `None` => do not change; `Some(v)` => update
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub password_hash: Option<String>,
}
