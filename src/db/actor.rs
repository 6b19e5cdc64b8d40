use crate::db::models::{
    AgentShiftAssignment, Announcement, DailyDuty, DailyReport, DbUser, DutyTemplate,
    EmailSettings, GuestCheckin, Package, PackageAudit, Property, ReportBundle, Resident,
    ShiftNotes,
};
use crate::db::patch::{
    AgentShiftCreate, AnnouncementCreate, CheckinCreate, CheckinPatch, DutyCreate, DutyPatch,
    DutyTemplateCreate, DutyTemplatePatch, EmailSettingsUpsert, NotesUpsert, PackageAuditUpsert,
    PackageCreate, PackagePatch, PropertyCreate, PropertyPatch, ReportCreate, ReportPatch,
    ResidentCreate, ResidentPatch, UserCreate, UserUpdate,
};
use crate::db::queries::{
    agents, announcements, checkins, duties, email_settings, notes, packages, properties,
    reports, residents, templates, users,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::DeskError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use shiftdesk_core::Shift;
use shiftdesk_schema::ReportQuery;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use tracing::info;

type Reply<T> = RpcReplyPort<Result<T, DeskError>>;

/// Every storage operation. The actor handles one message at a time, so each variant runs
/// to completion (including its transaction) before the next starts.
#[derive(Debug)]
pub enum DbActorMessage {
    // users and password reset
    ListUsers(Reply<Vec<DbUser>>),
    GetUser(i64, Reply<DbUser>),
    FindUserByUsername(String, Reply<Option<DbUser>>),
    FindUserByIdentifier(String, Reply<Option<DbUser>>),
    CreateUser(UserCreate, Reply<DbUser>),
    UpdateUser(i64, UserUpdate, Reply<DbUser>),
    DeleteUser(i64, Reply<()>),
    /// Bootstrap manager (username, password hash); only on an empty users table.
    EnsureAdmin(String, String, Reply<bool>),
    CreateResetToken(i64, String, DateTime<Utc>, Reply<()>),
    CheckResetToken(String, DateTime<Utc>, Reply<DbUser>),
    ConsumeResetToken(String, String, DateTime<Utc>, Reply<DbUser>),

    // properties
    ListProperties(Reply<Vec<Property>>),
    GetProperty(i64, Reply<Property>),
    CreateProperty(PropertyCreate, Reply<Property>),
    UpdateProperty(i64, PropertyPatch, Reply<Property>),
    DeleteProperty(i64, Reply<()>),

    // reports
    ListReports(ReportQuery, Reply<Vec<DailyReport>>),
    GetReport(i64, Reply<DailyReport>),
    FindOrCreateReport(ReportCreate, Reply<(DailyReport, bool)>),
    UpdateReport(i64, ReportPatch, Reply<DailyReport>),
    DeleteReport(i64, Reply<()>),
    ReportDetails(i64, Reply<ReportBundle>),
    SeedDuties(i64, Reply<u64>),
    SyncCurrentReport {
        property_id: i64,
        date: NaiveDate,
        shift: Shift,
        agent: Option<String>,
        reply: Reply<DailyReport>,
    },
    ReportsDueForDispatch(NaiveDate, Shift, Reply<Vec<DailyReport>>),
    MarkShiftCompleted(i64, Shift, DateTime<Utc>, Reply<DailyReport>),
    /// Replies `false` if the shift was already marked sent.
    MarkShiftSent(i64, Shift, DateTime<Utc>, Reply<bool>),

    // report children
    ListCheckins(i64, Reply<Vec<GuestCheckin>>),
    CreateCheckin(i64, CheckinCreate, NaiveDateTime, Reply<GuestCheckin>),
    UpdateCheckin(i64, CheckinPatch, Reply<GuestCheckin>),
    DeleteCheckin(i64, Reply<()>),
    ListPackages(i64, Reply<Vec<Package>>),
    CreatePackage(i64, PackageCreate, NaiveDateTime, Reply<Package>),
    UpdatePackage(i64, PackagePatch, NaiveDateTime, Reply<Package>),
    DeletePackage(i64, Reply<()>),
    ListPackageAudits(i64, Reply<Vec<PackageAudit>>),
    UpsertPackageAudit(i64, Shift, PackageAuditUpsert, Reply<PackageAudit>),
    ListDuties(i64, Reply<Vec<DailyDuty>>),
    CreateDuty(i64, DutyCreate, Reply<DailyDuty>),
    UpdateDuty(i64, DutyPatch, String, Reply<DailyDuty>),
    DeleteDuty(i64, Reply<()>),
    ListNotes(i64, Reply<Vec<ShiftNotes>>),
    UpsertNotes(i64, Shift, NotesUpsert, Reply<ShiftNotes>),

    // property configuration
    GetEmailSettings(i64, Reply<Option<EmailSettings>>),
    UpsertEmailSettings(i64, EmailSettingsUpsert, Reply<EmailSettings>),
    ListResidents(i64, Reply<Vec<Resident>>),
    CreateResident(i64, ResidentCreate, Reply<Resident>),
    ImportResidents(i64, Vec<ResidentCreate>, Reply<usize>),
    UpdateResident(i64, ResidentPatch, Reply<Resident>),
    DeleteResident(i64, Reply<()>),
    ListDutyTemplates(i64, Reply<Vec<DutyTemplate>>),
    CreateDutyTemplate(i64, DutyTemplateCreate, Reply<DutyTemplate>),
    UpdateDutyTemplate(i64, DutyTemplatePatch, Reply<DutyTemplate>),
    DeleteDutyTemplate(i64, Reply<()>),
    ListAgentShifts(i64, Reply<Vec<AgentShiftAssignment>>),
    CreateAgentShift(i64, AgentShiftCreate, Reply<AgentShiftAssignment>),
    DeleteAgentShift(i64, Reply<()>),
    ListAnnouncements(Option<i64>, DateTime<Utc>, Reply<Vec<Announcement>>),
    CreateAnnouncement(AnnouncementCreate, Option<String>, Reply<Announcement>),
    DeleteAnnouncement(i64, Reply<()>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    async fn rpc<T>(
        &self,
        op: &'static str,
        build: impl FnOnce(Reply<T>) -> DbActorMessage,
    ) -> Result<T, DeskError>
    where
        T: Send + 'static,
    {
        ractor::call!(self.actor, build)
            .map_err(|e| DeskError::RactorError(format!("DbActor {op} RPC failed: {e}")))?
    }

    pub async fn list_users(&self) -> Result<Vec<DbUser>, DeskError> {
        self.rpc("ListUsers", DbActorMessage::ListUsers).await
    }

    pub async fn get_user(&self, id: i64) -> Result<DbUser, DeskError> {
        self.rpc("GetUser", |r| DbActorMessage::GetUser(id, r)).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<DbUser>, DeskError> {
        let username = username.to_string();
        self.rpc("FindUserByUsername", |r| {
            DbActorMessage::FindUserByUsername(username, r)
        })
        .await
    }

    pub async fn find_user_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<DbUser>, DeskError> {
        let identifier = identifier.to_string();
        self.rpc("FindUserByIdentifier", |r| {
            DbActorMessage::FindUserByIdentifier(identifier, r)
        })
        .await
    }

    pub async fn create_user(&self, create: UserCreate) -> Result<DbUser, DeskError> {
        self.rpc("CreateUser", |r| DbActorMessage::CreateUser(create, r))
            .await
    }

    pub async fn update_user(&self, id: i64, update: UserUpdate) -> Result<DbUser, DeskError> {
        self.rpc("UpdateUser", |r| DbActorMessage::UpdateUser(id, update, r))
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteUser", |r| DbActorMessage::DeleteUser(id, r)).await
    }

    pub async fn ensure_admin(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<bool, DeskError> {
        self.rpc("EnsureAdmin", |r| {
            DbActorMessage::EnsureAdmin(username, password_hash, r)
        })
        .await
    }

    pub async fn create_reset_token(
        &self,
        user_id: i64,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), DeskError> {
        self.rpc("CreateResetToken", |r| {
            DbActorMessage::CreateResetToken(user_id, token, expires_at, r)
        })
        .await
    }

    pub async fn check_reset_token(
        &self,
        token: String,
        now: DateTime<Utc>,
    ) -> Result<DbUser, DeskError> {
        self.rpc("CheckResetToken", |r| {
            DbActorMessage::CheckResetToken(token, now, r)
        })
        .await
    }

    pub async fn consume_reset_token(
        &self,
        token: String,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<DbUser, DeskError> {
        self.rpc("ConsumeResetToken", |r| {
            DbActorMessage::ConsumeResetToken(token, password_hash, now, r)
        })
        .await
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>, DeskError> {
        self.rpc("ListProperties", DbActorMessage::ListProperties)
            .await
    }

    pub async fn get_property(&self, id: i64) -> Result<Property, DeskError> {
        self.rpc("GetProperty", |r| DbActorMessage::GetProperty(id, r))
            .await
    }

    pub async fn create_property(&self, create: PropertyCreate) -> Result<Property, DeskError> {
        self.rpc("CreateProperty", |r| {
            DbActorMessage::CreateProperty(create, r)
        })
        .await
    }

    pub async fn update_property(
        &self,
        id: i64,
        patch: PropertyPatch,
    ) -> Result<Property, DeskError> {
        self.rpc("UpdateProperty", |r| {
            DbActorMessage::UpdateProperty(id, patch, r)
        })
        .await
    }

    pub async fn delete_property(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteProperty", |r| DbActorMessage::DeleteProperty(id, r))
            .await
    }

    pub async fn list_reports(&self, query: ReportQuery) -> Result<Vec<DailyReport>, DeskError> {
        self.rpc("ListReports", |r| DbActorMessage::ListReports(query, r))
            .await
    }

    pub async fn get_report(&self, id: i64) -> Result<DailyReport, DeskError> {
        self.rpc("GetReport", |r| DbActorMessage::GetReport(id, r)).await
    }

    pub async fn find_or_create_report(
        &self,
        create: ReportCreate,
    ) -> Result<(DailyReport, bool), DeskError> {
        self.rpc("FindOrCreateReport", |r| {
            DbActorMessage::FindOrCreateReport(create, r)
        })
        .await
    }

    pub async fn update_report(
        &self,
        id: i64,
        patch: ReportPatch,
    ) -> Result<DailyReport, DeskError> {
        self.rpc("UpdateReport", |r| {
            DbActorMessage::UpdateReport(id, patch, r)
        })
        .await
    }

    pub async fn delete_report(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteReport", |r| DbActorMessage::DeleteReport(id, r))
            .await
    }

    pub async fn report_details(&self, id: i64) -> Result<ReportBundle, DeskError> {
        self.rpc("ReportDetails", |r| DbActorMessage::ReportDetails(id, r))
            .await
    }

    pub async fn seed_duties(&self, report_id: i64) -> Result<u64, DeskError> {
        self.rpc("SeedDuties", |r| DbActorMessage::SeedDuties(report_id, r))
            .await
    }

    pub async fn sync_current_report(
        &self,
        property_id: i64,
        date: NaiveDate,
        shift: Shift,
        agent: Option<String>,
    ) -> Result<DailyReport, DeskError> {
        self.rpc("SyncCurrentReport", |reply| {
            DbActorMessage::SyncCurrentReport {
                property_id,
                date,
                shift,
                agent,
                reply,
            }
        })
        .await
    }

    pub async fn reports_due_for_dispatch(
        &self,
        date: NaiveDate,
        shift: Shift,
    ) -> Result<Vec<DailyReport>, DeskError> {
        self.rpc("ReportsDueForDispatch", |r| {
            DbActorMessage::ReportsDueForDispatch(date, shift, r)
        })
        .await
    }

    pub async fn mark_shift_completed(
        &self,
        id: i64,
        shift: Shift,
        at: DateTime<Utc>,
    ) -> Result<DailyReport, DeskError> {
        self.rpc("MarkShiftCompleted", |r| {
            DbActorMessage::MarkShiftCompleted(id, shift, at, r)
        })
        .await
    }

    pub async fn mark_shift_sent(
        &self,
        id: i64,
        shift: Shift,
        at: DateTime<Utc>,
    ) -> Result<bool, DeskError> {
        self.rpc("MarkShiftSent", |r| {
            DbActorMessage::MarkShiftSent(id, shift, at, r)
        })
        .await
    }

    pub async fn list_checkins(&self, report_id: i64) -> Result<Vec<GuestCheckin>, DeskError> {
        self.rpc("ListCheckins", |r| DbActorMessage::ListCheckins(report_id, r))
            .await
    }

    pub async fn create_checkin(
        &self,
        report_id: i64,
        create: CheckinCreate,
        now_local: NaiveDateTime,
    ) -> Result<GuestCheckin, DeskError> {
        self.rpc("CreateCheckin", |r| {
            DbActorMessage::CreateCheckin(report_id, create, now_local, r)
        })
        .await
    }

    pub async fn update_checkin(
        &self,
        id: i64,
        patch: CheckinPatch,
    ) -> Result<GuestCheckin, DeskError> {
        self.rpc("UpdateCheckin", |r| {
            DbActorMessage::UpdateCheckin(id, patch, r)
        })
        .await
    }

    pub async fn delete_checkin(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteCheckin", |r| DbActorMessage::DeleteCheckin(id, r))
            .await
    }

    pub async fn list_packages(&self, report_id: i64) -> Result<Vec<Package>, DeskError> {
        self.rpc("ListPackages", |r| DbActorMessage::ListPackages(report_id, r))
            .await
    }

    pub async fn create_package(
        &self,
        report_id: i64,
        create: PackageCreate,
        now_local: NaiveDateTime,
    ) -> Result<Package, DeskError> {
        self.rpc("CreatePackage", |r| {
            DbActorMessage::CreatePackage(report_id, create, now_local, r)
        })
        .await
    }

    pub async fn update_package(
        &self,
        id: i64,
        patch: PackagePatch,
        now_local: NaiveDateTime,
    ) -> Result<Package, DeskError> {
        self.rpc("UpdatePackage", |r| {
            DbActorMessage::UpdatePackage(id, patch, now_local, r)
        })
        .await
    }

    pub async fn delete_package(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeletePackage", |r| DbActorMessage::DeletePackage(id, r))
            .await
    }

    pub async fn list_package_audits(
        &self,
        report_id: i64,
    ) -> Result<Vec<PackageAudit>, DeskError> {
        self.rpc("ListPackageAudits", |r| {
            DbActorMessage::ListPackageAudits(report_id, r)
        })
        .await
    }

    pub async fn upsert_package_audit(
        &self,
        report_id: i64,
        shift: Shift,
        audit: PackageAuditUpsert,
    ) -> Result<PackageAudit, DeskError> {
        self.rpc("UpsertPackageAudit", |r| {
            DbActorMessage::UpsertPackageAudit(report_id, shift, audit, r)
        })
        .await
    }

    pub async fn list_duties(&self, report_id: i64) -> Result<Vec<DailyDuty>, DeskError> {
        self.rpc("ListDuties", |r| DbActorMessage::ListDuties(report_id, r))
            .await
    }

    pub async fn create_duty(
        &self,
        report_id: i64,
        create: DutyCreate,
    ) -> Result<DailyDuty, DeskError> {
        self.rpc("CreateDuty", |r| {
            DbActorMessage::CreateDuty(report_id, create, r)
        })
        .await
    }

    /// `completer` is recorded when the duty becomes completed without a `completedBy`.
    pub async fn update_duty(
        &self,
        id: i64,
        patch: DutyPatch,
        completer: String,
    ) -> Result<DailyDuty, DeskError> {
        self.rpc("UpdateDuty", |r| {
            DbActorMessage::UpdateDuty(id, patch, completer, r)
        })
        .await
    }

    pub async fn delete_duty(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteDuty", |r| DbActorMessage::DeleteDuty(id, r)).await
    }

    pub async fn list_notes(&self, report_id: i64) -> Result<Vec<ShiftNotes>, DeskError> {
        self.rpc("ListNotes", |r| DbActorMessage::ListNotes(report_id, r))
            .await
    }

    pub async fn upsert_notes(
        &self,
        report_id: i64,
        shift: Shift,
        notes: NotesUpsert,
    ) -> Result<ShiftNotes, DeskError> {
        self.rpc("UpsertNotes", |r| {
            DbActorMessage::UpsertNotes(report_id, shift, notes, r)
        })
        .await
    }

    pub async fn get_email_settings(
        &self,
        property_id: i64,
    ) -> Result<Option<EmailSettings>, DeskError> {
        self.rpc("GetEmailSettings", |r| {
            DbActorMessage::GetEmailSettings(property_id, r)
        })
        .await
    }

    pub async fn upsert_email_settings(
        &self,
        property_id: i64,
        settings: EmailSettingsUpsert,
    ) -> Result<EmailSettings, DeskError> {
        self.rpc("UpsertEmailSettings", |r| {
            DbActorMessage::UpsertEmailSettings(property_id, settings, r)
        })
        .await
    }

    pub async fn list_residents(&self, property_id: i64) -> Result<Vec<Resident>, DeskError> {
        self.rpc("ListResidents", |r| {
            DbActorMessage::ListResidents(property_id, r)
        })
        .await
    }

    pub async fn create_resident(
        &self,
        property_id: i64,
        create: ResidentCreate,
    ) -> Result<Resident, DeskError> {
        self.rpc("CreateResident", |r| {
            DbActorMessage::CreateResident(property_id, create, r)
        })
        .await
    }

    pub async fn import_residents(
        &self,
        property_id: i64,
        rows: Vec<ResidentCreate>,
    ) -> Result<usize, DeskError> {
        self.rpc("ImportResidents", |r| {
            DbActorMessage::ImportResidents(property_id, rows, r)
        })
        .await
    }

    pub async fn update_resident(
        &self,
        id: i64,
        patch: ResidentPatch,
    ) -> Result<Resident, DeskError> {
        self.rpc("UpdateResident", |r| {
            DbActorMessage::UpdateResident(id, patch, r)
        })
        .await
    }

    pub async fn delete_resident(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteResident", |r| DbActorMessage::DeleteResident(id, r))
            .await
    }

    pub async fn list_duty_templates(
        &self,
        property_id: i64,
    ) -> Result<Vec<DutyTemplate>, DeskError> {
        self.rpc("ListDutyTemplates", |r| {
            DbActorMessage::ListDutyTemplates(property_id, r)
        })
        .await
    }

    pub async fn create_duty_template(
        &self,
        property_id: i64,
        create: DutyTemplateCreate,
    ) -> Result<DutyTemplate, DeskError> {
        self.rpc("CreateDutyTemplate", |r| {
            DbActorMessage::CreateDutyTemplate(property_id, create, r)
        })
        .await
    }

    pub async fn update_duty_template(
        &self,
        id: i64,
        patch: DutyTemplatePatch,
    ) -> Result<DutyTemplate, DeskError> {
        self.rpc("UpdateDutyTemplate", |r| {
            DbActorMessage::UpdateDutyTemplate(id, patch, r)
        })
        .await
    }

    pub async fn delete_duty_template(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteDutyTemplate", |r| {
            DbActorMessage::DeleteDutyTemplate(id, r)
        })
        .await
    }

    pub async fn list_agent_shifts(
        &self,
        property_id: i64,
    ) -> Result<Vec<AgentShiftAssignment>, DeskError> {
        self.rpc("ListAgentShifts", |r| {
            DbActorMessage::ListAgentShifts(property_id, r)
        })
        .await
    }

    pub async fn create_agent_shift(
        &self,
        property_id: i64,
        create: AgentShiftCreate,
    ) -> Result<AgentShiftAssignment, DeskError> {
        self.rpc("CreateAgentShift", |r| {
            DbActorMessage::CreateAgentShift(property_id, create, r)
        })
        .await
    }

    pub async fn delete_agent_shift(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteAgentShift", |r| {
            DbActorMessage::DeleteAgentShift(id, r)
        })
        .await
    }

    pub async fn list_announcements(
        &self,
        property_id: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Announcement>, DeskError> {
        self.rpc("ListAnnouncements", |r| {
            DbActorMessage::ListAnnouncements(property_id, now, r)
        })
        .await
    }

    pub async fn create_announcement(
        &self,
        create: AnnouncementCreate,
        created_by: Option<String>,
    ) -> Result<Announcement, DeskError> {
        self.rpc("CreateAnnouncement", |r| {
            DbActorMessage::CreateAnnouncement(create, created_by, r)
        })
        .await
    }

    pub async fn delete_announcement(&self, id: i64) -> Result<(), DeskError> {
        self.rpc("DeleteAnnouncement", |r| {
            DbActorMessage::DeleteAnnouncement(id, r)
        })
        .await
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        // A dropped reply port only means the caller went away.
        match message {
            DbActorMessage::ListUsers(reply) => {
                let _ = reply.send(users::list(pool).await);
            }
            DbActorMessage::GetUser(id, reply) => {
                let _ = reply.send(users::get(pool, id).await);
            }
            DbActorMessage::FindUserByUsername(username, reply) => {
                let _ = reply.send(users::find_by_username(pool, &username).await);
            }
            DbActorMessage::FindUserByIdentifier(identifier, reply) => {
                let _ = reply.send(users::find_by_identifier(pool, &identifier).await);
            }
            DbActorMessage::CreateUser(create, reply) => {
                let _ = reply.send(users::create(pool, create).await);
            }
            DbActorMessage::UpdateUser(id, update, reply) => {
                let _ = reply.send(users::update(pool, id, update).await);
            }
            DbActorMessage::DeleteUser(id, reply) => {
                let _ = reply.send(users::delete(pool, id).await);
            }
            DbActorMessage::EnsureAdmin(username, hash, reply) => {
                let _ = reply.send(users::ensure_admin(pool, &username, hash).await);
            }
            DbActorMessage::CreateResetToken(user_id, token, expires_at, reply) => {
                let _ = reply.send(users::create_reset_token(pool, user_id, token, expires_at).await);
            }
            DbActorMessage::CheckResetToken(token, now, reply) => {
                let _ = reply.send(users::check_reset_token(pool, &token, now).await);
            }
            DbActorMessage::ConsumeResetToken(token, hash, now, reply) => {
                let _ = reply.send(users::consume_reset_token(pool, &token, hash, now).await);
            }

            DbActorMessage::ListProperties(reply) => {
                let _ = reply.send(properties::list(pool).await);
            }
            DbActorMessage::GetProperty(id, reply) => {
                let _ = reply.send(properties::get(pool, id).await);
            }
            DbActorMessage::CreateProperty(create, reply) => {
                let _ = reply.send(properties::create(pool, create).await);
            }
            DbActorMessage::UpdateProperty(id, patch, reply) => {
                let _ = reply.send(properties::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteProperty(id, reply) => {
                let _ = reply.send(properties::delete(pool, id).await);
            }

            DbActorMessage::ListReports(query, reply) => {
                let _ = reply.send(reports::list(pool, query).await);
            }
            DbActorMessage::GetReport(id, reply) => {
                let _ = reply.send(reports::get(pool, id).await);
            }
            DbActorMessage::FindOrCreateReport(create, reply) => {
                let _ = reply.send(reports::find_or_create(pool, create).await);
            }
            DbActorMessage::UpdateReport(id, patch, reply) => {
                let _ = reply.send(reports::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteReport(id, reply) => {
                let _ = reply.send(reports::delete(pool, id).await);
            }
            DbActorMessage::ReportDetails(id, reply) => {
                let _ = reply.send(reports::details(pool, id).await);
            }
            DbActorMessage::SeedDuties(id, reply) => {
                let _ = reply.send(reports::seed_duties(pool, id).await);
            }
            DbActorMessage::SyncCurrentReport {
                property_id,
                date,
                shift,
                agent,
                reply,
            } => {
                let res = reports::sync_current(pool, property_id, date, shift, agent).await;
                let _ = reply.send(res);
            }
            DbActorMessage::ReportsDueForDispatch(date, shift, reply) => {
                let _ = reply.send(reports::due_for_dispatch(pool, date, shift).await);
            }
            DbActorMessage::MarkShiftCompleted(id, shift, at, reply) => {
                let _ = reply.send(reports::mark_shift_completed(pool, id, shift, at).await);
            }
            DbActorMessage::MarkShiftSent(id, shift, at, reply) => {
                let _ = reply.send(reports::mark_shift_sent(pool, id, shift, at).await);
            }

            DbActorMessage::ListCheckins(report_id, reply) => {
                let _ = reply.send(checkins::list(pool, report_id).await);
            }
            DbActorMessage::CreateCheckin(report_id, create, now_local, reply) => {
                let _ = reply.send(checkins::create(pool, report_id, create, now_local).await);
            }
            DbActorMessage::UpdateCheckin(id, patch, reply) => {
                let _ = reply.send(checkins::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteCheckin(id, reply) => {
                let _ = reply.send(checkins::delete(pool, id).await);
            }
            DbActorMessage::ListPackages(report_id, reply) => {
                let _ = reply.send(packages::list(pool, report_id).await);
            }
            DbActorMessage::CreatePackage(report_id, create, now_local, reply) => {
                let _ = reply.send(packages::create(pool, report_id, create, now_local).await);
            }
            DbActorMessage::UpdatePackage(id, patch, now_local, reply) => {
                let _ = reply.send(packages::update(pool, id, patch, now_local).await);
            }
            DbActorMessage::DeletePackage(id, reply) => {
                let _ = reply.send(packages::delete(pool, id).await);
            }
            DbActorMessage::ListPackageAudits(report_id, reply) => {
                let _ = reply.send(packages::list_audits(pool, report_id).await);
            }
            DbActorMessage::UpsertPackageAudit(report_id, shift, audit, reply) => {
                let _ = reply.send(packages::upsert_audit(pool, report_id, shift, audit).await);
            }
            DbActorMessage::ListDuties(report_id, reply) => {
                let _ = reply.send(duties::list(pool, report_id).await);
            }
            DbActorMessage::CreateDuty(report_id, create, reply) => {
                let _ = reply.send(duties::create(pool, report_id, create).await);
            }
            DbActorMessage::UpdateDuty(id, patch, completer, reply) => {
                let _ = reply.send(duties::update(pool, id, patch, completer).await);
            }
            DbActorMessage::DeleteDuty(id, reply) => {
                let _ = reply.send(duties::delete(pool, id).await);
            }
            DbActorMessage::ListNotes(report_id, reply) => {
                let _ = reply.send(notes::list(pool, report_id).await);
            }
            DbActorMessage::UpsertNotes(report_id, shift, body, reply) => {
                let _ = reply.send(notes::upsert(pool, report_id, shift, body).await);
            }

            DbActorMessage::GetEmailSettings(property_id, reply) => {
                let _ = reply.send(email_settings::get(pool, property_id).await);
            }
            DbActorMessage::UpsertEmailSettings(property_id, settings, reply) => {
                let _ = reply.send(email_settings::upsert(pool, property_id, settings).await);
            }
            DbActorMessage::ListResidents(property_id, reply) => {
                let _ = reply.send(residents::list(pool, property_id).await);
            }
            DbActorMessage::CreateResident(property_id, create, reply) => {
                let _ = reply.send(residents::create(pool, property_id, create).await);
            }
            DbActorMessage::ImportResidents(property_id, rows, reply) => {
                let _ = reply.send(residents::import(pool, property_id, rows).await);
            }
            DbActorMessage::UpdateResident(id, patch, reply) => {
                let _ = reply.send(residents::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteResident(id, reply) => {
                let _ = reply.send(residents::delete(pool, id).await);
            }
            DbActorMessage::ListDutyTemplates(property_id, reply) => {
                let _ = reply.send(templates::list(pool, property_id).await);
            }
            DbActorMessage::CreateDutyTemplate(property_id, create, reply) => {
                let _ = reply.send(templates::create(pool, property_id, create).await);
            }
            DbActorMessage::UpdateDutyTemplate(id, patch, reply) => {
                let _ = reply.send(templates::update(pool, id, patch).await);
            }
            DbActorMessage::DeleteDutyTemplate(id, reply) => {
                let _ = reply.send(templates::delete(pool, id).await);
            }
            DbActorMessage::ListAgentShifts(property_id, reply) => {
                let _ = reply.send(agents::list(pool, property_id).await);
            }
            DbActorMessage::CreateAgentShift(property_id, create, reply) => {
                let _ = reply.send(agents::create(pool, property_id, create).await);
            }
            DbActorMessage::DeleteAgentShift(id, reply) => {
                let _ = reply.send(agents::delete(pool, id).await);
            }
            DbActorMessage::ListAnnouncements(property_id, now, reply) => {
                let _ = reply.send(announcements::list_active(pool, property_id, now).await);
            }
            DbActorMessage::CreateAnnouncement(create, created_by, reply) => {
                let _ = reply.send(announcements::create(pool, create, created_by).await);
            }
            DbActorMessage::DeleteAnnouncement(id, reply) => {
                let _ = reply.send(announcements::delete(pool, id).await);
            }
        }
        Ok(())
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.pool.close().await;
        info!("DbActor stopped, pool closed");
        Ok(())
    }
}

/// Spawn the database actor and return a cloneable handle.
///
/// The actor is unnamed so several databases can live in one process (tests do this).
pub async fn spawn(database_url: &str) -> Result<DbActorHandle, DeskError> {
    let (actor, _jh) = Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .map_err(|e| DeskError::RactorError(format!("failed to spawn DbActor: {e}")))?;

    Ok(DbActorHandle { actor })
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), DeskError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
