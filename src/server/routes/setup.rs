//! Per-property configuration: email settings, residents, duty templates and the agent roster.
//! Reads are open to any signed-in user, writes need a manager.

use crate::db::patch::{
    AgentShiftCreate, DutyTemplateCreate, DutyTemplatePatch, EmailSettingsUpsert, ResidentCreate,
    ResidentPatch,
};
use crate::db::{AgentShiftAssignment, DutyTemplate, EmailSettings, Resident};
use crate::error::DeskError;
use crate::import::parse_residents;
use crate::server::extract::{DeskPath, ValidJson};
use crate::server::guards::{CurrentUser, RequireManager};
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use serde::Serialize;
use shiftdesk_core::{Shift, match_assignment};
use shiftdesk_schema::resident::ResidentImportResponse;
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route(
            "/properties/{id}/email-settings",
            get(get_email_settings).put(put_email_settings),
        )
        .route(
            "/properties/{id}/residents",
            get(list_residents).post(create_resident),
        )
        .route("/properties/{id}/residents/import", post(import_residents))
        .route(
            "/residents/{id}",
            patch(update_resident).delete(delete_resident),
        )
        .route(
            "/properties/{id}/duty-templates",
            get(list_templates).post(create_template),
        )
        .route(
            "/duty-templates/{id}",
            patch(update_template).delete(delete_template),
        )
        .route(
            "/properties/{id}/agent-shifts",
            get(list_agent_shifts).post(create_agent_shift),
        )
        .route(
            "/properties/{id}/agent-shifts/current",
            get(current_agent_shift),
        )
        .route("/agent-shifts/{id}", delete(delete_agent_shift))
}

/// `null` until a manager saves settings for the property.
async fn get_email_settings(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<Option<EmailSettings>>, DeskError> {
    state.db.get_property(property_id).await?;
    Ok(Json(state.db.get_email_settings(property_id).await?))
}

async fn put_email_settings(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(property_id): DeskPath<i64>,
    ValidJson(settings): ValidJson<EmailSettingsUpsert>,
) -> Result<Json<EmailSettings>, DeskError> {
    state.db.get_property(property_id).await?;
    let saved = state
        .db
        .upsert_email_settings(property_id, settings)
        .await?;
    info!(
        property_id,
        recipients = saved.recipients.len(),
        auto_send = saved.auto_send,
        "email settings saved"
    );
    Ok(Json(saved))
}

async fn list_residents(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<Vec<Resident>>, DeskError> {
    state.db.get_property(property_id).await?;
    Ok(Json(state.db.list_residents(property_id).await?))
}

async fn create_resident(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(property_id): DeskPath<i64>,
    ValidJson(create): ValidJson<ResidentCreate>,
) -> Result<(StatusCode, Json<Resident>), DeskError> {
    let resident = state.db.create_resident(property_id, create).await?;
    Ok((StatusCode::CREATED, Json(resident)))
}

/// Body is the raw CSV file.
async fn import_residents(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(property_id): DeskPath<i64>,
    body: Bytes,
) -> Result<Json<ResidentImportResponse>, DeskError> {
    let parsed = parse_residents(&body)?;
    let imported = state
        .db
        .import_residents(property_id, parsed.rows)
        .await?;
    info!(
        property_id,
        imported,
        skipped = parsed.skipped,
        "residents imported"
    );
    Ok(Json(ResidentImportResponse {
        imported,
        skipped: parsed.skipped,
        mapping: parsed.mapping,
    }))
}

async fn update_resident(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<ResidentPatch>,
) -> Result<Json<Resident>, DeskError> {
    Ok(Json(state.db.update_resident(id, patch).await?))
}

async fn delete_resident(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_resident(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_templates(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<Vec<DutyTemplate>>, DeskError> {
    state.db.get_property(property_id).await?;
    Ok(Json(state.db.list_duty_templates(property_id).await?))
}

async fn create_template(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(property_id): DeskPath<i64>,
    ValidJson(create): ValidJson<DutyTemplateCreate>,
) -> Result<(StatusCode, Json<DutyTemplate>), DeskError> {
    state.db.get_property(property_id).await?;
    let template = state.db.create_duty_template(property_id, create).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn update_template(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<DutyTemplatePatch>,
) -> Result<Json<DutyTemplate>, DeskError> {
    Ok(Json(state.db.update_duty_template(id, patch).await?))
}

async fn delete_template(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_duty_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_agent_shifts(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<Vec<AgentShiftAssignment>>, DeskError> {
    state.db.get_property(property_id).await?;
    Ok(Json(state.db.list_agent_shifts(property_id).await?))
}

async fn create_agent_shift(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(property_id): DeskPath<i64>,
    ValidJson(create): ValidJson<AgentShiftCreate>,
) -> Result<(StatusCode, Json<AgentShiftAssignment>), DeskError> {
    state.db.get_property(property_id).await?;
    let assignment = state.db.create_agent_shift(property_id, create).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

async fn delete_agent_shift(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_agent_shift(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentAssignmentResponse {
    pub hour: u32,
    pub shift: Shift,
    pub assignment: Option<AgentShiftAssignment>,
}

async fn current_agent_shift(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<CurrentAssignmentResponse>, DeskError> {
    state.db.get_property(property_id).await?;
    let hour = state.clock.hour();
    let roster = state.db.list_agent_shifts(property_id).await?;
    Ok(Json(CurrentAssignmentResponse {
        hour,
        shift: Shift::classify(hour),
        assignment: match_assignment(&roster, hour).cloned(),
    }))
}
