//! Rows hanging off a daily report: check-ins, packages, package audits, duties and notes.

use crate::db::patch::{
    CheckinCreate, CheckinPatch, DutyCreate, DutyPatch, NotesUpsert, PackageAuditUpsert,
    PackageCreate, PackagePatch,
};
use crate::db::{DailyDuty, GuestCheckin, Package, PackageAudit, ShiftNotes};
use crate::error::DeskError;
use crate::server::extract::{DeskPath, ValidJson};
use crate::server::guards::CurrentUser;
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch, put},
};
use shiftdesk_core::Shift;
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route(
            "/reports/{id}/checkins",
            get(list_checkins).post(create_checkin),
        )
        .route(
            "/checkins/{id}",
            patch(update_checkin).delete(delete_checkin),
        )
        .route(
            "/reports/{id}/packages",
            get(list_packages).post(create_package),
        )
        .route(
            "/packages/{id}",
            patch(update_package).delete(delete_package),
        )
        .route("/reports/{id}/package-audits", get(list_package_audits))
        .route(
            "/reports/{id}/package-audits/{shift}",
            put(upsert_package_audit),
        )
        .route("/reports/{id}/duties", get(list_duties).post(create_duty))
        .route("/duties/{id}", patch(update_duty).delete(delete_duty))
        .route("/reports/{id}/notes", get(list_notes))
        .route("/reports/{id}/notes/{shift}", put(upsert_notes))
}

async fn list_checkins(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
) -> Result<Json<Vec<GuestCheckin>>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.list_checkins(report_id).await?))
}

async fn create_checkin(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
    ValidJson(create): ValidJson<CheckinCreate>,
) -> Result<(StatusCode, Json<GuestCheckin>), DeskError> {
    state.db.get_report(report_id).await?;
    let checkin = state
        .db
        .create_checkin(report_id, create, state.clock.now_local())
        .await?;
    Ok((StatusCode::CREATED, Json(checkin)))
}

async fn update_checkin(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<CheckinPatch>,
) -> Result<Json<GuestCheckin>, DeskError> {
    Ok(Json(state.db.update_checkin(id, patch).await?))
}

async fn delete_checkin(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_checkin(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_packages(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
) -> Result<Json<Vec<Package>>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.list_packages(report_id).await?))
}

async fn create_package(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
    ValidJson(create): ValidJson<PackageCreate>,
) -> Result<(StatusCode, Json<Package>), DeskError> {
    state.db.get_report(report_id).await?;
    let package = state
        .db
        .create_package(report_id, create, state.clock.now_local())
        .await?;
    Ok((StatusCode::CREATED, Json(package)))
}

async fn update_package(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<PackagePatch>,
) -> Result<Json<Package>, DeskError> {
    let package = state
        .db
        .update_package(id, patch, state.clock.now_local())
        .await?;
    Ok(Json(package))
}

async fn delete_package(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_package(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_package_audits(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
) -> Result<Json<Vec<PackageAudit>>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.list_package_audits(report_id).await?))
}

async fn upsert_package_audit(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath((report_id, shift)): DeskPath<(i64, Shift)>,
    ValidJson(audit): ValidJson<PackageAuditUpsert>,
) -> Result<Json<PackageAudit>, DeskError> {
    state.db.get_report(report_id).await?;
    let audit = state
        .db
        .upsert_package_audit(report_id, shift, audit)
        .await?;
    Ok(Json(audit))
}

async fn list_duties(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
) -> Result<Json<Vec<DailyDuty>>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.list_duties(report_id).await?))
}

async fn create_duty(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
    ValidJson(create): ValidJson<DutyCreate>,
) -> Result<(StatusCode, Json<DailyDuty>), DeskError> {
    state.db.get_report(report_id).await?;
    let duty = state.db.create_duty(report_id, create).await?;
    Ok((StatusCode::CREATED, Json(duty)))
}

/// Completing a duty without naming who did it records the signed-in user.
async fn update_duty(
    State(state): State<DeskState>,
    CurrentUser(user): CurrentUser,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<DutyPatch>,
) -> Result<Json<DailyDuty>, DeskError> {
    let completer = user.display_name.unwrap_or(user.username);
    let duty = state.db.update_duty(id, patch, completer).await?;
    if duty.completed {
        info!(duty_id = id, by = ?duty.completed_by, "duty completed");
    }
    Ok(Json(duty))
}

async fn delete_duty(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_duty(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_notes(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(report_id): DeskPath<i64>,
) -> Result<Json<Vec<ShiftNotes>>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.list_notes(report_id).await?))
}

async fn upsert_notes(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath((report_id, shift)): DeskPath<(i64, Shift)>,
    ValidJson(notes): ValidJson<NotesUpsert>,
) -> Result<Json<ShiftNotes>, DeskError> {
    state.db.get_report(report_id).await?;
    Ok(Json(state.db.upsert_notes(report_id, shift, notes).await?))
}
