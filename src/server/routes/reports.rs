use crate::db::{AgentShiftAssignment, DailyReport, ReportBundle};
use crate::db::patch::{ReportCreate, ReportPatch};
use crate::dispatch::SendReceipt;
use crate::error::DeskError;
use crate::export::{csv_report::render_csv, pdf::render_pdf, report_filename};
use crate::server::extract::{DeskPath, DeskQuery, ValidJson};
use crate::server::guards::{CurrentUser, RequireManager};
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Timelike;
use serde::Serialize;
use shiftdesk_core::{Shift, match_assignment};
use shiftdesk_schema::{ReportQuery, SendEmailRequest};
use tracing::{debug, info};

pub fn router() -> Router<DeskState> {
    Router::new()
        .route("/reports", get(list_reports).post(find_or_create_report))
        .route("/reports/current/{property_id}", get(current_report))
        .route(
            "/reports/{id}",
            get(get_report).patch(update_report).delete(delete_report),
        )
        .route("/reports/{id}/details", get(report_details))
        .route(
            "/reports/{id}/shifts/{shift}/complete",
            post(complete_shift),
        )
        .route("/reports/{id}/duties/seed", post(seed_duties))
        .route("/reports/{id}/export/pdf", post(export_pdf))
        .route("/reports/{id}/export/csv", post(export_csv))
        .route("/reports/{id}/send-email", post(send_email))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentReportResponse {
    pub report: DailyReport,
    pub shift: Shift,
    pub assignment: Option<AgentShiftAssignment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResponse {
    pub added: u64,
}

async fn list_reports(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskQuery(query): DeskQuery<ReportQuery>,
) -> Result<Json<Vec<DailyReport>>, DeskError> {
    Ok(Json(state.db.list_reports(query).await?))
}

/// 201 with the new report (duties seeded), or 200 with the one already on file.
async fn find_or_create_report(
    State(state): State<DeskState>,
    _user: CurrentUser,
    ValidJson(create): ValidJson<ReportCreate>,
) -> Result<(StatusCode, Json<DailyReport>), DeskError> {
    state.db.get_property(create.property_id).await?;
    let (report, created) = state.db.find_or_create_report(create).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(report)))
}

/// Today's report for the property, pointed at the shift of the current hour, with the
/// rostered agent filled in when the shift changed or nobody is set.
async fn current_report(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(property_id): DeskPath<i64>,
) -> Result<Json<CurrentReportResponse>, DeskError> {
    state.db.get_property(property_id).await?;

    let now = state.clock.now_local();
    let shift = Shift::classify(now.hour());
    let roster = state.db.list_agent_shifts(property_id).await?;
    let assignment = match_assignment(&roster, now.hour()).cloned();
    debug!(
        property_id,
        hour = now.hour(),
        shift = %shift,
        agent = ?assignment.as_ref().map(|a| a.agent_name.as_str()),
        "resolved current shift"
    );

    let report = state
        .db
        .sync_current_report(
            property_id,
            now.date(),
            shift,
            assignment.as_ref().map(|a| a.agent_name.clone()),
        )
        .await?;

    Ok(Json(CurrentReportResponse {
        report,
        shift,
        assignment,
    }))
}

async fn get_report(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Json<DailyReport>, DeskError> {
    Ok(Json(state.db.get_report(id).await?))
}

async fn update_report(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<ReportPatch>,
) -> Result<Json<DailyReport>, DeskError> {
    Ok(Json(state.db.update_report(id, patch).await?))
}

async fn delete_report(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_report(id).await?;
    info!(report_id = id, "daily report deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn report_details(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Json<ReportBundle>, DeskError> {
    Ok(Json(state.db.report_details(id).await?))
}

async fn complete_shift(
    State(state): State<DeskState>,
    CurrentUser(user): CurrentUser,
    DeskPath((id, shift)): DeskPath<(i64, Shift)>,
) -> Result<Json<DailyReport>, DeskError> {
    let report = state
        .db
        .mark_shift_completed(id, shift, state.clock.now_utc())
        .await?;
    info!(report_id = id, shift = %shift, by = %user.username, "shift completed");
    Ok(Json(report))
}

async fn seed_duties(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Json<SeedResponse>, DeskError> {
    let added = state.db.seed_duties(id).await?;
    Ok(Json(SeedResponse { added }))
}

fn attachment(content_type: &'static str, filename: &str, data: Vec<u8>) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(content_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response()
}

async fn export_pdf(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Response, DeskError> {
    let bundle = state.db.report_details(id).await?;
    let filename = report_filename(&bundle, "pdf");
    let data = tokio::task::spawn_blocking(move || render_pdf(&bundle, None))
        .await
        .map_err(|e| DeskError::UnexpectedError(format!("pdf render task failed: {e}")))??;
    Ok(attachment("application/pdf", &filename, data))
}

async fn export_csv(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Response, DeskError> {
    let bundle = state.db.report_details(id).await?;
    let data = render_csv(&bundle)?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        &report_filename(&bundle, "csv"),
        data,
    ))
}

async fn send_email(
    State(state): State<DeskState>,
    CurrentUser(user): CurrentUser,
    DeskPath(id): DeskPath<i64>,
    ValidJson(req): ValidJson<SendEmailRequest>,
) -> Result<Json<SendReceipt>, DeskError> {
    let receipt = state
        .dispatcher
        .send_report(id, req.shift, req.recipients)
        .await?;
    info!(report_id = id, by = %user.username, "report emailed on request");
    Ok(Json(receipt))
}
