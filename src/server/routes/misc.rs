use crate::error::DeskError;
use crate::server::extract::ValidJson;
use crate::server::guards::RequireManager;
use crate::server::router::DeskState;
use crate::utils::logging::debug_json;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};
use shiftdesk_core::previous_trigger;
use shiftdesk_schema::{DispatchRunRequest, DispatchSummary};
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route("/health", get(health))
        .route("/dispatch/run", post(run_dispatch))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Manual dispatch pass. Defaults to the date and shift of the most recent trigger, so a
/// pass run after midnight covers yesterday's 2nd shift.
async fn run_dispatch(
    State(state): State<DeskState>,
    RequireManager(user): RequireManager,
    ValidJson(req): ValidJson<DispatchRunRequest>,
) -> Result<Json<DispatchSummary>, DeskError> {
    let now = state.clock.now_local();
    let (last_at, last_shift) = previous_trigger(now);
    let date = req.date.unwrap_or(last_at.date());
    let shift = req.shift.unwrap_or(last_shift);
    info!(%date, shift = %shift, by = %user.username, "manual dispatch requested");

    let summary = state.dispatcher.run_now(date, shift).await?;
    debug_json("manual dispatch finished", &summary);
    Ok(Json(summary))
}
