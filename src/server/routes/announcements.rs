use crate::db::Announcement;
use crate::db::patch::AnnouncementCreate;
use crate::error::DeskError;
use crate::server::extract::{DeskPath, DeskQuery, ValidJson};
use crate::server::guards::{CurrentUser, RequireManager};
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get},
};
use shiftdesk_schema::announcement::AnnouncementQuery;
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route(
            "/announcements",
            get(list_announcements).post(create_announcement),
        )
        .route("/announcements/{id}", delete(delete_announcement))
}

/// Unexpired announcements for the property plus global ones.
async fn list_announcements(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskQuery(query): DeskQuery<AnnouncementQuery>,
) -> Result<Json<Vec<Announcement>>, DeskError> {
    let list = state
        .db
        .list_announcements(query.property_id, state.clock.now_utc())
        .await?;
    Ok(Json(list))
}

async fn create_announcement(
    State(state): State<DeskState>,
    RequireManager(user): RequireManager,
    ValidJson(create): ValidJson<AnnouncementCreate>,
) -> Result<(StatusCode, Json<Announcement>), DeskError> {
    let created_by = user.display_name.clone().unwrap_or(user.username.clone());
    let announcement = state
        .db
        .create_announcement(create, Some(created_by))
        .await?;
    info!(
        announcement_id = announcement.id,
        property_id = ?announcement.property_id,
        "announcement posted"
    );
    Ok((StatusCode::CREATED, Json(announcement)))
}

async fn delete_announcement(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_announcement(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
