//! Account management. The whole group sits behind `RequireManager`.

use crate::auth::hash_password;
use crate::db::DbUser;
use crate::db::patch::{UserCreate, UserUpdate};
use crate::error::DeskError;
use crate::server::extract::{DeskPath, ValidJson};
use crate::server::guards::RequireManager;
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, patch},
};
use shiftdesk_schema::user::{UserCreateRequest, UserPatchRequest};
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", patch(update_user).delete(delete_user))
}

async fn list_users(State(state): State<DeskState>) -> Result<Json<Vec<DbUser>>, DeskError> {
    Ok(Json(state.db.list_users().await?))
}

async fn create_user(
    State(state): State<DeskState>,
    ValidJson(req): ValidJson<UserCreateRequest>,
) -> Result<(StatusCode, Json<DbUser>), DeskError> {
    let password_hash = hash_password(req.password).await?;
    let user = state
        .db
        .create_user(UserCreate {
            username: req.username.trim().to_string(),
            password_hash,
            email: req.email,
            display_name: req.display_name,
            role: req.role,
        })
        .await?;
    info!(user_id = user.id, username = %user.username, role = %user.role, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn update_user(
    State(state): State<DeskState>,
    DeskPath(id): DeskPath<i64>,
    ValidJson(req): ValidJson<UserPatchRequest>,
) -> Result<Json<DbUser>, DeskError> {
    let password_hash = match req.password {
        Some(password) => Some(hash_password(password).await?),
        None => None,
    };
    let user = state
        .db
        .update_user(
            id,
            UserUpdate {
                email: req.email,
                display_name: req.display_name,
                role: req.role,
                password_hash,
            },
        )
        .await?;
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<DeskState>,
    RequireManager(me): RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    if me.id == id {
        return Err(DeskError::invalid("id", "cannot delete your own account"));
    }
    state.db.delete_user(id).await?;
    info!(user_id = id, deleted_by = me.id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
