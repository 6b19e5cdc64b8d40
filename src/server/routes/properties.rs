use crate::db::Property;
use crate::db::patch::{PropertyCreate, PropertyPatch};
use crate::error::DeskError;
use crate::server::extract::{DeskPath, ValidJson};
use crate::server::guards::{CurrentUser, RequireManager};
use crate::server::router::DeskState;
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use tracing::info;

pub fn router() -> Router<DeskState> {
    Router::new()
        .route("/properties", get(list_properties).post(create_property))
        .route(
            "/properties/{id}",
            get(get_property)
                .patch(update_property)
                .delete(delete_property),
        )
}

async fn list_properties(
    State(state): State<DeskState>,
    _user: CurrentUser,
) -> Result<Json<Vec<Property>>, DeskError> {
    Ok(Json(state.db.list_properties().await?))
}

async fn get_property(
    State(state): State<DeskState>,
    _user: CurrentUser,
    DeskPath(id): DeskPath<i64>,
) -> Result<Json<Property>, DeskError> {
    Ok(Json(state.db.get_property(id).await?))
}

async fn create_property(
    State(state): State<DeskState>,
    _manager: RequireManager,
    ValidJson(create): ValidJson<PropertyCreate>,
) -> Result<(StatusCode, Json<Property>), DeskError> {
    let property = state.db.create_property(create).await?;
    info!(property_id = property.id, name = %property.name, "property created");
    Ok((StatusCode::CREATED, Json(property)))
}

async fn update_property(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
    ValidJson(patch): ValidJson<PropertyPatch>,
) -> Result<Json<Property>, DeskError> {
    Ok(Json(state.db.update_property(id, patch).await?))
}

async fn delete_property(
    State(state): State<DeskState>,
    _manager: RequireManager,
    DeskPath(id): DeskPath<i64>,
) -> Result<StatusCode, DeskError> {
    state.db.delete_property(id).await?;
    info!(property_id = id, "property deleted");
    Ok(StatusCode::NO_CONTENT)
}
