//! Extractors whose rejections render as the uniform JSON error body.

use crate::error::DeskError;
use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use shiftdesk_schema::Validate;

/// JSON body that has been deserialized and passed `Validate`.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = DeskError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate().map_err(DeskError::validation)?;
        Ok(ValidJson(value))
    }
}

pub struct DeskPath<T>(pub T);

impl<S, T> FromRequestParts<S> for DeskPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = DeskError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(DeskPath(value))
    }
}

pub struct DeskQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for DeskQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = DeskError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(DeskQuery(value))
    }
}
