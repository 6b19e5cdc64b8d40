use crate::auth::{SESSION_COOKIE, Session};
use crate::db::DbUser;
use crate::error::DeskError;
use crate::server::router::DeskState;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::PrivateCookieJar;
use tracing::debug;

/// The signed-in user, resolved from the encrypted session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub DbUser);

impl FromRequestParts<DeskState> for CurrentUser {
    type Rejection = DeskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeskState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::from_headers(&parts.headers, state.cookie_key.clone());
        let session = jar
            .get(SESSION_COOKIE)
            .and_then(|c| Session::decode(c.value()))
            .ok_or(DeskError::Unauthorized)?;

        if session.is_expired(state.clock.now_utc()) {
            debug!(user_id = session.user_id, "session expired");
            return Err(DeskError::Unauthorized);
        }

        match state.db.get_user(session.user_id).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(e) if e.is_not_found() => Err(DeskError::Unauthorized),
            Err(e) => Err(e),
        }
    }
}

/// A signed-in user with the manager role.
#[derive(Debug, Clone)]
pub struct RequireManager(pub DbUser);

impl FromRequestParts<DeskState> for RequireManager {
    type Rejection = DeskError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &DeskState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if user.role.is_manager() {
            Ok(RequireManager(user))
        } else {
            Err(DeskError::Forbidden)
        }
    }
}
