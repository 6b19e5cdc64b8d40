use crate::auth::{Session, hash_password, reset, session::removal_cookie, verify_password};
use crate::db::DbUser;
use crate::db::patch::UserUpdate;
use crate::error::DeskError;
use crate::mailer::OutgoingMail;
use crate::server::extract::{DeskPath, ValidJson};
use crate::server::guards::CurrentUser;
use crate::server::router::DeskState;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::PrivateCookieJar;
use shiftdesk_schema::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ResetPasswordRequest, VerifyResetTokenResponse,
};
use tracing::{info, warn};

const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that username or email exists, a password reset link has been sent.";

pub fn router() -> Router<DeskState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/change-password", post(change_password))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-token/{token}", get(verify_reset_token))
        .route("/auth/reset-password", post(reset_password))
}

async fn login(
    State(state): State<DeskState>,
    jar: PrivateCookieJar,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<(PrivateCookieJar, Json<DbUser>), DeskError> {
    state.limiter.check("login", &req.username)?;

    let user = state
        .db
        .find_user_by_username(req.username.trim())
        .await?
        .ok_or(DeskError::InvalidCredentials)?;
    if !verify_password(req.password, user.password_hash.clone()).await? {
        warn!(username = %user.username, "login rejected: wrong password");
        return Err(DeskError::InvalidCredentials);
    }

    let session = Session::new(user.id, state.clock.now_utc());
    info!(user_id = user.id, username = %user.username, role = %user.role, "user signed in");
    Ok((jar.add(session.cookie(state.secure_cookie)), Json(user)))
}

async fn logout(jar: PrivateCookieJar) -> impl IntoResponse {
    (StatusCode::NO_CONTENT, jar.remove(removal_cookie()))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<DbUser> {
    Json(user)
}

async fn change_password(
    State(state): State<DeskState>,
    CurrentUser(user): CurrentUser,
    ValidJson(req): ValidJson<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, DeskError> {
    if !verify_password(req.current_password, user.password_hash.clone()).await? {
        return Err(DeskError::invalid("currentPassword", "is incorrect"));
    }
    let password_hash = hash_password(req.new_password).await?;
    state
        .db
        .update_user(
            user.id,
            UserUpdate {
                password_hash: Some(password_hash),
                ..UserUpdate::default()
            },
        )
        .await?;
    info!(user_id = user.id, "password changed");
    Ok(Json(MessageResponse::new("Password updated.")))
}

/// Always answers with the same message; the real outcome only goes to the log.
async fn forgot_password(
    State(state): State<DeskState>,
    ValidJson(req): ValidJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, DeskError> {
    let identifier = req.identifier.trim();
    state.limiter.check("forgot-password", identifier)?;

    if let Err(e) = send_reset_link(&state, identifier).await {
        warn!(error = %e, "password reset request failed");
    }
    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

async fn send_reset_link(state: &DeskState, identifier: &str) -> Result<(), DeskError> {
    let Some(user) = state.db.find_user_by_identifier(identifier).await? else {
        info!("password reset requested for unknown identifier");
        return Ok(());
    };
    let Some(email) = user.email.clone() else {
        info!(user_id = user.id, "password reset requested for user without email");
        return Ok(());
    };

    let token = reset::generate_token();
    let now = state.clock.now_utc();
    state
        .db
        .create_reset_token(user.id, token.clone(), reset::expires_at(now))
        .await?;

    let link = reset::reset_link(&state.public_url, &token);
    state
        .mailer
        .send(OutgoingMail {
            to: vec![email],
            subject: "Password reset".to_string(),
            body: reset::reset_email_body(&user.username, &link),
            attachments: Vec::new(),
        })
        .await?;
    info!(user_id = user.id, "password reset link sent");
    Ok(())
}

async fn verify_reset_token(
    State(state): State<DeskState>,
    DeskPath(token): DeskPath<String>,
) -> Result<Json<VerifyResetTokenResponse>, DeskError> {
    let user = state
        .db
        .check_reset_token(token, state.clock.now_utc())
        .await?;
    Ok(Json(VerifyResetTokenResponse {
        valid: true,
        username: Some(user.username),
    }))
}

async fn reset_password(
    State(state): State<DeskState>,
    ValidJson(req): ValidJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, DeskError> {
    let password_hash = hash_password(req.password).await?;
    let user = state
        .db
        .consume_reset_token(req.token, password_hash, state.clock.now_utc())
        .await?;
    info!(user_id = user.id, "password reset completed");
    Ok(Json(MessageResponse::new("Password has been reset.")))
}
