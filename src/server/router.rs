use crate::auth::AuthLimiter;
use crate::clock::Clock;
use crate::db::DbActorHandle;
use crate::dispatch::DispatcherHandle;
use crate::error::DeskError;
use crate::mailer::Mailer;
use crate::server::routes;

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, HeaderValue, Version, header::USER_AGENT},
    middleware::{self, Next},
    response::Response,
};
use axum_extra::extract::cookie::Key;
use base64::Engine as _;
use rand::RngCore;
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use url::Url;

const MAX_REQUEST_ID_LEN: usize = 128;
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Upper bound for request bodies; resident CSV uploads are the largest payload.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

fn generate_request_id() -> String {
    // 96 bits => 16 chars base64url (no padding).
    let mut bytes = [0u8; 12];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

fn format_http_version(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_11 => "HTTP/1.1",
        Version::HTTP_2 => "HTTP/2",
        Version::HTTP_3 => "HTTP/3",
        _ => "HTTP/?",
    }
}

#[derive(Clone)]
pub struct DeskState {
    pub db: DbActorHandle,
    pub mailer: Arc<dyn Mailer>,
    pub dispatcher: DispatcherHandle,
    pub clock: Clock,
    pub limiter: AuthLimiter,
    pub cookie_key: Key,
    pub secure_cookie: bool,
    pub public_url: Arc<Url>,
}

impl DeskState {
    /// Derives the cookie key from `session_secret` when one is configured, otherwise
    /// generates a per-process key.
    pub fn cookie_key(session_secret: Option<&str>) -> Key {
        match session_secret {
            Some(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
            Some(_) => {
                warn!("session_secret shorter than 32 bytes, using a random cookie key");
                Key::generate()
            }
            None => Key::generate(),
        }
    }
}

impl FromRef<DeskState> for Key {
    fn from_ref(state: &DeskState) -> Self {
        state.cookie_key.clone()
    }
}

async fn not_found_handler() -> DeskError {
    DeskError::NotFound("Route")
}

async fn access_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let version = req.version();

    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map(str::to_string)
        .unwrap_or_else(generate_request_id);

    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let mut resp = next.run(req).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        resp.headers_mut().insert(X_REQUEST_ID, value);
    }

    let status = resp.status();
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let path = uri.path();
    let protocol = format_http_version(version);

    if status.is_server_error() {
        error!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else if status.is_client_error() {
        warn!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    } else {
        info!(
            "| {:>3} | {} | {:^7} | {:<8} | {} | {}ms | {}",
            status.as_u16(),
            request_id,
            method.as_str(),
            protocol,
            path,
            latency_ms,
            user_agent
        );
    }

    resp
}

pub fn desk_router(state: DeskState) -> Router {
    let users = routes::users::router().route_layer(middleware::from_extractor_with_state::<
        crate::server::guards::RequireManager,
        _,
    >(state.clone()));

    let api = Router::new()
        .merge(routes::auth::router())
        .merge(users)
        .merge(routes::properties::router())
        .merge(routes::reports::router())
        .merge(routes::entries::router())
        .merge(routes::setup::router())
        .merge(routes::announcements::router())
        .merge(routes::misc::router());

    Router::new()
        .nest("/api", api)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(middleware::from_fn(access_log))
}
