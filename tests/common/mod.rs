#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use shiftdesk::auth::{AuthLimiter, hash_password};
use shiftdesk::clock::Clock;
use shiftdesk::db::DbActorHandle;
use shiftdesk::db::patch::UserCreate;
use shiftdesk::dispatch::{self, DispatchArgs, Dispatcher, DispatcherHandle};
use shiftdesk::error::DeskError;
use shiftdesk::mailer::{Mailer, OutgoingMail};
use shiftdesk::server::{DeskState, desk_router};
use shiftdesk_core::Role;
use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;
use url::Url;

pub const MANAGER: (&str, &str) = ("manager", "Manager2024x");
pub const AGENT: (&str, &str) = ("agent", "Agent2024xy");

/// Captures outgoing mail; `fail` makes every send error out.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingMail>>,
    pub fail: AtomicBool,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: OutgoingMail) -> Result<(), DeskError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeskError::MailError("relay refused the message".to_string()));
        }
        self.sent.lock().expect("mailer lock poisoned").push(mail);
        Ok(())
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .expect("valid date")
        .and_hms_opt(h, min, 0)
        .expect("valid time")
}

pub struct TestApp {
    pub app: Router,
    pub db: DbActorHandle,
    pub mailer: Arc<RecordingMailer>,
    pub dispatcher: DispatcherHandle,
    temp_path: PathBuf,
}

impl TestApp {
    /// Fresh database file, clock frozen at `now`, scheduler off.
    pub async fn spawn(name: &str, now: NaiveDateTime) -> Self {
        Self::spawn_with_defaults(name, now, Vec::new()).await
    }

    pub async fn spawn_with_defaults(
        name: &str,
        now: NaiveDateTime,
        default_recipients: Vec<String>,
    ) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut temp_path = std::env::temp_dir();
        temp_path.push(format!(
            "shiftdesk-{name}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        let database_url = format!("sqlite:{}", temp_path.display());
        let db = shiftdesk::db::spawn(&database_url)
            .await
            .expect("db actor should start");

        let clock = Clock::Fixed(now);
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = dispatch::spawn(DispatchArgs {
            dispatcher: Dispatcher::new(db.clone(), mailer.clone(), default_recipients, clock),
            schedule: false,
        })
        .await
        .expect("dispatcher should start");

        let state = DeskState {
            db: db.clone(),
            mailer: mailer.clone(),
            dispatcher: dispatcher.clone(),
            clock,
            limiter: AuthLimiter::default(),
            cookie_key: DeskState::cookie_key(Some("integration-test-secret-0123456789abcdef")),
            secure_cookie: false,
            public_url: Arc::new(Url::parse("https://desk.example.com").expect("valid url")),
        };

        Self {
            app: desk_router(state),
            db,
            mailer,
            dispatcher,
            temp_path,
        }
    }

    pub async fn create_user(&self, (username, password): (&str, &str), role: Role, email: Option<&str>) {
        let password_hash = hash_password(password.to_string())
            .await
            .expect("hash should succeed");
        self.db
            .create_user(UserCreate {
                username: username.to_string(),
                password_hash,
                email: email.map(str::to_string),
                display_name: None,
                role,
            })
            .await
            .expect("user should be created");
    }

    pub async fn raw(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        content_type: Option<&str>,
        body: Body,
    ) -> (StatusCode, HeaderMap, Bytes) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let resp = self
            .app
            .clone()
            .oneshot(builder.body(body).expect("failed to build request"))
            .await
            .expect("request failed");
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        (status, headers, bytes)
    }

    /// JSON request; the response body is parsed as JSON (`Null` when empty).
    pub async fn call(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (content_type, body) = match body {
            Some(v) => (Some("application/json"), Body::from(v.to_string())),
            None => (None, Body::empty()),
        };
        let (status, _, bytes) = self.raw(method, uri, cookie, content_type, body).await;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body was not JSON")
        };
        (status, json)
    }

    /// Signs in and returns the `Cookie` header value for later requests.
    pub async fn login(&self, (username, password): (&str, &str)) -> String {
        let (status, headers, _) = self
            .raw(
                "POST",
                "/api/auth/login",
                None,
                Some("application/json"),
                Body::from(
                    serde_json::json!({ "username": username, "password": password }).to_string(),
                ),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login should succeed for {username}");
        headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .expect("login should set the session cookie")
            .to_string()
    }

    /// Manager and agent accounts; returns their cookies.
    pub async fn staff(&self) -> (String, String) {
        self.create_user(MANAGER, Role::Manager, Some("manager@example.com"))
            .await;
        self.create_user(AGENT, Role::Agent, None).await;
        (self.login(MANAGER).await, self.login(AGENT).await)
    }

    pub async fn create_property(&self, manager: &str, name: &str) -> i64 {
        let (status, body) = self
            .call(
                "POST",
                "/api/properties",
                Some(manager),
                Some(serde_json::json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().expect("property id")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.temp_path.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}
