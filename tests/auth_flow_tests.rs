mod common;

use axum::http::StatusCode;
use common::{AGENT, MANAGER, TestApp, at};
use serde_json::json;
use shiftdesk_core::Role;

#[tokio::test]
async fn login_me_and_logout() {
    let t = TestApp::spawn("auth-login", at(2024, 1, 1, 10, 0)).await;
    t.create_user(AGENT, Role::Agent, None).await;

    let (status, body) = t
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": AGENT.0, "password": "Wrong2024xy" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "Whatever2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let cookie = t.login(AGENT).await;
    let (status, me) = t.call("GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], AGENT.0);
    assert_eq!(me["role"], "agent");
    assert!(me.get("passwordHash").is_none());

    // username lookups ignore case
    let upper = t.login(("AGENT", AGENT.1)).await;
    let (status, _) = t.call("GET", "/api/auth/me", Some(&upper), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t.call("POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = t
        .call(
            "GET",
            "/api/auth/me",
            Some("shiftdesk_session=forged-value"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_enforces_policy_and_current_password() {
    let t = TestApp::spawn("auth-change", at(2024, 1, 1, 10, 0)).await;
    t.create_user(AGENT, Role::Agent, None).await;
    let cookie = t.login(AGENT).await;

    let (status, body) = t
        .call(
            "POST",
            "/api/auth/change-password",
            Some(&cookie),
            Some(json!({ "currentPassword": AGENT.1, "newPassword": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["error"]["details"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e["field"] == "newPassword"));

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/change-password",
            Some(&cookie),
            Some(json!({ "currentPassword": "Nope2024xyz", "newPassword": "Brandnew2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/change-password",
            Some(&cookie),
            Some(json!({ "currentPassword": AGENT.1, "newPassword": "Brandnew2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    t.login((AGENT.0, "Brandnew2024")).await;
}

#[tokio::test]
async fn password_reset_flow_is_single_use_and_does_not_leak_accounts() {
    let t = TestApp::spawn("auth-reset", at(2024, 1, 1, 10, 0)).await;
    t.create_user(MANAGER, Role::Manager, Some("manager@example.com"))
        .await;

    let (status, unknown) = t
        .call(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({ "identifier": "ghost@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(t.mailer.sent().is_empty());

    let (status, known) = t
        .call(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({ "identifier": "manager@example.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown, known);

    let mails = t.mailer.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, vec!["manager@example.com".to_string()]);
    let token = mails[0]
        .body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link in body")
        .to_string();
    assert!(
        mails[0]
            .body
            .contains("https://desk.example.com/reset-password?token=")
    );

    let (status, verified) = t
        .call(
            "GET",
            &format!("/api/auth/verify-reset-token/{token}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified, json!({ "valid": true, "username": MANAGER.0 }));

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": token, "password": "weak" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .call(
            "POST",
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": token, "password": "Recovered2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .call(
            "POST",
            "/api/auth/reset-password",
            None,
            Some(json!({ "token": token, "password": "Recovered2025" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_TOKEN");

    let (status, _) = t
        .call(
            "GET",
            &format!("/api/auth/verify-reset-token/{token}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    t.login((MANAGER.0, "Recovered2024")).await;
}

#[tokio::test]
async fn forgot_password_succeeds_even_when_mail_fails() {
    let t = TestApp::spawn("auth-reset-mailfail", at(2024, 1, 1, 10, 0)).await;
    t.create_user(MANAGER, Role::Manager, Some("manager@example.com"))
        .await;
    t.mailer.set_failing(true);

    let (status, body) = t
        .call(
            "POST",
            "/api/auth/forgot-password",
            None,
            Some(json!({ "identifier": MANAGER.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn login_is_rate_limited_per_username() {
    let t = TestApp::spawn("auth-ratelimit", at(2024, 1, 1, 10, 0)).await;

    let mut last = StatusCode::OK;
    for _ in 0..11 {
        let (status, _) = t
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "username": "target", "password": "Guess2024xyz" })),
            )
            .await;
        last = status;
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn user_management_is_manager_only() {
    let t = TestApp::spawn("auth-users", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;

    let (status, _) = t.call("GET", "/api/users", Some(&agent), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = t.call("GET", "/api/users", Some(&manager), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(2));

    let (status, created) = t
        .call(
            "POST",
            "/api/users",
            Some(&manager),
            Some(json!({ "username": "night", "password": "Overnight2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "agent");

    let (status, body) = t
        .call(
            "POST",
            "/api/users",
            Some(&manager),
            Some(json!({ "username": "NIGHT", "password": "Overnight2024" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let me = t.call("GET", "/api/auth/me", Some(&manager), None).await.1;
    let (status, _) = t
        .call(
            "DELETE",
            &format!("/api/users/{}", me["id"]),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .call(
            "DELETE",
            &format!("/api/users/{}", created["id"]),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
