mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{TestApp, at};
use serde_json::{Value, json};
use shiftdesk_core::Shift;

fn jan1() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

async fn report_on_shift(t: &TestApp, cookie: &str, property_id: i64, shift: &str) -> i64 {
    let (_, report) = t
        .call(
            "POST",
            "/api/reports",
            Some(cookie),
            Some(json!({
                "propertyId": property_id,
                "reportDate": "2024-01-01",
                "currentShift": shift,
            })),
        )
        .await;
    report["id"].as_i64().expect("report id")
}

async fn email_settings(t: &TestApp, cookie: &str, property_id: i64, settings: Value) {
    let (status, _) = t
        .call(
            "PUT",
            &format!("/api/properties/{property_id}/email-settings"),
            Some(cookie),
            Some(settings),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn a_sent_shift_is_never_emailed_twice() {
    let t = TestApp::spawn("dispatch-idempotent", at(2024, 1, 1, 15, 0)).await;
    let (manager, _) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    email_settings(
        &t,
        &manager,
        p1,
        json!({ "recipients": ["gm@example.com"], "attachCsv": true }),
    )
    .await;
    let report_id = report_on_shift(&t, &manager, p1, "1st").await;

    let first = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!((first.sent, first.skipped, first.failed), (1, 0, 0));

    let second = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!((second.sent, second.skipped, second.failed), (0, 1, 0));

    let mails = t.mailer.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(mails[0].to, vec!["gm@example.com".to_string()]);
    assert_eq!(
        mails[0].subject,
        "[Riverside Commons] 1st shift report - 2024-01-01"
    );
    let names: Vec<_> = mails[0]
        .attachments
        .iter()
        .map(|a| a.filename.as_str())
        .collect();
    assert_eq!(
        names,
        [
            "riverside-commons-2024-01-01.pdf",
            "riverside-commons-2024-01-01.csv"
        ]
    );

    let report = t.db.get_report(report_id).await.unwrap();
    assert!(report.shift_status.is_sent(Shift::First));
    assert!(report.shift_status.get(Shift::First).unwrap().sent_at.is_some());
}

#[tokio::test]
async fn dispatch_only_touches_reports_on_the_ended_shift() {
    let t = TestApp::spawn("dispatch-filter", at(2024, 1, 1, 15, 0)).await;
    let (manager, _) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    let p2 = t.create_property(&manager, "Harbor View").await;
    email_settings(&t, &manager, p1, json!({ "recipients": ["gm@example.com"] })).await;
    email_settings(&t, &manager, p2, json!({ "recipients": ["gm@example.com"] })).await;
    report_on_shift(&t, &manager, p1, "1st").await;
    report_on_shift(&t, &manager, p2, "2nd").await;

    let summary = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!(summary.sent, 1);
    assert_eq!(t.mailer.sent().len(), 1);

    let other_day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let summary = t.dispatcher.run_now(other_day, Shift::Second).await.unwrap();
    assert_eq!((summary.sent, summary.skipped, summary.failed), (0, 0, 0));
}

#[tokio::test]
async fn failures_are_counted_and_left_unsent() {
    let t = TestApp::spawn("dispatch-failures", at(2024, 1, 1, 15, 0)).await;
    let (manager, _) = t.staff().await;

    // no recipients and no defaults
    let bare = t.create_property(&manager, "Bare").await;
    let bare_report = report_on_shift(&t, &manager, bare, "1st").await;

    // auto-send switched off
    let quiet = t.create_property(&manager, "Quiet").await;
    email_settings(
        &t,
        &manager,
        quiet,
        json!({ "recipients": ["gm@example.com"], "autoSend": false }),
    )
    .await;
    let quiet_report = report_on_shift(&t, &manager, quiet, "1st").await;

    let summary = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!((summary.sent, summary.skipped, summary.failed), (0, 1, 1));
    for id in [bare_report, quiet_report] {
        let report = t.db.get_report(id).await.unwrap();
        assert!(!report.shift_status.is_sent(Shift::First));
    }

    // SMTP failure leaves the flag clear so the next pass retries
    let loud = t.create_property(&manager, "Loud").await;
    email_settings(&t, &manager, loud, json!({ "recipients": ["gm@example.com"] })).await;
    let loud_report = report_on_shift(&t, &manager, loud, "1st").await;
    t.mailer.set_failing(true);
    let summary = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, 2);
    let report = t.db.get_report(loud_report).await.unwrap();
    assert!(!report.shift_status.is_sent(Shift::First));

    t.mailer.set_failing(false);
    let summary = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!(summary.sent, 1);
}

#[tokio::test]
async fn default_recipients_cover_properties_without_settings() {
    let t = TestApp::spawn_with_defaults(
        "dispatch-defaults",
        at(2024, 1, 1, 15, 0),
        vec!["ops@example.com".to_string()],
    )
    .await;
    let (manager, _) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    report_on_shift(&t, &manager, p1, "1st").await;

    let summary = t.dispatcher.run_now(jan1(), Shift::First).await.unwrap();
    assert_eq!(summary.sent, 1);
    let mails = t.mailer.sent();
    assert_eq!(mails[0].to, vec!["ops@example.com".to_string()]);
    // pdf only without settings
    assert_eq!(mails[0].attachments.len(), 1);
    assert_eq!(mails[0].attachments[0].content_type, "application/pdf");
}

#[tokio::test]
async fn send_email_route_and_manual_dispatch() {
    let t = TestApp::spawn("dispatch-routes", at(2024, 1, 1, 15, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    let report_id = report_on_shift(&t, &agent, p1, "1st").await;

    let (status, body) = t
        .call(
            "POST",
            &format!("/api/reports/{report_id}/send-email"),
            Some(&agent),
            Some(json!({})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "NO_RECIPIENTS");

    let (status, receipt) = t
        .call(
            "POST",
            &format!("/api/reports/{report_id}/send-email"),
            Some(&agent),
            Some(json!({ "recipients": ["owner@example.com"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["shift"], "1st");
    assert_eq!(receipt["recipients"], json!(["owner@example.com"]));

    t.mailer.set_failing(true);
    let (status, body) = t
        .call(
            "POST",
            &format!("/api/reports/{report_id}/send-email"),
            Some(&agent),
            Some(json!({ "recipients": ["owner@example.com"] })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    t.mailer.set_failing(false);

    // the manual send marked the shift, so the pass skips it
    let (status, _) = t
        .call(
            "POST",
            "/api/dispatch/run",
            Some(&agent),
            Some(json!({ "shift": "1st" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, summary) = t
        .call(
            "POST",
            "/api/dispatch/run",
            Some(&manager),
            Some(json!({ "shift": "1st", "date": "2024-01-01" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["sent"], 0);
    assert_eq!(summary["skipped"], 1);
    assert_eq!(t.mailer.sent().len(), 1);

    // clock sits at 15:00, so the default is today's 1st shift
    let (_, summary) = t
        .call("POST", "/api/dispatch/run", Some(&manager), Some(json!({})))
        .await;
    assert_eq!(summary["shift"], "1st");
    assert_eq!(summary["date"], "2024-01-01");
}

#[tokio::test]
async fn repeated_scheduled_ticks_email_a_shift_once() {
    let t = TestApp::spawn_with_defaults(
        "dispatch-scheduled",
        at(2024, 1, 1, 15, 0),
        vec!["ops@example.com".to_string()],
    )
    .await;
    let (manager, _) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    let report_id = report_on_shift(&t, &manager, p1, "1st").await;

    t.dispatcher.trigger(jan1(), Shift::First).unwrap();
    t.dispatcher.trigger(jan1(), Shift::First).unwrap();
    // the actor handles messages in order, so this reply lands after both ticks
    let after = t.dispatcher.run_now(jan1(), Shift::Third).await.unwrap();
    assert_eq!((after.sent, after.skipped, after.failed), (0, 0, 0));

    let mails = t.mailer.sent();
    assert_eq!(mails.len(), 1);
    assert_eq!(
        mails[0].subject,
        "[Riverside Commons] 1st shift report - 2024-01-01"
    );
    let report = t.db.get_report(report_id).await.unwrap();
    assert!(report.shift_status.is_sent(Shift::First));
}

#[tokio::test]
async fn default_pass_after_midnight_covers_yesterdays_second_shift() {
    let t = TestApp::spawn_with_defaults(
        "dispatch-after-midnight",
        at(2024, 1, 2, 3, 0),
        vec!["ops@example.com".to_string()],
    )
    .await;
    let (manager, _) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    report_on_shift(&t, &manager, p1, "2nd").await;

    let (status, summary) = t
        .call("POST", "/api/dispatch/run", Some(&manager), Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["date"], "2024-01-01");
    assert_eq!(summary["shift"], "2nd");
    assert_eq!(summary["sent"], 1);
    assert_eq!(t.mailer.sent().len(), 1);
}
