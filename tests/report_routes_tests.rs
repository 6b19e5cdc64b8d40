mod common;

use axum::{body::Body, http::StatusCode};
use common::{TestApp, at};
use serde_json::json;

#[tokio::test]
async fn creating_the_same_report_twice_returns_the_existing_row() {
    let t = TestApp::spawn("report-idempotent", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;

    // one active and one inactive template
    let (status, _) = t
        .call(
            "POST",
            &format!("/api/properties/{p1}/duty-templates"),
            Some(&manager),
            Some(json!({ "shift": "1st", "task": "Check lobby doors" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = t
        .call(
            "POST",
            &format!("/api/properties/{p1}/duty-templates"),
            Some(&manager),
            Some(json!({ "shift": "2nd", "task": "Retired task", "active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let create = json!({ "propertyId": p1, "reportDate": "2024-01-01" });
    let (status, first) = t
        .call("POST", "/api/reports", Some(&agent), Some(create.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = t
        .call("POST", "/api/reports", Some(&agent), Some(create))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    let (status, list) = t
        .call(
            "GET",
            &format!("/api/reports?propertyId={p1}&date=2024-01-01"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let report_id = first["id"].as_i64().unwrap();
    let (_, duties) = t
        .call(
            "GET",
            &format!("/api/reports/{report_id}/duties"),
            Some(&agent),
            None,
        )
        .await;
    let duties = duties.as_array().unwrap();
    assert_eq!(duties.len(), 1);
    assert_eq!(duties[0]["task"], "Check lobby doors");

    // seeding again adds nothing
    let (status, seeded) = t
        .call(
            "POST",
            &format!("/api/reports/{report_id}/duties/seed"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(seeded["added"], 0);
}

#[tokio::test]
async fn report_routes_require_a_session_and_the_right_role() {
    let t = TestApp::spawn("report-auth", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Harbor View").await;

    let (status, body) = t.call("GET", "/api/reports", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (_, report) = t
        .call(
            "POST",
            "/api/reports",
            Some(&agent),
            Some(json!({ "propertyId": p1, "reportDate": "2024-01-01" })),
        )
        .await;
    let report_id = report["id"].as_i64().unwrap();

    let (status, _) = t
        .call(
            "DELETE",
            &format!("/api/reports/{report_id}"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = t
        .call(
            "DELETE",
            &format!("/api/reports/{report_id}"),
            Some(&manager),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = t
        .call(
            "GET",
            &format!("/api/reports/{report_id}"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, body) = t
        .call(
            "POST",
            "/api/reports",
            Some(&agent),
            Some(json!({ "propertyId": p1 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["errors"].is_array());
}

#[tokio::test]
async fn current_report_picks_the_shift_and_the_longest_matching_agent() {
    let t = TestApp::spawn("report-current", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;

    for (range, name) in [
        ("7:00 am to 3:00 pm", "Ana"),
        ("7:00 am to 7:00 pm", "Ben"),
        ("7:00 pm to 7:00 am", "Cy"),
    ] {
        let (status, _) = t
            .call(
                "POST",
                &format!("/api/properties/{p1}/agent-shifts"),
                Some(&manager),
                Some(json!({ "shiftRange": range, "agentName": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, current) = t
        .call(
            "GET",
            &format!("/api/reports/current/{p1}"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(current["shift"], "1st");
    assert_eq!(current["assignment"]["agentName"], "Ben");
    assert_eq!(current["report"]["agentName"], "Ben");
    assert_eq!(current["report"]["currentShift"], "1st");
    assert_eq!(current["report"]["reportDate"], "2024-01-01");

    // calling again reuses the same report
    let (_, again) = t
        .call(
            "GET",
            &format!("/api/reports/current/{p1}"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(again["report"]["id"], current["report"]["id"]);

    let (status, assigned) = t
        .call(
            "GET",
            &format!("/api/properties/{p1}/agent-shifts/current"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["hour"], 10);
    assert_eq!(assigned["assignment"]["agentName"], "Ben");

    let (status, _) = t
        .call("GET", "/api/reports/current/999", Some(&agent), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn report_entries_show_up_in_details_and_exports() {
    let t = TestApp::spawn("report-details", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;

    let (_, report) = t
        .call(
            "POST",
            "/api/reports",
            Some(&agent),
            Some(json!({ "propertyId": p1, "reportDate": "2024-01-01", "currentShift": "1st" })),
        )
        .await;
    let id = report["id"].as_i64().unwrap();

    let (status, checkin) = t
        .call(
            "POST",
            &format!("/api/reports/{id}/checkins"),
            Some(&agent),
            Some(json!({ "shift": "1st", "guestName": "Sam Guest", "unit": "4B" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(checkin["checkedInAt"], "2024-01-01T10:00:00");

    let (status, package) = t
        .call(
            "POST",
            &format!("/api/reports/{id}/packages"),
            Some(&agent),
            Some(json!({ "shift": "1st", "recipientName": "Lee Tenant", "carrier": "UPS" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let package_id = package["id"].as_i64().unwrap();

    let (status, picked) = t
        .call(
            "PATCH",
            &format!("/api/packages/{package_id}"),
            Some(&agent),
            Some(json!({ "status": "picked_up", "pickedUpBy": "Lee Tenant" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(picked["pickedUpAt"], "2024-01-01T10:00:00");

    for content in ["Quiet morning.", "Quiet morning. Elevator serviced."] {
        let (status, notes) = t
            .call(
                "PUT",
                &format!("/api/reports/{id}/notes/1st"),
                Some(&agent),
                Some(json!({ "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(notes["content"], content);
    }

    let (status, _) = t
        .call(
            "PUT",
            &format!("/api/reports/{id}/package-audits/1st"),
            Some(&agent),
            Some(json!({ "packagesOnHand": 3 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = t
        .call(
            "PUT",
            &format!("/api/reports/{id}/notes/4th"),
            Some(&agent),
            Some(json!({ "content": "nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, completed) = t
        .call(
            "POST",
            &format!("/api/reports/{id}/shifts/1st/complete"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed["shiftStatus"]["1st"]["completed"], true);

    let (status, details) = t
        .call(
            "GET",
            &format!("/api/reports/{id}/details"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["property"]["name"], "Riverside Commons");
    assert_eq!(details["checkins"].as_array().map(Vec::len), Some(1));
    assert_eq!(details["packages"].as_array().map(Vec::len), Some(1));
    assert_eq!(details["notes"].as_array().map(Vec::len), Some(1));
    assert_eq!(details["packageAudits"][0]["packagesOnHand"], 3);

    let (status, headers, csv) = t
        .raw(
            "POST",
            &format!("/api/reports/{id}/export/csv"),
            Some(&agent),
            None,
            Body::empty(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        headers["content-disposition"]
            .to_str()
            .unwrap()
            .contains("2024-01-01.csv")
    );
    let csv = String::from_utf8(csv.to_vec()).unwrap();
    assert!(csv.contains("Sam Guest"));
    assert!(csv.contains("Lee Tenant"));

    let (status, headers, pdf) = t
        .raw(
            "POST",
            &format!("/api/reports/{id}/export/pdf"),
            Some(&agent),
            None,
            Body::empty(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/pdf");
    assert!(pdf.starts_with(b"%PDF"));
}

#[tokio::test]
async fn concurrent_creates_for_one_day_yield_a_single_report() {
    let t = TestApp::spawn("report-concurrent", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    let (status, _) = t
        .call(
            "POST",
            &format!("/api/properties/{p1}/duty-templates"),
            Some(&manager),
            Some(json!({ "shift": "1st", "task": "Check lobby doors" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let create = || Some(json!({ "propertyId": p1, "reportDate": "2024-01-01" }));
    let (a, b, c, d) = tokio::join!(
        t.call("POST", "/api/reports", Some(&agent), create()),
        t.call("POST", "/api/reports", Some(&manager), create()),
        t.call("POST", "/api/reports", Some(&agent), create()),
        t.call("POST", "/api/reports", Some(&manager), create()),
    );
    let results = [a, b, c, d];

    let created = results
        .iter()
        .filter(|(status, _)| *status == StatusCode::CREATED)
        .count();
    assert_eq!(created, 1);
    assert!(
        results
            .iter()
            .all(|(status, _)| *status == StatusCode::CREATED || *status == StatusCode::OK)
    );
    let id = results[0].1["id"].as_i64().unwrap();
    assert!(results.iter().all(|(_, body)| body["id"].as_i64() == Some(id)));

    let (_, list) = t
        .call(
            "GET",
            &format!("/api/reports?propertyId={p1}&date=2024-01-01"),
            Some(&agent),
            None,
        )
        .await;
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    let (_, duties) = t
        .call("GET", &format!("/api/reports/{id}/duties"), Some(&agent), None)
        .await;
    assert_eq!(duties.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn status_changes_keep_pickup_and_completion_stamps_consistent() {
    let t = TestApp::spawn("report-stamps", at(2024, 1, 1, 10, 0)).await;
    let (manager, agent) = t.staff().await;
    let p1 = t.create_property(&manager, "Riverside Commons").await;
    let (_, report) = t
        .call(
            "POST",
            "/api/reports",
            Some(&agent),
            Some(json!({ "propertyId": p1, "reportDate": "2024-01-01" })),
        )
        .await;
    let id = report["id"].as_i64().unwrap();

    // package: picked up, then moved back to received
    let (_, package) = t
        .call(
            "POST",
            &format!("/api/reports/{id}/packages"),
            Some(&agent),
            Some(json!({ "shift": "1st", "recipientName": "Lee Tenant" })),
        )
        .await;
    let package_id = package["id"].as_i64().unwrap();
    let (_, picked) = t
        .call(
            "PATCH",
            &format!("/api/packages/{package_id}"),
            Some(&agent),
            Some(json!({ "status": "picked_up", "pickedUpBy": "Lee Tenant" })),
        )
        .await;
    assert_eq!(picked["pickedUpBy"], "Lee Tenant");
    let (status, back) = t
        .call(
            "PATCH",
            &format!("/api/packages/{package_id}"),
            Some(&agent),
            Some(json!({ "status": "received" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(back["status"], "received");
    assert!(back["pickedUpAt"].is_null());
    assert!(back["pickedUpBy"].is_null());

    // a notes-only edit leaves the status fields alone
    let (_, picked) = t
        .call(
            "PATCH",
            &format!("/api/packages/{package_id}"),
            Some(&agent),
            Some(json!({ "status": "picked_up", "pickedUpBy": "Lee Tenant" })),
        )
        .await;
    let (_, edited) = t
        .call(
            "PATCH",
            &format!("/api/packages/{package_id}"),
            Some(&agent),
            Some(json!({ "notes": "left at desk" })),
        )
        .await;
    assert_eq!(edited["pickedUpAt"], picked["pickedUpAt"]);
    assert_eq!(edited["pickedUpBy"], "Lee Tenant");

    // duty: completed by the agent, re-sent as completed by the manager
    let (status, duty) = t
        .call(
            "POST",
            &format!("/api/reports/{id}/duties"),
            Some(&agent),
            Some(json!({ "shift": "1st", "task": "Walk the garage" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let duty_id = duty["id"].as_i64().unwrap();
    let (_, done) = t
        .call(
            "PATCH",
            &format!("/api/duties/{duty_id}"),
            Some(&agent),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(done["completedBy"], "agent");
    let (_, again) = t
        .call(
            "PATCH",
            &format!("/api/duties/{duty_id}"),
            Some(&manager),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(again["completedBy"], "agent");
    assert_eq!(again["completedAt"], done["completedAt"]);

    let (_, undone) = t
        .call(
            "PATCH",
            &format!("/api/duties/{duty_id}"),
            Some(&manager),
            Some(json!({ "completed": false })),
        )
        .await;
    assert!(undone["completedBy"].is_null());
    let (_, redone) = t
        .call(
            "PATCH",
            &format!("/api/duties/{duty_id}"),
            Some(&manager),
            Some(json!({ "completed": true })),
        )
        .await;
    assert_eq!(redone["completedBy"], "manager");
}
