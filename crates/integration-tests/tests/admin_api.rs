//! Admin JSON API and dashboard pages.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use visa_desk_integration_tests::{TestApp, json_parts, location};

/// Submit a visa application and return its id.
async fn submit(app: &TestApp, name: &str) -> i64 {
    let (status, body) = app
        .post_json(
            "/api/visa",
            &json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn set_status(app: &TestApp, id: i64, status: &str) -> (StatusCode, Value) {
    let response = app
        .client
        .put(app.url(&format!("/api/applications/{id}/status")))
        .json(&json!({ "status": status }))
        .send()
        .await
        .expect("Request failed");
    json_parts(response).await
}

#[tokio::test]
async fn test_admin_api_requires_session() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;

    for path in [
        "/api/applications".to_string(),
        "/api/applications/refresh".to_string(),
        format!("/api/applications/{id}"),
        "/api/contacts".to_string(),
    ] {
        let (status, body) = app.get_json(&path).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(body["success"], false);
    }

    let (status, _) = set_status(&app, id, "completed").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .delete(app.url(&format!("/api/applications/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.count("visa_application").await, 1);
}

#[tokio::test]
async fn test_dashboard_redirects_to_login() {
    let app = TestApp::spawn().await;

    for path in ["/admin", "/admin/applications/1"] {
        let response = app
            .client
            .get(app.url(path))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/admin/login"));
    }
}

#[tokio::test]
async fn test_status_update_changes_only_status() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    app.login().await;

    let (_, before) = app.get_json(&format!("/api/applications/{id}")).await;

    let (status, body) = set_status(&app, id, "in_progress").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "in_progress");

    let (_, after) = app.get_json(&format!("/api/applications/{id}")).await;
    let mut before = before["data"].clone();
    let mut after = after["data"].clone();
    assert_eq!(after["status"], "in_progress");
    before["status"] = Value::Null;
    after["status"] = Value::Null;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_status_update_accepts_any_transition() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    app.login().await;

    for status in ["completed", "new", "in-progress"] {
        let (code, _) = set_status(&app, id, status).await;
        assert_eq!(code, StatusCode::OK, "{status}");
    }
}

#[tokio::test]
async fn test_status_update_rejects_unknown_status() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    app.login().await;

    let (status, body) = set_status(&app, id, "archived").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = app.get_json(&format!("/api/applications/{id}")).await;
    assert_eq!(body["data"]["status"], "new");
}

#[tokio::test]
async fn test_status_update_without_status_is_bad_request() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    app.login().await;

    let response = app
        .client
        .put(app.url(&format!("/api/applications/{id}/status")))
        .json(&json!({}))
        .send()
        .await
        .expect("Request failed");
    let (status, body) = json_parts(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Status is required");

    let response = app
        .client
        .put(app.url(&format!("/api/applications/{id}/status")))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Request failed");
    let (status, body) = json_parts(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::spawn().await;
    app.login().await;

    let (status, body) = app.get_json("/api/applications/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());

    let (status, body) = set_status(&app, -1, "completed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_status_update_unknown_id() {
    let app = TestApp::spawn().await;
    app.login().await;

    let (status, body) = set_status(&app, 9999, "completed").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_delete_then_fetch_is_not_found() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    let other = submit(&app, "Ben").await;
    app.login().await;

    let response = app
        .client
        .delete(app.url(&format!("/api/applications/{id}")))
        .send()
        .await
        .expect("Request failed");
    let (status, body) = json_parts(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = app.get_json(&format!("/api/applications/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get_json(&format!("/api/applications/{other}")).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .client
        .delete(app.url(&format!("/api/applications/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .client
        .get(app.url(&format!("/admin/applications/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_newest_first_and_filter() {
    let app = TestApp::spawn().await;
    let first = submit(&app, "Ana").await;
    let second = submit(&app, "Ben").await;
    let third = submit(&app, "Cy").await;
    app.login().await;
    set_status(&app, second, "completed").await;

    let (status, body) = app.get_json("/api/applications").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);

    let (_, body) = app.get_json("/api/applications?status=completed").await;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], second);

    let (status, _) = app.get_json("/api/applications?status=bogus").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_stats_match_records() {
    let app = TestApp::spawn().await;
    let ids = [
        submit(&app, "Ana").await,
        submit(&app, "Ben").await,
        submit(&app, "Cy").await,
        submit(&app, "Dee").await,
        submit(&app, "Eve").await,
    ];
    app.login().await;
    set_status(&app, ids[0], "in_progress").await;
    set_status(&app, ids[1], "completed").await;
    set_status(&app, ids[2], "completed").await;

    let (status, body) = app.get_json("/api/applications/refresh").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["applications"].as_array().unwrap().len(), 5);
    assert_eq!(
        body["stats"],
        json!({ "total": 5, "new": 2, "in_progress": 1, "completed": 2 })
    );

    let applications = body["applications"].as_array().unwrap();
    for status in ["new", "in_progress", "completed"] {
        let counted = applications
            .iter()
            .filter(|a| a["status"] == status)
            .count();
        assert_eq!(body["stats"][status].as_u64().unwrap(), counted as u64);
    }
}

#[tokio::test]
async fn test_dashboard_counts_ignore_filter() {
    let app = TestApp::spawn().await;
    let ana = submit(&app, "Ana").await;
    submit(&app, "Ben").await;
    app.login().await;
    set_status(&app, ana, "completed").await;

    let response = app
        .client
        .get(app.url("/admin?status=completed"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    let html = response.text().await.unwrap();

    assert!(html.contains(r#"data-stat="total">2<"#), "{html}");
    assert!(html.contains(r#"data-stat="new">1<"#));
    assert!(html.contains(r#"data-stat="completed">1<"#));
    assert!(html.contains("Ana"));
    assert!(!html.contains("Ben"));

    let html = app
        .client
        .get(app.url("/admin?status=nonsense"))
        .send()
        .await
        .expect("Request failed")
        .text()
        .await
        .unwrap();
    assert!(html.contains("Ana"));
    assert!(html.contains("Ben"));
}

#[tokio::test]
async fn test_application_detail_page() {
    let app = TestApp::spawn().await;
    let id = submit(&app, "Ana").await;
    app.login().await;

    let response = app
        .client
        .get(app.url(&format!("/admin/applications/{id}")))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("ana@example.com"));
    assert!(html.contains(r#"<option value="new" selected>New</option>"#));
    assert!(html.contains(r#"<option value="completed">Completed</option>"#));
}

#[tokio::test]
async fn test_contacts_listed_for_admin() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .post_json(
            "/api/contact",
            &json!({
                "name": "Priya",
                "email": "priya@example.com",
                "phone": "555",
                "subject": "Hello",
                "message": "Question"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.login().await;

    let (status, body) = app.get_json("/api/contacts").await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["subject"], "Hello");
}
