//! Health probes, public site fallback and request IDs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use reqwest::StatusCode;

use visa_desk_integration_tests::TestApp;

#[tokio::test]
async fn test_health_probes() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = app
        .client
        .get(app.url("/health/ready"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_public_site_served_from_disk() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("Apply for your visa"));

    let response = app
        .client
        .get(app.url("/missing-page.html"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_assets_served() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/static/dashboard.js"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Request failed");
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert_eq!(generated.len(), 36);

    let response = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "edge-7f3a9c")
        .send()
        .await
        .expect("Request failed");
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("edge-7f3a9c")
    );
}
