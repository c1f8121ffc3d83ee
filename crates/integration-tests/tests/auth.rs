//! Login, logout, signup and session handling.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use reqwest::StatusCode;

use visa_desk_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, TestOptions, location,
};

#[tokio::test]
async fn test_login_and_logout() {
    let app = TestApp::spawn().await;

    app.login().await;
    let (status, _) = app.get_json("/api/applications").await;
    assert_eq!(status, StatusCode::OK);

    // Login page skips ahead once signed in
    let response = app
        .client
        .get(app.url("/admin/login"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));

    let response = app
        .client
        .post(app.url("/admin/logout"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login?success=logged_out"));

    let (status, _) = app.get_json("/api/applications").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::spawn().await;

    let response = app
        .login_as(&ADMIN_EMAIL.to_uppercase(), ADMIN_PASSWORD)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::spawn().await;

    for (email, password) in [
        (ADMIN_EMAIL, "wrong-password"),
        ("nobody@visadesk.test", ADMIN_PASSWORD),
        ("not-an-email", ADMIN_PASSWORD),
    ] {
        let response = app.login_as(email, password).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/admin/login?error=credentials"));
    }

    let (status, _) = app.get_json("/api/applications").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let html = app
        .client
        .get(app.url("/admin/login?error=credentials"))
        .send()
        .await
        .expect("Request failed")
        .text()
        .await
        .unwrap();
    assert!(html.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_session_for_deleted_admin_is_flushed() {
    let app = TestApp::spawn().await;
    app.login().await;

    sqlx::query("DELETE FROM admin")
        .execute(&app.pool)
        .await
        .unwrap();

    let (status, _) = app.get_json("/api/applications").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .get(app.url("/admin"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login"));

    // The flushed session no longer lets the login page skip ahead
    let response = app
        .client
        .get(app.url("/admin/login"))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_signup_disabled_by_default() {
    let app = TestApp::spawn().await;

    let html = app
        .client
        .get(app.url("/admin/signup"))
        .send()
        .await
        .expect("Request failed")
        .text()
        .await
        .unwrap();
    assert!(html.contains("Signup is disabled"));

    let response = app
        .client
        .post(app.url("/admin/signup"))
        .form(&[
            ("name", "Mallory"),
            ("email", "mallory@visadesk.test"),
            ("password", "long-enough-password"),
            ("password_confirm", "long-enough-password"),
        ])
        .send()
        .await
        .expect("Request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/signup?error=disabled"));
    assert_eq!(app.count("admin").await, 1);
}

#[tokio::test]
async fn test_signup_when_enabled() {
    let app = TestApp::spawn_with(TestOptions {
        allow_signup: true,
        ..TestOptions::default()
    })
    .await;

    let signup = |name: &'static str, email: &'static str, password: &'static str, confirm: &'static str| {
        app.client
            .post(app.url("/admin/signup"))
            .form(&[
                ("name", name),
                ("email", email),
                ("password", password),
                ("password_confirm", confirm),
            ])
            .send()
    };

    let response = signup("Grace", "grace@visadesk.test", "short", "short")
        .await
        .expect("Request failed");
    assert_eq!(location(&response), Some("/admin/signup?error=weak_password"));

    let response = signup("Grace", "grace@visadesk.test", "long-enough-1", "long-enough-2")
        .await
        .expect("Request failed");
    assert_eq!(
        location(&response),
        Some("/admin/signup?error=password_mismatch")
    );

    let response = signup("Dup", ADMIN_EMAIL, "long-enough-password", "long-enough-password")
        .await
        .expect("Request failed");
    assert_eq!(location(&response), Some("/admin/signup?error=exists"));

    let response = signup(
        "Grace",
        "grace@visadesk.test",
        "long-enough-password",
        "long-enough-password",
    )
    .await
    .expect("Request failed");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/login?success=created"));
    assert_eq!(app.count("admin").await, 2);

    let response = app
        .login_as("grace@visadesk.test", "long-enough-password")
        .await;
    assert_eq!(location(&response), Some("/admin"));
}
