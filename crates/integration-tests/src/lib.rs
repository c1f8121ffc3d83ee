//! Integration test harness for Visa Desk.
//!
//! Each [`TestApp`] runs the real router on an ephemeral port over its own
//! temporary `SQLite` file, with one seeded admin account.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p visa-desk-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;

use reqwest::{Client, Response, StatusCode, header::LOCATION, redirect::Policy};
use secrecy::SecretString;
use serde_json::Value;
use sqlx::SqlitePool;
use tempfile::TempDir;
use tokio::task::JoinHandle;

use visa_desk_server::config::{CorsConfig, SiteConfig};
use visa_desk_server::db;
use visa_desk_server::middleware::create_session_store;
use visa_desk_server::routes;
use visa_desk_server::services::auth::{AuthService, NewAdmin};
use visa_desk_server::state::AppState;

/// Seeded admin email.
pub const ADMIN_EMAIL: &str = "ops@visadesk.test";
/// Seeded admin password.
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";
/// Seeded admin display name.
pub const ADMIN_NAME: &str = "Ops Team";

/// Origin allowed by the test CORS configuration.
pub const ALLOWED_ORIGIN: &str = "https://visas.example.org";

const TEST_SESSION_SECRET: &str =
    "kR9vQ2mXw7LpT4nZ8bYc1JfH6sDg3AeU5iOqW0lVtNrMxBk2PzCyFjGhEdSaIuK7oL";

/// Options for starting a test app.
#[derive(Debug, Clone, Default)]
pub struct TestOptions {
    pub allow_signup: bool,
    pub cors_origins: Vec<String>,
}

/// A running server plus the handles a test needs.
pub struct TestApp {
    pub addr: SocketAddr,
    /// Client with a cookie store that does not follow redirects.
    pub client: Client,
    pub pool: SqlitePool,
    _dir: TempDir,
    server: JoinHandle<()>,
}

impl TestApp {
    /// Start with default options.
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    /// Start with the given options.
    pub async fn spawn_with(options: TestOptions) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&public_dir).expect("Failed to create public dir");
        std::fs::write(
            public_dir.join("index.html"),
            "<!DOCTYPE html><title>Visa Desk</title><h1>Apply for your visa</h1>",
        )
        .expect("Failed to write index.html");

        let database_url = format!("sqlite://{}", dir.path().join("test.db").display());
        let config = SiteConfig {
            database_url: SecretString::from(database_url),
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            session_secret: SecretString::from(TEST_SESSION_SECRET),
            public_dir,
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../server/static"),
            cors: CorsConfig {
                allowed_origins: options.cors_origins,
            },
            allow_signup: options.allow_signup,
            auto_migrate: true,
            bootstrap_admin: None,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 0.0,
            sentry_traces_sample_rate: 0.0,
        };

        let pool = db::create_pool(&config.database_url)
            .await
            .expect("Failed to create pool");
        db::migrate(&pool).await.expect("Failed to migrate");
        let store = create_session_store(&pool);
        store.migrate().await.expect("Failed to migrate sessions");

        AuthService::new(&pool)
            .register(NewAdmin {
                email: ADMIN_EMAIL,
                name: ADMIN_NAME,
                password: ADMIN_PASSWORD,
            })
            .await
            .expect("Failed to seed admin");

        let app = routes::app(AppState::new(config, pool.clone()), store)
            .expect("Failed to build app");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            addr,
            client: new_client(),
            pool,
            _dir: dir,
            server,
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A fresh client with no session.
    #[must_use]
    pub fn anonymous_client(&self) -> Client {
        new_client()
    }

    /// Log in the shared client as the seeded admin.
    pub async fn login(&self) {
        let response = self.login_as(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/admin"));
    }

    /// Post the login form with the shared client.
    pub async fn login_as(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/admin/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("Login request failed")
    }

    /// POST a JSON body to the intake API and return status and body.
    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        json_parts(response).await
    }

    /// GET a JSON endpoint with the shared client.
    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        json_parts(response).await
    }

    /// Row count of a table.
    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Count query failed")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server.abort();
    }
}

fn new_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// Split a response into status and parsed JSON body.
pub async fn json_parts(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response.headers().get(LOCATION).and_then(|v| v.to_str().ok())
}
