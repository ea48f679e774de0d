/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - App construction without a live database (lazy pool)
/// - Test database setup and per-test user creation
/// - JWT token generation
/// - Request and response helpers

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskdeck_shared::auth::jwt::{create_token, Claims};
use taskdeck_shared::auth::password;
use taskdeck_shared::db::migrations::run_migrations;
use taskdeck_shared::models::task::{CreateTask, Task, TaskStatus};
use taskdeck_shared::models::user::{CreateUser, User, UserRole};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Builds a test configuration
///
/// The database URL points at a closed port so lazy connections fail fast
/// when a test accidentally touches the pool.
pub fn test_config(database_url: &str) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Builds the app without connecting to a database
///
/// Suitable for exercising authentication, validation, and routing paths
/// that reject before any query runs.
pub fn lazy_app() -> axum::Router {
    let url = "postgresql://127.0.0.1:1/taskdeck_test";
    let db = PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(1))
        .connect_lazy(url)
        .expect("lazy pool construction should not fail");

    build_router(AppState::new(db, test_config(url)))
}

/// Issues a bearer header for an arbitrary user id and role
pub fn auth_header(user_id: Uuid, role: UserRole) -> String {
    let claims = Claims::new(user_id, format!("{}@example.com", user_id), role);
    let token = create_token(&claims, TEST_JWT_SECRET).expect("token creation");
    format!("Bearer {}", token)
}

/// Builds a JSON request
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a bodyless request
pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        panic!(
            "response body was not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&bytes)
        )
    })
}

/// Asserts the standard error envelope shape
pub fn assert_error_envelope(json: &serde_json::Value, status: StatusCode, path: &str) {
    assert_eq!(json["success"], false);
    assert_eq!(json["statusCode"], status.as_u16());
    assert_eq!(json["path"], path);
    assert!(json["timestamp"].is_string());
    assert!(json["message"].is_string());
}

/// Test context backed by a real database
///
/// Used by the `#[ignore]`d end-to-end tests. Each context creates its own
/// user so tests stay independent.
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub auth: String,
}

impl TestContext {
    /// Connects to `DATABASE_URL`, runs migrations, and creates a fresh user
    pub async fn new(role: UserRole) -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/taskdeck_test".to_string());

        let db = PgPool::connect(&url).await?;
        run_migrations(&db).await?;

        let user = User::create(
            &db,
            CreateUser {
                name: "Test User".to_string(),
                email: format!("test-{}@example.com", Uuid::new_v4()),
                password_hash: password::hash_password("test-password-123")?,
                role,
            },
        )
        .await?;

        let auth = auth_header(user.id, user.role);

        let app = build_router(AppState::new(db.clone(), test_config(&url)));

        Ok(Self {
            db,
            app,
            user,
            auth,
        })
    }

    /// Deletes the test user (tasks assigned to it become unassigned)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Seeds a task assigned to the given user directly through the model layer
pub async fn seed_task(
    db: &PgPool,
    title: &str,
    status: TaskStatus,
    assigned_to: Uuid,
) -> anyhow::Result<Task> {
    let task = Task::create(
        db,
        CreateTask {
            title: title.to_string(),
            description: None,
            status,
            due_date: None,
            assigned_to: Some(assigned_to),
        },
    )
    .await?;
    Ok(task)
}
