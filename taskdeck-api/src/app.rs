/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskdeck_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskdeck_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::middleware::{envelope, security::SecurityHeadersLayer};
use crate::{config::Config, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::context::JwtKeyProvider;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

impl JwtKeyProvider for AppState {
    fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /auth/
/// │   └── POST /login                # Issue access token (public)
/// ├── /users/
/// │   ├── POST   /                   # Register (public)
/// │   ├── GET    /                   # List users
/// │   ├── GET    /:id                # Fetch user
/// │   ├── PATCH  /:id                # Update user
/// │   └── DELETE /:id                # Remove user
/// └── /tasks/
///     ├── POST   /                   # Create task
///     ├── GET    /                   # List caller's tasks
///     ├── GET    /stats/user/:id     # Per-user status counts
///     ├── GET    /:id                # Fetch caller's task
///     ├── PATCH  /:id                # Update task
///     └── DELETE /:id                # Remove task
/// ```
///
/// Protected handlers declare an `AuthContext` parameter, which rejects the
/// request before the handler body runs when the bearer token is missing or
/// invalid. `/health`, `POST /auth/login`, and `POST /users` are the only
/// routes without it.
///
/// # Middleware Stack
///
/// Applied in order (innermost to outermost):
/// 1. Error envelope stamping
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
/// 4. Security headers
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new().route("/login", post(routes::auth::login));

    let user_routes = Router::new()
        .route(
            "/",
            post(routes::users::register).get(routes::users::list_users),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/stats/user/:id", get(routes::tasks::user_task_stats))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .layer(axum::middleware::from_fn(envelope::stamp_error_envelope))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    // connect_lazy needs a Tokio context in sqlx 0.7
    #[tokio::test]
    async fn test_app_state_jwt_secret() {
        let config = Config {
            api: crate::config::ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: crate::config::DatabaseConfig {
                url: "postgresql://localhost/taskdeck_test".to_string(),
                max_connections: 5,
            },
            jwt: crate::config::JwtConfig {
                secret: "a-secret-long-enough-for-hs256-use".to_string(),
            },
        };
        let db = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgresql://localhost/taskdeck_test")
            .unwrap();

        let state = AppState::new(db, config);
        assert_eq!(state.jwt_secret(), "a-secret-long-enough-for-hs256-use");
    }
}
