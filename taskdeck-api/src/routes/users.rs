/// User directory endpoints
///
/// # Endpoints
///
/// - `POST /users` - Register a new account (public)
/// - `GET /users` - List all users
/// - `GET /users/:id` - Fetch a user
/// - `PATCH /users/:id` - Update a user
/// - `DELETE /users/:id` - Remove a user
///
/// Everything except registration requires a bearer token.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    validation::validate_request,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskdeck_shared::{
    auth::{context::AuthContext, password},
    models::user::{CreateUser, UpdateUser, User, UserRole},
};
use uuid::Uuid;
use validator::Validate;

/// Registration request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (hashed before storage, never persisted in plaintext)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Role (defaults to `user`)
    pub role: Option<UserRole>,
}

/// Update request
///
/// All fields optional; omitted fields are left untouched.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password (rehashed before storage)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// New role
    pub role: Option<UserRole>,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "name": "John Doe",
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "role": "user"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    validate_request(&req)?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role.unwrap_or_default(),
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User created successfully", user)),
    ))
}

/// List all users
pub async fn list_users(
    _auth: AuthContext,
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let users = User::list(&state.db).await?;

    Ok(Json(ApiResponse::new("Users retrieved successfully", users)))
}

/// Fetch a single user by ID
///
/// # Errors
///
/// - `404 Not Found`: No user with that ID
pub async fn get_user(
    _auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", id)))?;

    Ok(Json(ApiResponse::new("User retrieved successfully", user)))
}

/// Update a user
///
/// A new password is rehashed before storage; the plaintext is never
/// persisted.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `404 Not Found`: No user with that ID
/// - `409 Conflict`: New email already taken
pub async fn update_user(
    _auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    validate_request(&req)?;

    let password_hash = match &req.password {
        Some(password) => Some(password::hash_password(password)?),
        None => None,
    };

    let user = User::update(
        &state.db,
        id,
        UpdateUser {
            name: req.name,
            email: req.email,
            password_hash,
            role: req.role,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User with ID {} not found", id)))?;

    tracing::info!(user_id = %user.id, "user updated");

    Ok(Json(ApiResponse::new("User updated successfully", user)))
}

/// Remove a user
///
/// Tasks assigned to the user are left in place and become unassigned
/// (enforced by the schema's `ON DELETE SET NULL`).
///
/// # Errors
///
/// - `404 Not Found`: No user with that ID
pub async fn delete_user(
    _auth: AuthContext,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<serde_json::Value>>> {
    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("User with ID {} not found", id)));
    }

    tracing::info!(user_id = %id, "user deleted");

    Ok(Json(ApiResponse::new(
        "User deleted successfully",
        serde_json::Value::Null,
    )))
}
