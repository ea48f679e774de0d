/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - Verify credentials and issue an access token
///
/// Registration lives under `POST /users`, since creating an account and
/// managing the user directory share one resource.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::ApiResponse,
    validation::validate_request,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::{jwt, password},
    models::user::User,
};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Signed access token (24h)
    pub access_token: String,

    /// The authenticated user (password hash omitted)
    pub user: User,
}

/// Login and obtain an access token
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Unknown email or wrong password (indistinguishable
///   by design, so the response never reveals which accounts exist)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginData>>> {
    validate_request(&req)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, user.email.clone(), user.role);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(ApiResponse::new(
        "Login successful",
        LoginData { access_token, user },
    )))
}
