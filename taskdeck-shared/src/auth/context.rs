/// Per-request session context
///
/// `AuthContext` is the explicit session object passed through request
/// handling: an axum extractor that parses the `Authorization: Bearer`
/// header, validates the token, and exposes the caller's verified identity
/// and role. There is no process-wide auth state.
///
/// # Example
///
/// ```ignore
/// use taskdeck_shared::auth::context::AuthContext;
///
/// async fn protected_handler(auth: AuthContext) -> String {
///     format!("Hello, user {}!", auth.user_id)
/// }
/// ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Provides the JWT signing secret to the extractor
///
/// Implemented by the API server's application state.
pub trait JwtKeyProvider {
    /// The HS256 signing secret
    fn jwt_secret(&self) -> &str;
}

/// Verified caller identity for the current request
///
/// Built from validated token claims; handlers trust these fields without
/// re-querying the user row.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Email embedded in the token
    pub email: String,

    /// Role embedded in the token
    pub role: UserRole,
}

impl AuthContext {
    /// Creates a context from validated claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }

    /// Whether the caller holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Error type for bearer-token extraction
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // Any unusable credential is a 401, whatever shape it arrived in
        (StatusCode::UNAUTHORIZED, self.to_string()).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: JwtKeyProvider + Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingCredentials)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

        let claims = validate_token(token, state.jwt_secret()).map_err(|e| match e {
            JwtError::Expired => AuthError::InvalidToken("Token has expired".to_string()),
            other => AuthError::InvalidToken(other.to_string()),
        })?;

        Ok(AuthContext::from_claims(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use axum::http::Request;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    struct TestState;

    impl JwtKeyProvider for TestState {
        fn jwt_secret(&self) -> &str {
            SECRET
        }
    }

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/tasks");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_extracts_valid_bearer_token() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, "user@example.com".to_string(), UserRole::Admin);
        let token = create_token(&claims, SECRET).unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        let auth = AuthContext::from_request_parts(&mut parts, &TestState)
            .await
            .unwrap();

        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.email, "user@example.com");
        assert!(auth.is_admin());
    }

    #[tokio::test]
    async fn test_missing_header_rejected() {
        let mut parts = parts_with_header(None);
        let result = AuthContext::from_request_parts(&mut parts, &TestState).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_non_bearer_header_rejected() {
        let mut parts = parts_with_header(Some("Basic dXNlcjpwYXNz"));
        let result = AuthContext::from_request_parts(&mut parts, &TestState).await;
        assert!(matches!(result, Err(AuthError::InvalidFormat(_))));
    }

    #[test]
    fn test_every_rejection_is_unauthorized() {
        for err in [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("Expected Bearer token".to_string()),
            AuthError::InvalidToken("bad signature".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let claims = Claims::new(Uuid::new_v4(), "user@example.com".to_string(), UserRole::User);
        let token = create_token(&claims, "some-other-secret-32-bytes-long-xx").unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        let result = AuthContext::from_request_parts(&mut parts, &TestState).await;
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }
}
