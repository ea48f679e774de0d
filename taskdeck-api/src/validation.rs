/// Request payload validation
///
/// Explicit schema validation returning a typed result: handlers call
/// `validate_request` on their DTO and get either `Ok(())` or an
/// `ApiError::ValidationError` carrying field-level messages.

use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, ValidationErrorDetail};

/// Validates a request DTO, mapping failures to the error envelope
pub fn validate_request<T: Validate>(req: &T) -> Result<(), ApiError> {
    req.validate()
        .map_err(|e| ApiError::ValidationError(collect_field_errors(&e)))
}

/// Flattens `validator` errors into field-level details
fn collect_field_errors(errors: &ValidationErrors) -> Vec<ValidationErrorDetail> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct TestRequest {
        #[validate(email(message = "Invalid email format"))]
        email: String,

        #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
        password: String,
    }

    #[test]
    fn test_valid_request_passes() {
        let req = TestRequest {
            email: "user@example.com".to_string(),
            password: "long-enough-password".to_string(),
        };
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_invalid_fields_collected() {
        let req = TestRequest {
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };

        let err = validate_request(&req).unwrap_err();
        let details = match err {
            ApiError::ValidationError(details) => details,
            other => panic!("expected validation error, got {}", other),
        };

        assert_eq!(details.len(), 2);
        assert!(details.iter().any(|d| d.field == "email"));
        assert!(details
            .iter()
            .any(|d| d.field == "password" && d.message.contains("at least 8")));
    }
}
