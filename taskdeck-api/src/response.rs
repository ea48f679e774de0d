/// Success response envelope
///
/// Every successful response is wrapped as
/// `{success: true, message, data}`.

use serde::Serialize;

/// Success envelope wrapping response data
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Always true
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Response payload
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Wraps `data` in the success envelope
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}
