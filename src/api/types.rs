//! API response types.

use serde::Serialize;

/// Generic API error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "SESSION_LOOKUP_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn session_lookup_failed(message: impl Into<String>) -> Self {
        Self::new("SESSION_LOOKUP_FAILED", message)
    }

    pub fn render_failed(message: impl Into<String>) -> Self {
        Self::new("RENDER_FAILED", message)
    }
}

/// Service information.
#[derive(Debug, Clone, Serialize)]
pub struct ApiInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

impl Default for ApiInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            status: "running",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_serialization() {
        let err = ErrorResponse::session_lookup_failed("backend down");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "SESSION_LOOKUP_FAILED");
        assert_eq!(json["message"], "backend down");
    }

    #[test]
    fn test_render_failed_code() {
        let json = serde_json::to_value(ErrorResponse::render_failed("bad template")).unwrap();
        assert_eq!(json["code"], "RENDER_FAILED");
        assert_eq!(json["message"], "bad template");
    }

    #[test]
    fn test_api_info() {
        let json = serde_json::to_value(ApiInfo::default()).unwrap();
        assert_eq!(json["name"], "session-dashboard");
        assert_eq!(json["status"], "running");
    }
}
