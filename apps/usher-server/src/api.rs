//! Transport-neutral request and response envelopes.
//!
//! Every entry point (HTTP shim, tests) speaks this shape; the dispatcher
//! maps the method onto a lifecycle operation. The response body always
//! serializes all three fields, with `null` standing in for absent values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A request as delivered by the transport layer.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    /// HTTP-style method selecting the operation (GET/POST/PUT/DELETE).
    pub method: String,
    pub query_params: HashMap<String, String>,
    pub body: Option<Value>,
}

/// The uniform response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<Value>,
}

/// A status code plus the uniform body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    /// 200 with `success: true`.
    pub fn ok(message: Option<String>, data: Option<Value>) -> Self {
        Self::with_status(200, message, data)
    }

    /// Arbitrary status with `success: true`. Informational outcomes keep
    /// `success: true` even on a 404.
    pub fn with_status(status_code: u16, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                success: true,
                message,
                data,
            },
        }
    }

    /// Failure envelope: `success: false`, no data.
    pub fn error(status_code: u16, message: String) -> Self {
        Self {
            status_code,
            body: ResponseBody {
                success: false,
                message: Some(message),
                data: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn body_serializes_absent_fields_as_null() {
        let response = ApiResponse::ok(None, None);
        let encoded = serde_json::to_value(&response.body).unwrap();
        assert_eq!(
            encoded,
            json!({ "success": true, "message": null, "data": null })
        );
    }

    #[test]
    fn error_envelope_carries_message_only() {
        let response = ApiResponse::error(500, "boom".to_string());
        assert_eq!(response.status_code, 500);
        assert!(!response.body.success);
        assert_eq!(response.body.message.as_deref(), Some("boom"));
        assert!(response.body.data.is_none());
    }

    #[test]
    fn informational_status_keeps_success_true() {
        let response = ApiResponse::with_status(404, Some("missing".to_string()), None);
        assert_eq!(response.status_code, 404);
        assert!(response.body.success);
    }
}
