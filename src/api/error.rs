//! Structured API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::UpstreamKind;

/// Failures surfaced to HTTP clients as structured JSON
///
/// Every variant maps to `{error: {code, message, details?}}` with an
/// appropriate status. Vendor failures are classified for user messaging;
/// the raw error text only goes to the log.
#[derive(Debug)]
pub enum ApiError {
    /// 400 with field-level detail
    Validation { field: String, message: String },
    /// 400 without a specific field
    BadRequest(String),
    /// 404, missing resource
    NotFound(String),
    /// 503, required vendor credential absent
    NotConfigured(&'static str),
    /// 500, classified vendor failure
    Upstream(String),
    /// 500, anything else
    Internal(String),
}

impl ApiError {
    /// Validation failure for a named field
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::NotFound(what) => Self::NotFound(what),
            crate::Error::Stt(msg) | crate::Error::Tts(msg) | crate::Error::Agent(msg) => {
                Self::Upstream(msg)
            }
            crate::Error::Http(e) => Self::Upstream(e.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<ErrorDetails>,
}

#[derive(Serialize)]
struct ErrorDetails {
    field: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            Self::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                "validation",
                message,
                Some(ErrorDetails { field }),
            ),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message, None),
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{what} not found"),
                None,
            ),
            Self::NotConfigured(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
                msg.to_string(),
                None,
            ),
            Self::Upstream(raw) => {
                tracing::error!(error = %raw, "upstream failure");
                let kind = UpstreamKind::classify(&raw);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind.code(),
                    kind.user_message().to_string(),
                    None,
                )
            }
            Self::Internal(raw) => {
                tracing::error!(error = %raw, "internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody {
                    code,
                    message,
                    details,
                },
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn response_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_agent_error_maps_to_classified_500() {
        let err = ApiError::from(crate::Error::Agent(
            "agent API error 401 Unauthorized".to_string(),
        ));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "upstream_auth");
        // Raw vendor text stays out of the body
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("401"));
    }

    #[tokio::test]
    async fn test_empty_agent_reply_maps_to_generic_500() {
        let err = ApiError::from(crate::Error::Agent("agent returned empty reply".to_string()));
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "upstream_error");
    }

    #[tokio::test]
    async fn test_validation_carries_field_detail() {
        let response = ApiError::validation("voice", "must not be empty").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "validation");
        assert_eq!(json["error"]["details"]["field"], "voice");
    }
}
