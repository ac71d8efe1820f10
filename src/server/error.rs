use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::models::ErrorResponse;

/// Handler failure carried to the client as `{"detail": "..."}`.
/// 400 for anything wrong with the request itself, 500 for downstream
/// engine and model failures.
#[derive(Debug)]
pub(crate) struct ServerError {
    pub(crate) status: StatusCode,
    pub(crate) message: String,
}

impl ServerError {
    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::internal(err.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_errors_become_internal() {
        let err: ServerError = anyhow::anyhow!("ollama exploded").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "ollama exploded");
    }

    #[test]
    fn error_body_uses_detail_key() {
        let body = ErrorResponse {
            detail: "text must be a non-empty string".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json.get("detail").unwrap().as_str().unwrap(),
            "text must be a non-empty string"
        );
    }
}
