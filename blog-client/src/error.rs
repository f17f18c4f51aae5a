use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Token storage error: {0}")]
    TokenStorage(#[from] std::io::Error),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl BlogClientError {
    pub async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => Self::from_status(status, &body),
            Err(err) => Self::RequestError(err),
        }
    }

    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());

        match status {
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound,
            other => Self::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_kept() {
        let err = BlogClientError::from_status(
            StatusCode::BAD_REQUEST,
            r#"{"error":"`title` is required"}"#,
        );
        assert!(matches!(err, BlogClientError::InvalidRequest(ref m) if m == "`title` is required"));
    }

    #[test]
    fn auth_statuses_map_to_variants() {
        assert!(matches!(
            BlogClientError::from_status(StatusCode::UNAUTHORIZED, r#"{"error":"unauthorized"}"#),
            BlogClientError::Unauthorized
        ));
        assert!(matches!(
            BlogClientError::from_status(StatusCode::FORBIDDEN, r#"{"error":"forbidden"}"#),
            BlogClientError::Forbidden(_)
        ));
        assert!(matches!(
            BlogClientError::from_status(StatusCode::NOT_FOUND, ""),
            BlogClientError::NotFound
        ));
    }

    #[test]
    fn non_json_body_is_passed_through() {
        let err = BlogClientError::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.to_string(), "Server error (502): upstream down");
    }
}
