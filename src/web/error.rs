use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Request failures that end in an error status rather than a redirect.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,

    /// Missing form field, non-numeric integer field, or malformed JSON body.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl WebError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        WebError::BadRequest(msg.into())
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        // Details go to the log, never to the client.
        let body = match &self {
            Self::NotFound => "Not Found",
            Self::BadRequest(detail) => {
                tracing::info!(%detail, "rejected malformed request");
                "Bad Request"
            }
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), "request failed");
                "Internal Server Error"
            }
        };
        (self.status_code(), body).into_response()
    }
}
