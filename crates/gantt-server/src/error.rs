use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gantt_core::GanttError;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Internal sentinels for explicit statuses
// ---------------------------------------------------------------------------

/// Carries an explicit HTTP 400 through the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Carries an explicit HTTP 504 through the `anyhow::Error` chain.
#[derive(Debug)]
struct TimeoutError(Duration);

impl std::fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record store did not answer within {}s", self.0.as_secs())
    }
}

impl std::error::Error for TimeoutError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 504 Gateway Timeout error.
    pub fn timeout(after: Duration) -> Self {
        Self(TimeoutError(after).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<TimeoutError>().is_some() {
            return StatusCode::GATEWAY_TIMEOUT;
        }
        match self.0.downcast_ref::<GanttError>() {
            Some(
                GanttError::RequiredTable { .. }
                | GanttError::TableNotFound(_)
                | GanttError::Request { .. }
                | GanttError::Upstream { .. }
                | GanttError::Decode { .. },
            ) => StatusCode::BAD_GATEWAY,
            Some(
                GanttError::MissingCredentials(_)
                | GanttError::InvalidStoreUrl(_)
                | GanttError::HttpClient(_)
                | GanttError::Io(_)
                | GanttError::Yaml(_)
                | GanttError::Json(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self.0, "request failed");
        }
        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
