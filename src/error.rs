//! Error types for Beaconpost.
//!
//! [`ProxyError`] covers startup and command failures, which terminate
//! the process before (or instead of) serving traffic. [`ForwardError`]
//! is the per-request taxonomy; it converts into one of the fixed
//! failure responses and never carries upstream detail to the client.
//! [`ValidationError`] describes one bad configuration option.

use axum::response::{IntoResponse, Response};
use hyper::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ProxyError {
    #[error("Configuration invalid:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(StatusCode),
}

/// Failure of a single forwarded request.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The outbound request could not be built or sent.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// The script upstream answered with something other than 200.
    #[error("upstream returned {0}")]
    UpstreamNonOk(StatusCode),

    /// The body failed after the status line was committed.
    ///
    /// Log-only: by then the response is on the wire, so this never becomes
    /// a response of its own. The relay logs it and the connection is
    /// aborted instead. Its `IntoResponse` arm exists for exhaustiveness.
    #[error("body relay failed: {0}")]
    BodyRelayFailure(String),
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::UpstreamNonOk(status) => *status,
            Self::UpstreamUnreachable(_) | Self::BodyRelayFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ForwardError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, status.canonical_reason().unwrap_or_default()).into_response()
    }
}
