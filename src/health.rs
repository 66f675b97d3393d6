//! `GET /health` endpoint handler.
//!
//! Answers `200 OK` with a plain-text body and never touches the upstream.

pub const HEALTH_BODY: &str = "OK";

pub async fn health_handler() -> &'static str {
    HEALTH_BODY
}
