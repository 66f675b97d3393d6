//! Script fetches: `GET /js/{name}` to the configured script template.

use std::time::Instant;

use axum::body::Body;
use axum::response::{IntoResponse, Response};
use hyper::{Method, Request, StatusCode, Uri};

use super::relay::relay;
use crate::config::ScriptUrlTemplate;
use crate::error::ForwardError;
use crate::server::HttpClient;

#[derive(Clone)]
pub struct ScriptForwarder {
    client: HttpClient,
    template: ScriptUrlTemplate,
}

impl ScriptForwarder {
    #[must_use]
    pub fn new(client: HttpClient, template: ScriptUrlTemplate) -> Self {
        Self { client, template }
    }

    /// Fetch script `name` from the upstream and relay it.
    ///
    /// Anything but a 200 from the upstream is answered with the same
    /// status and its reason phrase; the upstream body is discarded so a
    /// provider error page is never served as the script.
    pub async fn forward(&self, name: &str) -> Response {
        match self.fetch(name).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }

    async fn fetch(&self, name: &str) -> Result<Response, ForwardError> {
        let url = self.template.render(name);
        let uri: Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
            tracing::error!(upstream = %url, error = %e, "invalid script URL");
            ForwardError::UpstreamUnreachable(e.to_string())
        })?;

        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| ForwardError::UpstreamUnreachable(e.to_string()))?;

        let start = Instant::now();
        let response = self.client.request(request).await.map_err(|e| {
            tracing::error!(
                upstream = %url,
                error = %e,
                latency_ms = start.elapsed().as_millis(),
                "script upstream unreachable"
            );
            ForwardError::UpstreamUnreachable(e.to_string())
        })?;

        let relayed = relay_if_ok(response, &url)?;
        tracing::info!(
            script = %name,
            latency_ms = start.elapsed().as_millis(),
            "script fetched"
        );
        Ok(relayed)
    }
}

/// Relay a 200 upstream response; anything else becomes
/// [`ForwardError::UpstreamNonOk`] and the upstream body is dropped here,
/// unread.
pub fn relay_if_ok<B>(upstream: hyper::Response<B>, url: &str) -> Result<Response, ForwardError>
where
    B: http_body::Body<Data = bytes::Bytes> + Unpin + Send + 'static,
    B::Error: std::fmt::Display + Into<axum::BoxError>,
{
    let status = upstream.status();
    if status != StatusCode::OK {
        tracing::warn!(
            upstream = %url,
            status = status.as_u16(),
            "script upstream returned non-200"
        );
        return Err(ForwardError::UpstreamNonOk(status));
    }
    Ok(relay(upstream, url))
}
