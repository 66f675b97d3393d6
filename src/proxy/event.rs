//! Event beacons: `POST /api/event` to the fixed event endpoint.

use std::time::Instant;

use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use hyper::Uri;

use super::headers::filter_event_headers;
use super::relay::relay;
use crate::error::ForwardError;
use crate::server::HttpClient;

#[derive(Clone)]
pub struct EventForwarder {
    client: HttpClient,
    api_url: Uri,
}

impl EventForwarder {
    #[must_use]
    pub fn new(client: HttpClient, api_url: Uri) -> Self {
        Self { client, api_url }
    }

    /// Forward an event with its original method and streaming body.
    ///
    /// Only the headers change: see
    /// [`filter_event_headers`](super::headers::filter_event_headers).
    pub async fn forward(&self, inbound: Request) -> Response {
        match self.send(inbound).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }

    async fn send(&self, inbound: Request) -> Result<Response, ForwardError> {
        let (parts, body) = inbound.into_parts();

        let mut request = hyper::Request::new(body);
        *request.method_mut() = parts.method.clone();
        *request.uri_mut() = self.api_url.clone();
        *request.headers_mut() = filter_event_headers(&parts.headers);

        let start = Instant::now();
        let response = self.client.request(request).await.map_err(|e| {
            tracing::error!(
                upstream = %self.api_url,
                method = %parts.method,
                error = %e,
                latency_ms = start.elapsed().as_millis(),
                "event upstream unreachable"
            );
            ForwardError::UpstreamUnreachable(e.to_string())
        })?;

        tracing::info!(
            method = %parts.method,
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "event forwarded"
        );
        Ok(relay(response, &self.api_url.to_string()))
    }
}
