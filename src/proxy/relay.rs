//! Streaming relay of an upstream response onto the client response.
//!
//! [`relay`] copies the status and every end-to-end header value, then
//! hands the upstream body to the server wrapped in a [`RelayBody`]. The
//! body is never collected: frames move through one at a time.
//!
//! The wrapper owns the upstream body, so the upstream connection is
//! released exactly once, when the wrapper is dropped. That happens after
//! the last frame, after a failure, or when the client goes away early.
//!
//! A body error after the status line has been written cannot be turned
//! into a new status. The wrapper logs the failure and passes the error
//! on, and the server aborts the connection so the client sees a
//! truncated response instead of a silently short one.

use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body as AxumBody;
use axum::response::Response;
use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};

use super::headers::{connection_tokens, is_hop_by_hop};
use crate::error::ForwardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Streaming,
    Complete,
    Failed,
}

pub struct RelayBody<B> {
    inner: B,
    bytes_relayed: u64,
    outcome: RelayOutcome,
    upstream: String,
}

impl<B> RelayBody<B> {
    pub fn new(inner: B, upstream: impl Into<String>) -> Self {
        Self {
            inner,
            bytes_relayed: 0,
            outcome: RelayOutcome::Streaming,
            upstream: upstream.into(),
        }
    }

    #[must_use]
    pub const fn bytes_relayed(&self) -> u64 {
        self.bytes_relayed
    }

    #[must_use]
    pub const fn outcome(&self) -> RelayOutcome {
        self.outcome
    }
}

impl<B> Body for RelayBody<B>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: std::fmt::Display,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match Pin::new(&mut self.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => {
                if let Some(data) = frame.data_ref() {
                    self.bytes_relayed += data.len() as u64;
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.outcome = RelayOutcome::Failed;
                let failure = ForwardError::BodyRelayFailure(e.to_string());
                tracing::error!(
                    upstream = %self.upstream,
                    bytes = self.bytes_relayed,
                    error = %failure,
                    "response already committed, aborting connection"
                );
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.outcome = RelayOutcome::Complete;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for RelayBody<B> {
    fn drop(&mut self) {
        tracing::debug!(
            upstream = %self.upstream,
            bytes = self.bytes_relayed,
            outcome = ?self.outcome,
            "upstream body released"
        );
    }
}

/// Copy an upstream response onto a client response without buffering.
pub fn relay<B>(upstream: hyper::Response<B>, upstream_url: &str) -> Response
where
    B: Body<Data = Bytes> + Unpin + Send + 'static,
    B::Error: std::fmt::Display + Into<axum::BoxError>,
{
    let (parts, body) = upstream.into_parts();

    let mut response = Response::new(AxumBody::new(RelayBody::new(body, upstream_url)));
    *response.status_mut() = parts.status;

    let scoped = connection_tokens(&parts.headers);
    let headers = response.headers_mut();
    for (name, value) in &parts.headers {
        if !is_hop_by_hop(name) && !scoped.contains(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    response
}
