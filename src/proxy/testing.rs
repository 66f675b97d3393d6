//! Upstream body double that counts how often it is released.

use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use http_body_util::Full;

#[derive(Clone)]
pub struct Releases(Arc<AtomicUsize>);

impl Releases {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct TrackedBody<B> {
    inner: B,
    releases: Releases,
}

impl<B> TrackedBody<B> {
    pub fn new(inner: B) -> (Self, Releases) {
        let releases = Releases(Arc::new(AtomicUsize::new(0)));
        (
            Self {
                inner,
                releases: releases.clone(),
            },
            releases,
        )
    }
}

impl TrackedBody<Full<Bytes>> {
    pub fn full(data: &'static [u8]) -> (Self, Releases) {
        Self::new(Full::new(Bytes::from_static(data)))
    }
}

impl<B: Body + Unpin> Body for TrackedBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> Drop for TrackedBody<B> {
    fn drop(&mut self) {
        self.releases.0.fetch_add(1, Ordering::SeqCst);
    }
}
