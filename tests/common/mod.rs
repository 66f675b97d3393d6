//! Shared helpers: a mock analytics upstream and a proxy bound to it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::Router;
use futures_util::{stream, StreamExt};

use beaconpost::cli::ProxyArgs;
use beaconpost::config::ProxyConfig;
use beaconpost::server::{self, AppState};

pub const ALLOWED_ORIGIN: &str = "https://example.com";
pub const LARGE_SCRIPT_LEN: usize = 4 * 1024 * 1024;
pub const TRUNCATED_PREFIX: &[u8] = b"// first half of the script";

/// Counts every request the mock upstream receives.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

async fn script(State(hits): State<Hits>, Path(name): Path<String>) -> Response {
    hits.record();
    match name.as_str() {
        "missing.js" => (StatusCode::NOT_FOUND, "provider error page").into_response(),
        "broken.js" => (StatusCode::BAD_GATEWAY, "provider error page").into_response(),
        "truncated.js" => truncated_script(),
        "large.js" => (
            [("content-type", "application/javascript")],
            vec![b'x'; LARGE_SCRIPT_LEN],
        )
            .into_response(),
        _ => Response::builder()
            .header("content-type", "application/javascript")
            .header("cache-control", "public, max-age=86400")
            .header("x-upstream", "one")
            .header("x-upstream", "two")
            .body(axum::body::Body::from(format!("// script {name}")))
            .unwrap(),
    }
}

/// Sends one chunk, then fails the body after the headers are on the wire.
fn truncated_script() -> Response {
    let chunks = stream::iter([true, false]).then(|first| async move {
        if first {
            Ok(axum::body::Bytes::from_static(TRUNCATED_PREFIX))
        } else {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "upstream aborted",
            ))
        }
    });
    Response::builder()
        .header("content-type", "application/javascript")
        .body(axum::body::Body::from_stream(chunks))
        .unwrap()
}

/// Echoes method, headers (in received order), and body as JSON.
async fn event(
    State(hits): State<Hits>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    hits.record();
    let headers: Vec<(String, String)> = headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let echo = serde_json::json!({
        "method": method.as_str(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    });
    (
        StatusCode::ACCEPTED,
        [("content-type", "application/json"), ("x-upstream", "event")],
        echo.to_string(),
    )
        .into_response()
}

pub async fn start_upstream() -> (SocketAddr, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/js/{name}", get(script))
        .route("/api/event", any(event))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, hits)
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn proxy_args(upstream: SocketAddr) -> ProxyArgs {
    ProxyArgs {
        listen_address: "127.0.0.1:0".into(),
        script_url: format!("http://{upstream}/js/%s"),
        api_url: format!("http://{upstream}/api/event"),
        cors_origins: vec![ALLOWED_ORIGIN.into()],
        cors_enabled: true,
    }
}

pub async fn start_proxy(args: &ProxyArgs) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let config = Arc::new(ProxyConfig::from_args(args).unwrap());
    let state = Arc::new(AppState::new(config, server::build_http_client()));
    let router = server::build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}
