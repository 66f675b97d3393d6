//! Core HTTP forwarding.
//!
//! [`script_handler`] and [`event_handler`] are the Axum entry points;
//! each delegates to a forwarder held in [`AppState`]. Submodules hold
//! the forwarders ([`script`], [`event`]), the event header policy
//! ([`headers`]), and the streaming response relay ([`relay`]).
//!
//! Every request makes exactly one upstream attempt. There are no retries
//! and no timeouts beyond the transport's own.

pub mod event;
pub mod headers;
pub mod relay;
pub mod script;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::response::Response;

pub use event::EventForwarder;
pub use script::ScriptForwarder;

use crate::server::AppState;

pub async fn script_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    state.script.forward(&name).await
}

pub async fn event_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    state.event.forward(request).await
}
