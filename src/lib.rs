//! Beaconpost is a first-party reverse proxy for Plausible analytics.
//!
//! It serves the analytics script and relays event beacons from the
//! site's own domain, so blocklists keyed on the analytics provider's
//! domain do not drop them. Every request is handled independently: one
//! outbound call, the upstream response streamed back unmodified, and a
//! uniform failure response when the upstream cannot be reached.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, validate, health).
//! - [`config`] -- Immutable startup configuration and its validation.
//! - [`error`] -- Startup and per-request error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Core HTTP forwarding: script fetches, event beacons, header
//!   policy, and the streaming response relay.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   CORS, and graceful shutdown.

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
