//! Header policy for event beacons and relayed responses.
//!
//! [`filter_event_headers`] copies inbound headers for the event upstream,
//! dropping cookies, edge-injected `cf-*` metadata, the `Host` header, and
//! connection-scoped headers, then replaces the `X-Forwarded-For` chain
//! with the first hop only. [`is_hop_by_hop`] and [`connection_tokens`]
//! are shared with the relay.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
    "proxy-authorization",
    "proxy-authenticate",
];

/// Connection-scoped headers describe one hop and are never relayed.
#[must_use]
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Header names a `Connection` header declares as scoped to this hop.
#[must_use]
pub fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}

/// Whether an inbound event header must not reach the analytics upstream.
///
/// `HeaderName` is always lowercase, so plain comparisons here are
/// case-insensitive with respect to the wire.
#[must_use]
pub fn is_withheld(name: &HeaderName) -> bool {
    let name = name.as_str();
    name == "cookie" || name.starts_with("cf-") || name == "host"
}

/// First entry of the inbound `X-Forwarded-For` chain, trimmed.
///
/// Returns an empty string when the header is absent or unreadable.
#[must_use]
pub fn first_forwarded_for(headers: &HeaderMap) -> &str {
    headers
        .get(&X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|chain| chain.split(',').next())
        .map_or("", str::trim)
}

pub fn filter_event_headers(original: &HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(original.len());
    let scoped = connection_tokens(original);

    // `iter` yields every value of a repeated header in arrival order.
    for (name, value) in original {
        if is_withheld(name)
            || is_hop_by_hop(name)
            || scoped.contains(name)
            || *name == X_FORWARDED_FOR
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    let client_ip = first_forwarded_for(original);
    let value = HeaderValue::from_str(client_ip).unwrap_or_else(|_| {
        tracing::warn!("unusable x-forwarded-for entry, forwarding empty value");
        HeaderValue::from_static("")
    });
    headers.insert(X_FORWARDED_FOR, value);

    headers
}
