//! Checks for individual proxy options.
//!
//! Each function validates one option and returns a human-readable
//! message on failure; [`ProxyConfig::from_args`](super::ProxyConfig::from_args)
//! wraps these into [`ValidationError`] values.

use axum::http::HeaderValue;
use hyper::Uri;
use url::Url;

use super::{ScriptUrlTemplate, SCRIPT_SLOT};
use crate::error::ValidationError;

/// Validate a `host:port` listen address. The host may be a name.
pub fn validate_listen_address(addr: &str) -> Result<(), String> {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return Err(format!("'{addr}' has no port"));
    };
    if host.is_empty() {
        return Err(format!("'{addr}' has no host"));
    }
    port.parse::<u16>()
        .map(|_| ())
        .map_err(|_| format!("'{port}' is not a valid port"))
}

/// Validate an absolute http(s) upstream URL and convert it for the client.
pub fn validate_upstream_url(raw: &str) -> Result<Uri, String> {
    let parsed = Url::parse(raw).map_err(|_| format!("'{raw}' is not a valid URL"))?;
    let scheme = parsed.scheme();
    if scheme != "http" && scheme != "https" {
        return Err(format!(
            "unsupported scheme '{scheme}' (expected http or https)"
        ));
    }
    parsed
        .as_str()
        .parse::<Uri>()
        .map_err(|e| format!("'{raw}' is not a valid URI: {e}"))
}

/// Validate the script template: one slot, and a valid URL once filled.
pub fn validate_script_url(raw: &str) -> Result<ScriptUrlTemplate, String> {
    let template = ScriptUrlTemplate::parse(raw)?;
    validate_upstream_url(&template.render("script.js")).map_err(|_| {
        format!("'{raw}' does not form a valid http(s) URL once '{SCRIPT_SLOT}' is filled")
    })?;
    Ok(template)
}

/// Validate the CORS allow-list. Entries are trimmed and empty ones dropped.
pub fn validate_cors_origins(raw: &[String]) -> Result<Vec<HeaderValue>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut origins = Vec::new();

    for origin in raw.iter().map(|o| o.trim()).filter(|o| !o.is_empty()) {
        if origin == "*" {
            errors.push(ValidationError {
                field: "CORS_ORIGINS".into(),
                message: "wildcard origin '*' is not allowed".into(),
                suggestion: Some("list each allowed origin explicitly".into()),
            });
            continue;
        }
        match HeaderValue::from_str(origin) {
            Ok(value) => origins.push(value),
            Err(_) => errors.push(ValidationError {
                field: "CORS_ORIGINS".into(),
                message: format!("'{origin}' is not a valid origin"),
                suggestion: None,
            }),
        }
    }

    if origins.is_empty() && errors.is_empty() {
        errors.push(ValidationError {
            field: "CORS_ORIGINS".into(),
            message: "required when CORS is enabled".into(),
            suggestion: Some("set CORS_ENABLED=false to disable CORS".into()),
        });
    }

    if errors.is_empty() {
        Ok(origins)
    } else {
        Err(errors)
    }
}
