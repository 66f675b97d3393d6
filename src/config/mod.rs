//! Immutable startup configuration.
//!
//! [`ProxyConfig`] is resolved once from the command-line / environment
//! options by [`ProxyConfig::from_args`] and then shared read-only with
//! every handler. Option checks live in [`validation`]; all problems are
//! collected and reported together.

pub mod validation;

use axum::http::HeaderValue;
use hyper::Uri;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::cli::ProxyArgs;
use crate::error::{ProxyError, ValidationError};

/// Substitution slot in the script URL template.
pub const SCRIPT_SLOT: &str = "%s";

/// Bytes escaped when a script name becomes one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Script URL template with exactly one [`SCRIPT_SLOT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptUrlTemplate {
    prefix: String,
    suffix: String,
}

impl ScriptUrlTemplate {
    pub fn parse(template: &str) -> Result<Self, String> {
        let slots = template.matches(SCRIPT_SLOT).count();
        if slots != 1 {
            return Err(format!(
                "must contain exactly one '{SCRIPT_SLOT}' slot (found {slots})"
            ));
        }
        let (prefix, suffix) = template
            .split_once(SCRIPT_SLOT)
            .ok_or_else(|| format!("missing '{SCRIPT_SLOT}' slot"))?;
        Ok(Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// Fill the slot with `name`, escaped as a single path segment.
    ///
    /// `name` arrives percent-decoded, so `/`, `?`, `#` and `%` in it are
    /// re-escaped and can never add path segments or a query upstream.
    #[must_use]
    pub fn render(&self, name: &str) -> String {
        self.fill(&utf8_percent_encode(name, PATH_SEGMENT).to_string())
    }

    #[must_use]
    pub fn as_template(&self) -> String {
        self.fill(SCRIPT_SLOT)
    }

    fn fill(&self, segment: &str) -> String {
        format!("{}{segment}{}", self.prefix, self.suffix)
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub listen_address: String,
    pub script_url: ScriptUrlTemplate,
    pub api_url: Uri,
    /// `None` when CORS is disabled.
    pub cors_origins: Option<Vec<HeaderValue>>,
}

impl ProxyConfig {
    /// Validate every option and build the configuration.
    ///
    /// Fails with [`ProxyError::ConfigValidation`] listing every invalid
    /// option, so a misconfigured deployment is fixed in one pass.
    pub fn from_args(args: &ProxyArgs) -> Result<Self, ProxyError> {
        let mut errors = Vec::new();

        if let Err(message) = validation::validate_listen_address(&args.listen_address) {
            errors.push(ValidationError {
                field: "LISTEN_ADDRESS".into(),
                message,
                suggestion: Some("expected host:port, e.g. 0.0.0.0:8080".into()),
            });
        }

        let script_url = match validation::validate_script_url(&args.script_url) {
            Ok(template) => Some(template),
            Err(message) => {
                errors.push(ValidationError {
                    field: "PLAUSIBLE_SCRIPT_URL".into(),
                    message,
                    suggestion: Some(format!("default is {}", crate::cli::DEFAULT_SCRIPT_URL)),
                });
                None
            }
        };

        let api_url = match validation::validate_upstream_url(&args.api_url) {
            Ok(uri) => Some(uri),
            Err(message) => {
                errors.push(ValidationError {
                    field: "PLAUSIBLE_API_URL".into(),
                    message,
                    suggestion: Some(format!("default is {}", crate::cli::DEFAULT_API_URL)),
                });
                None
            }
        };

        let cors_origins = if args.cors_enabled {
            match validation::validate_cors_origins(&args.cors_origins) {
                Ok(origins) => Some(origins),
                Err(mut origin_errors) => {
                    errors.append(&mut origin_errors);
                    None
                }
            }
        } else {
            None
        };

        match (script_url, api_url) {
            (Some(script_url), Some(api_url)) if errors.is_empty() => Ok(Self {
                listen_address: args.listen_address.clone(),
                script_url,
                api_url,
                cors_origins,
            }),
            _ => Err(ProxyError::ConfigValidation { errors }),
        }
    }

    #[must_use]
    pub fn report(&self) -> ConfigReport {
        ConfigReport {
            listen_address: self.listen_address.clone(),
            script_url: self.script_url.as_template(),
            api_url: self.api_url.to_string(),
            cors_origins: self.cors_origins.as_ref().map(|origins| {
                origins
                    .iter()
                    .map(|o| String::from_utf8_lossy(o.as_bytes()).into_owned())
                    .collect()
            }),
        }
    }
}

/// Printable summary of a resolved configuration.
#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub listen_address: String,
    pub script_url: String,
    pub api_url: String,
    pub cors_origins: Option<Vec<String>>,
}
