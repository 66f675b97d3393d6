//! `beaconpost validate`: check the proxy options without starting.
//!
//! Runs the same resolution as `run` and reports the result in either
//! human-readable text or machine-readable JSON format.

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::ProxyConfig;
use crate::error::ProxyError;

pub fn execute(args: &ValidateArgs) -> Result<(), ProxyError> {
    let config = match ProxyConfig::from_args(&args.proxy) {
        Ok(config) => config,
        Err(ProxyError::ConfigValidation { errors }) => {
            match args.format {
                ValidateFormat::Text => {
                    eprintln!("\u{2717} configuration has {} errors\n", errors.len());
                    for error in &errors {
                        eprintln!("{error}");
                    }
                }
                ValidateFormat::Json => {
                    let json_errors: Vec<serde_json::Value> = errors
                        .iter()
                        .map(|e| {
                            serde_json::json!({
                                "field": e.field,
                                "message": e.message,
                                "suggestion": e.suggestion,
                            })
                        })
                        .collect();
                    println!(
                        "{}",
                        serde_json::json!({
                            "valid": false,
                            "errors": json_errors,
                        })
                    );
                }
            }
            return Err(ProxyError::ConfigValidation { errors });
        }
        Err(e) => return Err(e),
    };

    let report = config.report();
    match args.format {
        ValidateFormat::Text => {
            println!("\u{2713} configuration is valid");
            println!("  listen address: {}", report.listen_address);
            println!("  script url:     {}", report.script_url);
            println!("  api url:        {}", report.api_url);
            match &report.cors_origins {
                Some(origins) => println!("  cors origins:   {}", origins.join(", ")),
                None => println!("  cors:           disabled"),
            }
        }
        ValidateFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "valid": true,
                    "config": report,
                })
            );
        }
    }

    Ok(())
}
