//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`run`], [`validate`], or [`health`]. Each
//! handler lives in its own submodule.

pub mod health;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::ProxyError;

pub async fn dispatch(cli: Cli) -> Result<(), ProxyError> {
    match cli.command {
        Some(Commands::Run(args)) => run::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args),
        Some(Commands::Health(args)) => health::execute(args).await,
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  beaconpost v{version} \u{2014} first-party proxy for Plausible analytics\n\n  \
         No command provided. To get started:\n\n    \
         beaconpost run --cors-origins https://example.com    Start on localhost:8080\n    \
         beaconpost validate                                 Check options without starting\n    \
         beaconpost health http://localhost:8080             Check a running instance\n    \
         beaconpost --help                                   See all commands and options\n"
    );
}
