//! Storefront CLI

use std::process;

use crate::cli::{Cli, errors::report, logging::init_subscriber};

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = Cli::load().unwrap_or_else(|error| error.exit());

    if let Err(error) = init_subscriber(&cli.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        #[expect(
            clippy::print_stderr,
            reason = "command failures are reported to the user on stderr"
        )]
        {
            eprintln!("Error: {}", report(&error));
        }

        process::exit(1);
    }
}
