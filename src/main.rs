//! widget_bundler - build orchestrator for pluggable widgets.
//!
//! Cleans, generates typings, checks dependencies, bundles with webpack,
//! packages the `.mpk` archive and deploys it into a test project.

use std::process;
use widget_bundler::cli;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
