//! Minute Empire client - walks through the Minute Empire game server API.
//!
//! This is the entry point of a small client that logs in to a Minute Empire
//! server, prints the user and their villages, runs text commands against each
//! village, prints the map information and optionally renames a village.
//!
//! # Configuration
//!
//! Create a `config.yaml` file with your settings:
//!
//! ```yaml
//! server:
//!   url: "http://localhost:8000"
//!
//! account:
//!   username: "testapi"
//!   password: "testapi123"
//!
//! walkthrough:
//!   commands:
//!     - "create wood field in 3"
//!     - "train 10 militia"
//!   rename_to: "New Capital"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Override any configuration value using environment variables with the `MINUTE_EMPIRE_` prefix:
//!
//! ```bash
//! export MINUTE_EMPIRE_SERVER__URL="http://localhost:8000"
//! export MINUTE_EMPIRE_ACCOUNT__PASSWORD="testapi123"
//! ```
//!
//! # Usage
//!
//! ```bash
//! minute-empire-client --config config.yaml
//! minute-empire-client --config config.yaml --url http://empire.example.com
//! ```
//!
//! # Architecture
//!
//! - [`api`] - HTTP client for the game server, one method per endpoint
//! - [`config`] - YAML configuration loading with environment variable support
//! - [`report`] - Formatting of the server payloads for the terminal
//! - [`walkthrough`] - Sequential driver calling every endpoint
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use crate::{api::EmpireRequester, config::Config, walkthrough::Walkthrough};

mod api;
mod config;
mod report;
mod walkthrough;

/// Command-line arguments of the Minute Empire client.
///
/// # Examples
///
/// ```bash
/// minute-empire-client --config config.yaml
/// ```
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    ///
    /// See the [`config`] module for the expected format.
    #[arg(short, long)]
    config: String,

    /// Base URL of the Minute Empire server.
    ///
    /// Takes precedence over `server.url` of the configuration file.
    #[arg(short, long)]
    url: Option<String>,
}

/// Main entry point.
///
/// 1. **Logging Setup**: `info` level by default, overridable with `RUST_LOG`
/// 2. **Argument Parsing**: Parses command-line arguments using `clap`
/// 3. **Configuration Loading**: Reads the YAML file and the `MINUTE_EMPIRE_` variables
/// 4. **Walkthrough**: Calls every endpoint in order and prints the results
///
/// # Error Handling
///
/// Configuration and request errors are logged, along with the error body sent
/// by the server if any, and the process exits with a failure status.
#[tokio::main]
async fn main() -> ExitCode {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting minute-empire-client {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config: Config = match Config::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load config file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(url) = args.url {
        config.server.url = url;
    }

    let requester = EmpireRequester::new(&config.server.url);
    let mut walkthrough = Walkthrough::new(requester, config.account, config.walkthrough);

    match walkthrough.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.status() {
                Some(status) => error!("Error occurred ({}): {}", status, e),
                None => error!("Error occurred: {}", e),
            }
            if let Some(details) = e.details() {
                error!("Error details: {}", details);
            }
            ExitCode::FAILURE
        }
    }
}
