//! Configuration file structures for the Minute Empire client.
//!
//! This module defines the configuration file format using YAML. The configuration
//! is split into three sections: server settings, account credentials and
//! walkthrough settings.
//!
//! # Configuration File Format
//!
//! ```yaml
//! # Minute Empire server
//! server:
//!   url: "http://localhost:8000"
//!
//! # Account used to log in
//! account:
//!   username: "testapi"
//!   password: "testapi123"
//!
//! # Optional walkthrough settings
//! walkthrough:
//!   commands:
//!     - "create wood field in 3"
//!     - "train 10 militia"
//!   rename_to: "New Capital"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Any value can be overridden with a `MINUTE_EMPIRE_` prefixed variable, sections
//! being separated by `__`:
//!
//! ```bash
//! export MINUTE_EMPIRE_SERVER__URL="http://empire.example.com"
//! export MINUTE_EMPIRE_ACCOUNT__PASSWORD="secret-from-env"
//! ```

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use log::debug;
use serde::Deserialize;

/// Prefix of the environment variables overriding the configuration file.
const ENV_PREFIX: &str = "MINUTE_EMPIRE_";

/// Server used when the configuration does not set one.
const DEFAULT_URL: &str = "http://localhost:8000";

/// Root configuration structure.
#[derive(Deserialize, Debug)]
pub struct Config {
    /// Minute Empire server configuration
    #[serde(default)]
    pub server: Server,
    /// Account credentials
    pub account: Account,
    /// Walkthrough configuration
    #[serde(default)]
    pub walkthrough: Walkthrough,
}

/// Minute Empire server configuration.
///
/// # YAML Section
///
/// ```yaml
/// server:
///   url: "http://localhost:8000"
/// ```
#[derive(Deserialize, Debug)]
pub struct Server {
    /// Base URL of the Minute Empire server.
    ///
    /// Should include the protocol (http/https). A trailing slash is ignored.
    #[serde(default = "default_url")]
    pub url: String,
}

impl Default for Server {
    fn default() -> Self {
        Server { url: default_url() }
    }
}

/// Account used to log in.
///
/// # YAML Section
///
/// ```yaml
/// account:
///   username: "testapi"
///   password: "testapi123"
/// ```
#[derive(Deserialize, Debug, Clone)]
pub struct Account {
    pub username: String,
    /// Prefer the `MINUTE_EMPIRE_ACCOUNT__PASSWORD` variable over the file.
    pub password: String,
}

/// Walkthrough settings.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Walkthrough {
    /// Commands executed on every owned village, in order.
    #[serde(default = "default_commands")]
    pub commands: Vec<String>,
    /// New name given to the first owned village. No rename when absent.
    #[serde(default)]
    pub rename_to: Option<String>,
}

impl Default for Walkthrough {
    fn default() -> Self {
        Walkthrough {
            commands: default_commands(),
            rename_to: None,
        }
    }
}

fn default_url() -> String {
    DEFAULT_URL.to_owned()
}

fn default_commands() -> Vec<String> {
    [
        "create wood field in 3",
        "upgrade building in 1",
        "train 10 militia",
        "create barraks building in 2",
        "move troop_123 to 10,20",
        "set stance for troop_123 to defensive",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Config {
    /// Loads the configuration from a YAML file, then applies the
    /// `MINUTE_EMPIRE_` environment variables on top of it.
    ///
    /// # Errors
    ///
    /// Fails if the file does not exist, is not valid YAML, or if a required
    /// value (the account credentials) is missing.
    pub fn load(path: &str) -> Result<Config, anyhow::Error> {
        if !Path::new(path).exists() {
            return Err(anyhow::anyhow!("config file {} does not exist", path));
        }

        debug!("load config from {}", path);
        let config: Config = Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(anyhow::Error::new)?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> String {
        let path = dir.path().join("config.yaml");
        fs::write(&path, content).unwrap();
        path.to_str().unwrap().to_owned()
    }

    #[test]
    #[serial]
    fn test_load_full_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
server:
  url: "http://empire.example.com"
account:
  username: "testapi"
  password: "testapi123"
walkthrough:
  commands:
    - "train 10 militia"
  rename_to: "New Capital"
"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.server.url, "http://empire.example.com");
        assert_eq!(config.account.username, "testapi");
        assert_eq!(config.account.password, "testapi123");
        assert_eq!(config.walkthrough.commands, vec!["train 10 militia"]);
        assert_eq!(
            config.walkthrough.rename_to.as_deref(),
            Some("New Capital")
        );
    }

    #[test]
    #[serial]
    fn test_load_applies_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
account:
  username: "testapi"
  password: "testapi123"
"#,
        );

        let config = Config::load(&path).unwrap();

        assert_eq!(config.server.url, "http://localhost:8000");
        assert_eq!(config.walkthrough, Walkthrough::default());
        assert_eq!(config.walkthrough.commands.len(), 6);
        assert!(config.walkthrough.rename_to.is_none());
    }

    #[test]
    #[serial]
    fn test_load_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
account:
  username: "testapi"
  password: "from-file"
"#,
        );

        // SAFETY: tests touching the environment are serialized
        unsafe {
            std::env::set_var("MINUTE_EMPIRE_ACCOUNT__PASSWORD", "from-env");
        }
        let config = Config::load(&path);
        unsafe {
            std::env::remove_var("MINUTE_EMPIRE_ACCOUNT__PASSWORD");
        }

        let config = config.unwrap();
        assert_eq!(config.account.username, "testapi");
        assert_eq!(config.account.password, "from-env");
    }

    #[test]
    #[serial]
    fn test_load_missing_account_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
server:
  url: "http://localhost:8000"
"#,
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    #[serial]
    fn test_load_nonexistent_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.yaml");

        let err = Config::load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
