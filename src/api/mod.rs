//! Minute Empire game server API client.
//!
//! This module wraps the HTTP API exposed by a Minute Empire server: login,
//! current user lookup, village listing, command execution, map info and
//! village rename.
//!
//! # Modules
//!
//! - `requester` - HTTP client performing one request per API call
//! - `response_structs` - Structures for the JSON payloads returned by the server
//!
//! # Examples
//!
//! ```no_run
//! use minute_empire_client::api::{EmpireRequester, Requester};
//!
//! # async fn example() -> Result<(), minute_empire_client::api::RequestError> {
//! let mut requester = EmpireRequester::new("http://localhost:8000");
//! requester.login("testapi", "testapi123").await?;
//! let villages = requester.get_my_villages().await?;
//! # Ok(())
//! # }
//! ```

mod requester;
mod response_structs;

pub use crate::api::requester::{EmpireRequester, Requester};
#[cfg(test)]
pub use crate::api::requester::MockRequester;
pub use crate::api::response_structs::{
    CommandResult, LoginResponse, MapInfo, RenameResult, Resource, User, Village,
};
#[cfg(test)]
pub use crate::api::response_structs::{Location, ResourceStock};

use reqwest::StatusCode;
use serde_json::Value;
use std::fmt;

/// Name of the cookie carrying the authentication token.
pub const TOKEN_COOKIE: &str = "minute_empire_token";

/// Error returned by every API call.
///
/// The server and the transport failures are all surfaced through this single
/// kind: a network failure, a non-2xx status or an undecodable body. When the
/// server answered with a JSON error body, it is kept in `details`.
#[derive(Debug)]
pub struct RequestError {
    /// Human readable description of the failure.
    message: String,
    /// HTTP status of the response, if one was received.
    status: Option<StatusCode>,
    /// JSON body sent by the server along with an error status.
    details: Option<Value>,
}

impl RequestError {
    /// Create a new [RequestError] without status nor details.
    pub fn new(message: &str) -> Self {
        RequestError {
            message: message.to_owned(),
            status: None,
            details: None,
        }
    }

    /// Attach the status code of the failed response.
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    /// Attach the JSON error body returned by the server.
    pub fn with_details(mut self, details: Option<Value>) -> Self {
        self.details = details;
        self
    }

    /// HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// JSON error body returned by the server, if any.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        RequestError {
            message: err.to_string(),
            status: err.status(),
            details: None,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RequestError {}
