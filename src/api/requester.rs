//! HTTP client for the Minute Empire server API.
//!
//! This module provides the [`EmpireRequester`] struct performing one HTTP
//! request per API call, and the [`Requester`] trait it implements.

use log::{debug, info, warn};
use mockall::automock;
use reqwest::{Client, RequestBuilder, Response, header::COOKIE};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::api::{
    RequestError, TOKEN_COOKIE,
    response_structs::{CommandResult, LoginResponse, MapInfo, RenameResult, User, Village},
};

/// HTTP client for the Minute Empire server.
///
/// Holds the session: the base url, the HTTP client reused by every call and
/// the token returned by [`Requester::login`].
///
/// # Examples
///
/// ```no_run
/// let mut requester = EmpireRequester::new("http://localhost:8000");
/// requester.login("testapi", "testapi123").await.unwrap();
/// let user = requester.get_current_user().await.unwrap();
/// println!("User: {}", user);
/// ```
pub struct EmpireRequester {
    /// Minute Empire server url, without trailing slash
    url: String,
    /// HTTP client
    client: Client,
    /// Authentication token, set by a successful login
    token: Option<String>,
}

/// Trait for making requests to the Minute Empire server.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
/// Every method performs exactly one request.
#[automock]
pub trait Requester {
    /// Logs in and keeps the returned token for the next calls.
    async fn login(&mut self, username: &str, password: &str)
    -> Result<LoginResponse, RequestError>;
    /// Fetches the logged in user.
    async fn get_current_user(&self) -> Result<User, RequestError>;
    /// Fetches the villages owned by the logged in user.
    async fn get_my_villages(&self) -> Result<Vec<Village>, RequestError>;
    /// Sends a free-text command to a village.
    async fn execute_command(
        &self,
        village_id: &str,
        command: &str,
    ) -> Result<CommandResult, RequestError>;
    /// Fetches the map bounds and every village on the map.
    async fn get_map_info(&self) -> Result<MapInfo, RequestError>;
    /// Renames a village.
    async fn rename_village(
        &self,
        village_id: &str,
        new_name: &str,
    ) -> Result<RenameResult, RequestError>;
}

impl EmpireRequester {
    /// Create a new [EmpireRequester] without token.
    ///
    /// # Arguments
    ///
    /// * `url` - The base URL of the Minute Empire server. A trailing slash is removed.
    pub fn new(url: &str) -> Self {
        let client = reqwest::Client::new();
        EmpireRequester {
            url: url.trim_end_matches('/').to_string(),
            client,
            token: None,
        }
    }

    /// Attaches the token cookie to an authenticated request.
    ///
    /// The token is sent unquoted, [`Requester::login`] only stores tokens made
    /// of cookie value characters. Without token the request is sent as is and
    /// the server decides.
    fn authenticated(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header(COOKIE, format!("{}={}", TOKEN_COOKIE, token)),
            None => {
                warn!("no token available, login before calling authenticated endpoints");
                builder
            }
        }
    }

    /// Decodes a response body, failing on a non-2xx status.
    ///
    /// On an error status the JSON body, if any, is attached to the error
    /// and nothing of the payload is decoded.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
        let status = response.status();
        let failure = response.error_for_status_ref().err();
        if let Some(err) = failure {
            let details = response.json::<Value>().await.ok();
            debug!("error response {} -> {:?}", err, details);
            return Err(RequestError::new(&err.to_string())
                .with_status(status)
                .with_details(details));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Checks that a token only holds RFC 6265 `cookie-octet` characters:
/// visible ASCII except `"`, `,`, `;` and `\`.
fn is_cookie_value(token: &str) -> bool {
    !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_graphic() && !matches!(b, b'"' | b',' | b';' | b'\\'))
}

impl Requester for EmpireRequester {
    /// Request `POST /login` with `{username, password}`.
    ///
    /// This api call returns a json object holding the token:
    /// ```
    /// { access_token: "token", token_type: "bearer", username: "testapi" }
    /// ```
    /// On success the token is stored and sent as the `minute_empire_token`
    /// cookie by every following call. On failure the previous token is kept.
    async fn login(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse, RequestError> {
        let url = format!("{}/login", &self.url);
        info!("login as {}", username);
        debug!("request {}", &url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let login_response: LoginResponse = Self::decode(response).await?;

        debug!("response from {} -> {}", &url, &login_response);
        if !is_cookie_value(&login_response.access_token) {
            return Err(RequestError::new(
                "login returned a token that cannot be sent as a cookie value",
            ));
        }
        self.token = Some(login_response.access_token.to_owned());

        Ok(login_response)
    }

    /// Request `GET /me` to get the logged in user.
    async fn get_current_user(&self) -> Result<User, RequestError> {
        let url = format!("{}/me", &self.url);
        info!("request current user");
        debug!("request {}", &url);

        let response = self.authenticated(self.client.get(&url)).send().await?;
        let user: User = Self::decode(response).await?;

        debug!("response from {} -> {}", &url, &user);

        Ok(user)
    }

    /// Request `GET /villages/me` to get the villages of the logged in user.
    ///
    /// This api call returns a json array of villages:
    /// ```
    /// [
    ///   { id: "v1", name: "Capital", location: { x: 10, y: 20 }, resources: { wood: { current: 100, capacity: 1000, rate: 10 } } }
    /// ]
    /// ```
    async fn get_my_villages(&self) -> Result<Vec<Village>, RequestError> {
        let url = format!("{}/villages/me", &self.url);
        info!("request villages");
        debug!("request {}", &url);

        let response = self.authenticated(self.client.get(&url)).send().await?;
        let villages: Vec<Village> = Self::decode(response).await?;

        debug!("response from {} -> {:?}", &url, &villages);

        Ok(villages)
    }

    /// Request `POST /villages/command` with `{village_id, command}`.
    ///
    /// The command is sent verbatim, the server alone interprets it.
    ///
    /// # Arguments
    ///
    /// * `village_id` - The village the command applies to.
    /// * `command` - Free-text command, e.g. `train 10 militia`.
    async fn execute_command(
        &self,
        village_id: &str,
        command: &str,
    ) -> Result<CommandResult, RequestError> {
        let url = format!("{}/villages/command", &self.url);
        info!("execute command '{}' on village {}", command, village_id);
        debug!("request {}", &url);

        let response = self
            .authenticated(self.client.post(&url))
            .json(&json!({ "village_id": village_id, "command": command }))
            .send()
            .await?;
        let command_result: CommandResult = Self::decode(response).await?;

        debug!("response from {} -> {}", &url, &command_result);

        Ok(command_result)
    }

    /// Request `GET /map/info` to get the map bounds and all villages.
    async fn get_map_info(&self) -> Result<MapInfo, RequestError> {
        let url = format!("{}/map/info", &self.url);
        info!("request map info");
        debug!("request {}", &url);

        let response = self.authenticated(self.client.get(&url)).send().await?;
        let map_info: MapInfo = Self::decode(response).await?;

        debug!("response from {} -> {}", &url, &map_info);

        Ok(map_info)
    }

    /// Request `PUT /villages/{id}/rename` with `{name}`.
    async fn rename_village(
        &self,
        village_id: &str,
        new_name: &str,
    ) -> Result<RenameResult, RequestError> {
        let url = format!("{}/villages/{}/rename", &self.url, village_id);
        info!("rename village {} to {}", village_id, new_name);
        debug!("request {}", &url);

        let response = self
            .authenticated(self.client.put(&url))
            .json(&json!({ "name": new_name }))
            .send()
            .await?;
        let rename_result: RenameResult = Self::decode(response).await?;

        debug!("response from {} -> {}", &url, &rename_result);

        Ok(rename_result)
    }
}
