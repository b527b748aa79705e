//! Response structures for Minute Empire API endpoints.
//!
//! The server owns the shape of every payload. These structures only name the
//! keys the client reads for display; every other key is kept in the
//! flattened `extra` map so callers still get the full payload.

use serde::{Deserialize, Deserializer, de::Error};
use serde_json::{Map, Value};
use std::{collections::BTreeMap, fmt};

/// Response from `POST /login`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    /// Token to send back in the authentication cookie.
    pub access_token: String,
    /// Name of the logged in user.
    #[serde(default)]
    pub username: Option<String>,
    /// Token type announced by the server, usually `bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // The token stays out of logs
        write!(
            f,
            "username={:?}, token_type={:?}",
            self.username, self.token_type
        )
    }
}

/// Response from `GET /me`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    /// Unique identifier of the user.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Family the user plays as.
    #[serde(default)]
    pub family_name: Option<String>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, username={:?}, family_name={:?}",
            self.id, self.username, self.family_name
        )
    }
}

/// Position of a village on the map.
///
/// Coordinates are read as numbers, integral or not.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stock of a resource in a village.
///
/// Missing keys default to zero.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ResourceStock {
    #[serde(default)]
    pub current: f64,
    #[serde(default)]
    pub capacity: f64,
    /// Production per hour.
    #[serde(default)]
    pub rate: f64,
}

/// A resource entry of a village.
///
/// The server either sends a detailed stock object or a bare value.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// `{current, capacity, rate}` object
    Stock(ResourceStock),
    /// Any other value
    Plain(Value),
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;

        // Only a JSON object is a stock, arrays stay plain values
        if !value.is_object() {
            return Ok(Resource::Plain(value));
        }

        match ResourceStock::deserialize(&value) {
            Ok(stock) => Ok(Resource::Stock(stock)),
            Err(_) => Ok(Resource::Plain(value)),
        }
    }
}

/// Reads an identifier sent either as a string or as a number.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}

/// A village from `GET /villages/me`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Village {
    /// Unique identifier of the village.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Display name of the village.
    pub name: String,
    #[serde(default)]
    pub location: Option<Location>,
    /// Resources keyed by resource name.
    #[serde(default)]
    pub resources: BTreeMap<String, Resource>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for Village {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "id={}, name={}, location={:?}, resources={:?}",
            self.id,
            self.name,
            self.location,
            self.resources.keys().collect::<Vec<_>>()
        )
    }
}

/// Response from `POST /villages/command`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CommandResult {
    /// Outcome message written by the server.
    pub message: String,
    #[serde(default)]
    pub success: Option<bool>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "success={:?}, message={}", self.success, self.message)
    }
}

/// Response from `GET /map/info`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MapInfo {
    /// Bounds of the map, as sent by the server.
    pub map_bounds: Value,
    /// Every village on the map.
    #[serde(default)]
    pub villages: Vec<Value>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for MapInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "map_bounds={}, villages={}",
            self.map_bounds,
            self.villages.len()
        )
    }
}

/// Response from `PUT /villages/{id}/rename`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RenameResult {
    #[serde(default)]
    pub message: Option<String>,
    /// Remaining keys of the payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl fmt::Display for RenameResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "message={:?}, extra={:?}", self.message, self.extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_keeps_extra_keys() {
        let json = r#"{"access_token": "tok", "token_type": "bearer", "username": "testapi", "expires_in": 3600}"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();

        assert_eq!(login.access_token, "tok");
        assert_eq!(login.username.as_deref(), Some("testapi"));
        assert_eq!(login.extra["expires_in"], 3600);
        assert!(!login.extra.contains_key("access_token"));
    }

    #[test]
    fn test_login_response_display_hides_token() {
        let json = r#"{"access_token": "secret-token", "username": "testapi"}"#;
        let login: LoginResponse = serde_json::from_str(json).unwrap();

        let display = format!("{}", login);
        assert!(display.contains("testapi"));
        assert!(!display.contains("secret-token"));
    }

    #[test]
    fn test_login_response_requires_token() {
        let json = r#"{"username": "testapi"}"#;
        assert!(serde_json::from_str::<LoginResponse>(json).is_err());
    }

    #[test]
    fn test_village_with_mixed_resources() {
        let json = r#"{
            "id": "v1",
            "name": "Capital",
            "location": {"x": 10, "y": -4},
            "resources": {
                "wood": {"current": 120, "capacity": 1000, "rate": 12.5},
                "food": {"current": 40},
                "gold": 7
            },
            "buildings": []
        }"#;

        let village: Village = serde_json::from_str(json).unwrap();

        assert_eq!(village.location, Some(Location { x: 10.0, y: -4.0 }));
        assert_eq!(
            village.resources["wood"],
            Resource::Stock(ResourceStock {
                current: 120.0,
                capacity: 1000.0,
                rate: 12.5,
            })
        );
        assert_eq!(
            village.resources["food"],
            Resource::Stock(ResourceStock {
                current: 40.0,
                ..Default::default()
            })
        );
        assert_eq!(village.resources["gold"], Resource::Plain(Value::from(7)));
        assert!(village.extra.contains_key("buildings"));
    }

    #[test]
    fn test_village_without_optional_keys() {
        let json = r#"{"id": "v2", "name": "Outpost"}"#;
        let village: Village = serde_json::from_str(json).unwrap();

        assert!(village.location.is_none());
        assert!(village.resources.is_empty());
    }

    #[test]
    fn test_map_info_display() {
        let json = r#"{"map_bounds": {"min_x": 0, "max_x": 100}, "villages": [{"id": "v1"}, {"id": "v2"}]}"#;
        let map_info: MapInfo = serde_json::from_str(json).unwrap();

        let display = format!("{}", map_info);
        assert!(display.contains("villages=2"));
        assert!(display.contains("max_x"));
    }

    #[test]
    fn test_location_display() {
        assert_eq!(format!("{}", Location { x: 3.0, y: 9.0 }), "(3, 9)");
        assert_eq!(format!("{}", Location { x: 10.5, y: 20.0 }), "(10.5, 20)");
    }

    #[test]
    fn test_numeric_ids_and_float_location() {
        let user: User = serde_json::from_str(r#"{"id": 42, "family_name": "Stark"}"#).unwrap();
        assert_eq!(user.id, "42");

        let json = r#"{"id": 7, "name": "Capital", "location": {"x": 10.5, "y": 20}}"#;
        let village: Village = serde_json::from_str(json).unwrap();
        assert_eq!(village.id, "7");
        assert_eq!(village.location, Some(Location { x: 10.5, y: 20.0 }));
    }

    #[test]
    fn test_id_must_be_string_or_number() {
        let json = r#"{"id": {"oid": "abc"}, "name": "Capital"}"#;
        assert!(serde_json::from_str::<Village>(json).is_err());
    }

    #[test]
    fn test_array_resource_stays_plain() {
        let resource: Resource = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(resource, Resource::Plain(serde_json::json!([1, 2, 3])));
    }

    #[test]
    fn test_object_resource_with_text_stays_plain() {
        let resource: Resource = serde_json::from_str(r#"{"current": "full"}"#).unwrap();
        assert_eq!(
            resource,
            Resource::Plain(serde_json::json!({"current": "full"}))
        );
    }
}
