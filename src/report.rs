//! Text formatters for the walkthrough output.
//!
//! Every function turns a server payload into the lines printed on the
//! terminal. They never fail: missing display keys are replaced by a
//! placeholder.

use crate::api::{CommandResult, LoginResponse, MapInfo, RenameResult, Resource, User, Village};

/// Placeholder for a key the server did not send.
const UNKNOWN: &str = "<unknown>";

/// Formats the login confirmation, e.g. `Logged in successfully as testapi`.
pub fn format_login(login: &LoginResponse) -> String {
    format!(
        "Logged in successfully as {}",
        login.username.as_deref().unwrap_or(UNKNOWN)
    )
}

/// Formats the current user as two lines: id and family name.
pub fn format_user(user: &User) -> Vec<String> {
    vec![
        format!("User ID: {}", user.id),
        format!(
            "Family Name: {}",
            user.family_name.as_deref().unwrap_or(UNKNOWN)
        ),
    ]
}

/// Formats a village: name, location and one line per resource.
///
/// Resources are listed in alphabetical order. A detailed resource is shown
/// as `current/capacity (Rate: rate/h)`, any other value as is.
pub fn format_village(village: &Village) -> Vec<String> {
    let location = village
        .location
        .map(|l| l.to_string())
        .unwrap_or_else(|| UNKNOWN.to_owned());

    let mut lines = vec![
        format!("Village: {}", village.name),
        format!("Location: {}", location),
        "Resources:".to_owned(),
    ];

    lines.extend(
        village
            .resources
            .iter()
            .map(|(name, resource)| format_resource(name, resource)),
    );

    lines
}

/// Formats a single resource line.
pub fn format_resource(name: &str, resource: &Resource) -> String {
    match resource {
        Resource::Stock(stock) => format!(
            "  {}: {}/{} (Rate: {}/h)",
            name, stock.current, stock.capacity, stock.rate
        ),
        Resource::Plain(value) => format!("  {}: {}", name, value),
    }
}

/// Formats the outcome of a command.
pub fn format_command_result(command: &str, result: &CommandResult) -> String {
    format!("Command '{}' result: {}", command, result.message)
}

/// Formats the map bounds and the number of villages on the map.
pub fn format_map_info(map_info: &MapInfo) -> Vec<String> {
    vec![
        format!("Map bounds: {}", map_info.map_bounds),
        format!("Total villages on map: {}", map_info.villages.len()),
    ]
}

/// Formats the outcome of a village rename.
pub fn format_rename(village: &Village, new_name: &str, result: &RenameResult) -> String {
    match &result.message {
        Some(message) => format!(
            "Rename '{}' to '{}' result: {}",
            village.name, new_name, message
        ),
        None => format!("Renamed '{}' to '{}'", village.name, new_name),
    }
}
