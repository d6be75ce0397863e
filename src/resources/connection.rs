//! `/api/connection`: serial connection between OctoPrint and the printer.

use crate::client::OctoPrintClient;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use crate::resources::Command;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/connection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Current connection
    pub current: ConnectionState,
    /// Available ports, baudrates and profiles
    pub options: ConnectionOptions,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// The active connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionState {
    /// State text, e.g. `Operational` or `Closed`
    pub state: String,
    /// Serial port in use
    pub port: Option<String>,
    /// Baudrate in use
    pub baudrate: Option<u32>,
    /// Id of the active printer profile
    pub printer_profile: Option<String>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

impl ConnectionState {
    /// Whether a printer is connected.
    pub fn is_connected(&self) -> bool {
        let state = self.state.as_str();
        !(state == "Closed" || state.starts_with("Offline") || state.starts_with("Error"))
    }
}

/// A printer profile as listed in connection options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRef {
    /// Profile id
    pub id: String,
    /// Profile name
    pub name: String,
}

/// Available connection parameters and stored preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// Serial ports found
    #[serde(default, deserialize_with = "null_as_default")]
    pub ports: Vec<String>,
    /// Supported baudrates
    #[serde(default, deserialize_with = "null_as_default")]
    pub baudrates: Vec<u32>,
    /// Available printer profiles
    #[serde(default, deserialize_with = "null_as_default")]
    pub printer_profiles: Vec<ProfileRef>,
    /// Port selected by default
    pub port_preference: Option<String>,
    /// Baudrate selected by default
    pub baudrate_preference: Option<u32>,
    /// Profile selected by default
    pub printer_profile_preference: Option<String>,
    /// Whether the server connects on startup
    #[serde(default)]
    pub autoconnect: bool,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Parameters of the `connect` command. Unset fields use OctoPrint's
/// stored preferences.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    /// Serial port, `AUTO` to autodetect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    /// Baudrate, `0` to autodetect
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baudrate: Option<u32>,
    /// Printer profile id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub printer_profile: Option<String>,
    /// Store the parameters as new preferences
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
    /// Remember the settings and connect on startup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoconnect: Option<bool>,
}

impl ConnectRequest {
    /// Connect on `port` at `baudrate`.
    pub fn new(port: impl Into<String>, baudrate: u32) -> Self {
        Self {
            port: Some(port.into()),
            baudrate: Some(baudrate),
            ..Default::default()
        }
    }
}

/// Handle for the connection endpoint.
pub struct ConnectionApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> ConnectionApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Current connection state and available options.
    pub async fn get(&self) -> Result<ConnectionInfo> {
        self.client.get(paths::CONNECTION).await
    }

    /// Connect to the printer.
    pub async fn connect(&self, request: &ConnectRequest) -> Result<()> {
        self.client
            .post_command(paths::CONNECTION, &Command::with("connect", request))
            .await
    }

    /// Disconnect from the printer.
    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .post_command(paths::CONNECTION, &Command::bare("disconnect"))
            .await
    }

    /// Fake an acknowledgment (`ok`) from the printer.
    pub async fn fake_ack(&self) -> Result<()> {
        self.client
            .post_command(paths::CONNECTION, &Command::bare("fake_ack"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connect_request_body() {
        let mut request = ConnectRequest::new("/dev/ttyACM0", 115200);
        request.printer_profile = Some("_default".into());
        let body = serde_json::to_value(Command::with("connect", &request)).unwrap();
        assert_eq!(
            body,
            json!({
                "command": "connect",
                "port": "/dev/ttyACM0",
                "baudrate": 115200,
                "printerProfile": "_default"
            })
        );
    }

    #[test]
    fn test_is_connected() {
        let state: ConnectionState = crate::model::decode(json!({"state": "Closed"})).unwrap();
        assert!(!state.is_connected());
        let state: ConnectionState =
            crate::model::decode(json!({"state": "Printing", "port": "VIRTUAL"})).unwrap();
        assert!(state.is_connected());
    }
}
