//! `/api/settings`
//!
//! OctoPrint's settings tree is large and plugin-extensible. The sections
//! most clients care about are typed; everything else is kept in `extra`
//! (and `plugins`) with normalized keys.
//!
//! Updates are sent as-is, so they must use OctoPrint's camelCase keys:
//!
//! ```ignore
//! use serde_json::json;
//!
//! let settings = client
//!     .settings()
//!     .update(&json!({"appearance": {"name": "Workshop"}}))
//!     .await?;
//! assert_eq!(settings.appearance.name.as_deref(), Some("Workshop"));
//! ```

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `GET /api/settings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// API settings
    #[serde(default)]
    pub api: ApiSettings,
    /// UI appearance
    #[serde(default)]
    pub appearance: AppearanceSettings,
    /// Folder locations
    #[serde(default)]
    pub folder: FolderSettings,
    /// Serial connection defaults
    #[serde(default)]
    pub serial: SerialSettings,
    /// Temperature presets
    #[serde(default)]
    pub temperature: TemperatureSettings,
    /// Webcam and timelapse settings
    #[serde(default)]
    pub webcam: WebcamSettings,
    /// Feature toggles
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature: Extra,
    /// Server commands and flags
    #[serde(default, deserialize_with = "null_as_default")]
    pub server: Extra,
    /// Plugin settings keyed by plugin identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub plugins: Extra,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// `api` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Global API key, only visible to admins
    pub key: Option<String>,
    /// Whether CORS is enabled
    #[serde(default)]
    pub allow_cross_origin: bool,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// `appearance` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppearanceSettings {
    /// Instance name shown in the UI
    pub name: Option<String>,
    /// Navbar color
    pub color: Option<String>,
    /// Whether the navbar color is transparent
    #[serde(default)]
    pub color_transparent: bool,
    /// UI language
    pub default_language: Option<String>,
    /// Whether temperatures show Fahrenheit too
    #[serde(default)]
    pub show_fahrenheit_also: bool,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// `folder` section: server-side storage paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolderSettings {
    /// Upload folder
    pub uploads: Option<String>,
    /// Rendered timelapse folder
    pub timelapse: Option<String>,
    /// Folder scanned for new files
    pub watched: Option<String>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// `serial` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Default port
    pub port: Option<String>,
    /// Default baudrate
    pub baudrate: Option<u32>,
    /// Ports found
    #[serde(default, deserialize_with = "null_as_default")]
    pub port_options: Vec<String>,
    /// Baudrates offered
    #[serde(default, deserialize_with = "null_as_default")]
    pub baudrate_options: Vec<u32>,
    /// Whether to connect on startup
    #[serde(default)]
    pub autoconnect: bool,
    /// Whether serial logging is on
    #[serde(default)]
    pub log: bool,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// `temperature` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureSettings {
    /// Preheat profiles
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: Vec<TemperatureProfile>,
    /// Minutes of history shown in the graph
    pub cutoff: Option<u32>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// A preheat preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemperatureProfile {
    /// Profile name
    pub name: String,
    /// Extruder temperature
    pub extruder: f64,
    /// Bed temperature
    pub bed: f64,
    /// Chamber temperature
    pub chamber: Option<f64>,
}

/// `webcam` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebcamSettings {
    /// Whether the webcam is enabled
    #[serde(default)]
    pub webcam_enabled: bool,
    /// MJPEG stream URL
    pub stream_url: Option<String>,
    /// Snapshot URL
    pub snapshot_url: Option<String>,
    /// ffmpeg used for rendering
    pub ffmpeg_path: Option<String>,
    /// Flip horizontally
    #[serde(default)]
    pub flip_h: bool,
    /// Flip vertically
    #[serde(default)]
    pub flip_v: bool,
    /// Rotate 90° counter clockwise
    #[serde(default)]
    pub rotate90: bool,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Deserialize)]
struct ApiKey {
    apikey: String,
}

/// Handle for the settings endpoints.
pub struct SettingsApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> SettingsApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Current settings.
    pub async fn get(&self) -> Result<Settings> {
        self.client.get(paths::SETTINGS).await
    }

    /// Merge `changes` into the settings and return the result.
    pub async fn update(&self, changes: &Value) -> Result<Settings> {
        self.client.post(paths::SETTINGS, changes).await
    }

    /// Generate a new global API key and return it.
    pub async fn regenerate_api_key(&self) -> Result<String> {
        let key: ApiKey = self
            .client
            .post(&join_path(&[paths::SETTINGS, "apikey"]), &serde_json::json!({}))
            .await?;
        Ok(key.apikey)
    }

    /// UI template configuration (keys normalized).
    pub async fn templates(&self) -> Result<Value> {
        self.client.get(&join_path(&[paths::SETTINGS, "templates"])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn test_decode_settings() {
        let settings: Settings = decode(json!({
            "api": {"key": "ABC", "allowCrossOrigin": false},
            "appearance": {"name": "Prusa", "color": "orange", "colorTransparent": false, "showFahrenheitAlso": true},
            "serial": {"port": "AUTO", "baudrate": 0, "portOptions": ["/dev/ttyACM0"], "baudrateOptions": [115200, 250000], "autoconnect": true},
            "temperature": {"profiles": [{"name": "PLA", "extruder": 210, "bed": 60}], "cutoff": 30},
            "webcam": {"webcamEnabled": true, "streamUrl": "/webcam/?action=stream", "snapshotUrl": "http://127.0.0.1:8080/?action=snapshot"},
            "plugins": {"softwareupdate": {"checks": {}}},
            "gcodeAnalysis": {"runAt": "idle"}
        }))
        .unwrap();

        assert_eq!(settings.api.key.as_deref(), Some("ABC"));
        assert_eq!(settings.appearance.name.as_deref(), Some("Prusa"));
        assert!(settings.appearance.show_fahrenheit_also);
        assert_eq!(settings.serial.baudrate_options, vec![115200, 250000]);
        assert_eq!(settings.temperature.profiles[0].extruder, 210.0);
        assert!(settings.webcam.webcam_enabled);
        assert!(settings.plugins.contains_key("softwareupdate"));
        assert_eq!(settings.extra["gcode_analysis"]["run_at"], "idle");
        assert!(settings.folder.uploads.is_none());
    }
}
