//! Typed push messages.
//!
//! Every message OctoPrint pushes is an object with a single key naming its
//! kind (`connected`, `current`, `event`, ...) and the payload as value.

use crate::error::{OctoPrintError, Result};
use crate::model::{decode, null_as_default, Extra};
use crate::resources::job::{Job, Progress};
use crate::resources::printer::{PrinterStatus, TemperatureSample};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A message received on the push channel.
#[derive(Debug, Clone)]
pub enum PushMessage {
    /// Sent once after the session opened
    Connected(ConnectedInfo),
    /// Periodic state update
    Current(StateUpdate),
    /// Full state including temperature history, sent after connecting
    History(StateUpdate),
    /// A server event such as `PrintStarted`
    Event(PushEvent),
    /// Progress of a running slicing job
    SlicingProgress(SlicingProgress),
    /// Message sent by a plugin
    Plugin(PluginMessage),
    /// Timelapse configuration changed
    Timelapse(Value),
    /// The server asks the client to log in again
    ReauthRequired(ReauthRequired),
    /// Any message kind without a typed variant
    Other {
        /// Message key
        kind: String,
        /// Message payload
        payload: Value,
    },
}

impl PushMessage {
    /// Decode a message object. Keys are normalized to snake_case first.
    pub fn from_value(value: Value) -> Result<Self> {
        let (kind, payload) = Self::split(value)?;
        Self::from_parts(&kind, payload)
    }

    /// Split a message object into its key and payload.
    pub(crate) fn split(value: Value) -> Result<(String, Value)> {
        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(OctoPrintError::Push(format!(
                    "push message is not an object: {}",
                    other
                )));
            }
        };
        map.into_iter()
            .next()
            .ok_or_else(|| OctoPrintError::Push("empty push message".to_string()))
    }

    pub(crate) fn from_parts(kind: &str, payload: Value) -> Result<Self> {
        let message = match kind {
            "connected" => PushMessage::Connected(decode(payload)?),
            "current" => PushMessage::Current(decode(payload)?),
            "history" => PushMessage::History(decode(payload)?),
            "event" => PushMessage::Event(decode(payload)?),
            "slicingProgress" | "slicing_progress" => {
                PushMessage::SlicingProgress(decode(payload)?)
            }
            "plugin" => PushMessage::Plugin(decode(payload)?),
            "timelapse" => PushMessage::Timelapse(crate::model::normalize_keys(payload)),
            "reauthRequired" | "reauth_required" => PushMessage::ReauthRequired(decode(payload)?),
            _ => Self::untyped(kind, payload),
        };
        Ok(message)
    }

    /// Keep a message as [`PushMessage::Other`] with normalized kind and payload.
    pub(crate) fn untyped(kind: &str, payload: Value) -> Self {
        PushMessage::Other {
            kind: crate::model::to_snake_case(kind),
            payload: crate::model::normalize_keys(payload),
        }
    }

    /// The message key in snake_case.
    pub fn kind(&self) -> &str {
        match self {
            PushMessage::Connected(_) => "connected",
            PushMessage::Current(_) => "current",
            PushMessage::History(_) => "history",
            PushMessage::Event(_) => "event",
            PushMessage::SlicingProgress(_) => "slicing_progress",
            PushMessage::Plugin(_) => "plugin",
            PushMessage::Timelapse(_) => "timelapse",
            PushMessage::ReauthRequired(_) => "reauth_required",
            PushMessage::Other { kind, .. } => kind,
        }
    }
}

/// Payload of the `connected` message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConnectedInfo {
    /// UI API key of the server
    pub apikey: Option<String>,
    /// Server version
    pub version: Option<String>,
    /// Version string shown in the UI
    pub display_version: Option<String>,
    /// Git branch the server was installed from
    pub branch: Option<String>,
    /// Hash over the enabled plugins
    pub plugin_hash: Option<String>,
    /// Hash over the current settings
    pub config_hash: Option<String>,
    /// Whether the server runs in debug mode
    #[serde(default)]
    pub debug: bool,
    /// Safe mode flag or, on newer servers, the reason safe mode is active
    pub safe_mode: Option<SafeMode>,
    /// Whether the server has internet connectivity
    pub online: Option<bool>,
    /// Fields not covered above, e.g. `permissions`
    #[serde(flatten)]
    pub extra: Extra,
}

impl ConnectedInfo {
    /// Whether the server runs in safe mode.
    pub fn in_safe_mode(&self) -> bool {
        match &self.safe_mode {
            Some(SafeMode::Flag(flag)) => *flag,
            Some(SafeMode::Reason(reason)) => !reason.is_empty(),
            None => false,
        }
    }
}

/// Safe mode state of the `connected` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SafeMode {
    /// Plain on/off flag
    Flag(bool),
    /// Why safe mode is active (`settings`, `flag`, `incomplete_startup`)
    Reason(String),
}

/// Payload of `current` and `history` messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Printer state text and flags
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: PrinterStatus,
    /// Active job
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: Job,
    /// Progress of the active job
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: Progress,
    /// Current Z position
    pub current_z: Option<f64>,
    /// Temperature offsets per heater
    #[serde(default, deserialize_with = "null_as_default")]
    pub offsets: BTreeMap<String, f64>,
    /// Temperature samples since the last update
    #[serde(default, deserialize_with = "null_as_default")]
    pub temps: Vec<TemperatureSample>,
    /// Serial log lines
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<String>,
    /// Terminal messages
    #[serde(default, deserialize_with = "null_as_default")]
    pub messages: Vec<String>,
    /// Files currently in use
    #[serde(default, deserialize_with = "null_as_default")]
    pub busy_files: Vec<Value>,
    /// Server timestamp of the update
    pub server_time: Option<f64>,
    /// Remaining fields such as `resends`
    #[serde(flatten)]
    pub extra: Extra,
}

/// Payload of `event` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// Event name, e.g. `PrintDone`
    #[serde(rename = "type")]
    pub kind: String,
    /// Event specific payload, `null` for most events
    #[serde(default)]
    pub payload: Value,
}

/// Payload of `slicingProgress` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicingProgress {
    /// Slicer doing the work
    pub slicer: String,
    /// Location of the model being sliced
    pub source_location: Option<String>,
    /// Path of the model being sliced
    pub source_path: Option<String>,
    /// Location of the resulting machine code
    pub dest_location: Option<String>,
    /// Path of the resulting machine code
    pub dest_path: Option<String>,
    /// Percentage of completion
    #[serde(default)]
    pub progress: f64,
}

/// Payload of `plugin` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMessage {
    /// Plugin identifier
    pub plugin: String,
    /// Plugin defined payload
    #[serde(default)]
    pub data: Value,
}

/// Payload of `reauthRequired` messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReauthRequired {
    /// `logout`, `stale` or `removed`
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_connected() {
        let message = PushMessage::from_value(json!({
            "connected": {
                "apikey": "UIKEY",
                "version": "1.9.3",
                "display_version": "1.9.3",
                "branch": "master",
                "safe_mode": false,
                "online": true,
                "permissions": []
            }
        }))
        .unwrap();

        match message {
            PushMessage::Connected(info) => {
                assert_eq!(info.apikey.as_deref(), Some("UIKEY"));
                assert_eq!(info.display_version.as_deref(), Some("1.9.3"));
                assert_eq!(info.online, Some(true));
                assert!(info.extra.contains_key("permissions"));
                assert!(!info.in_safe_mode());
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_connected_safe_mode_reason() {
        let message = PushMessage::from_value(json!({
            "connected": {"version": "1.10.0", "safe_mode": "settings"}
        }))
        .unwrap();
        let PushMessage::Connected(info) = message else {
            panic!("expected connected");
        };
        assert_eq!(info.safe_mode, Some(SafeMode::Reason("settings".to_string())));
        assert!(info.in_safe_mode());
    }

    #[test]
    fn test_untyped_keeps_kind_and_payload() {
        let message = PushMessage::untyped("event", json!({"payloadOnly": true}));
        assert_eq!(message.kind(), "event");
        assert!(matches!(message, PushMessage::Other { payload, .. } if payload == json!({"payload_only": true})));
    }

    #[test]
    fn test_current_state() {
        let message = PushMessage::from_value(json!({
            "current": {
                "state": {"text": "Printing", "flags": {"printing": true, "operational": true}},
                "job": {"file": {"name": "cube.gcode", "origin": "local"}, "estimatedPrintTime": 600},
                "progress": {"completion": 12.5, "printTimeLeft": 500},
                "currentZ": 0.4,
                "offsets": {},
                "temps": [{"time": 1700000000, "tool0": {"actual": 209.8, "target": 210.0}}],
                "logs": ["Recv: ok"],
                "messages": [],
                "serverTime": 1700000000.5
            }
        }))
        .unwrap();

        assert_eq!(message.kind(), "current");
        let PushMessage::Current(update) = message else {
            panic!("expected current");
        };
        assert_eq!(update.state.text, "Printing");
        assert_eq!(update.job.file.name.as_deref(), Some("cube.gcode"));
        assert_eq!(update.progress.completion, Some(12.5));
        assert_eq!(update.current_z, Some(0.4));
        assert_eq!(update.temps[0].heaters["tool0"].actual, Some(209.8));
        assert_eq!(update.logs, vec!["Recv: ok".to_string()]);
    }

    #[test]
    fn test_event_and_plugin() {
        let event = PushMessage::from_value(json!({
            "event": {"type": "PrintDone", "payload": {"name": "cube.gcode", "time": 612.3}}
        }))
        .unwrap();
        match event {
            PushMessage::Event(e) => {
                assert_eq!(e.kind, "PrintDone");
                assert_eq!(e.payload["time"], json!(612.3));
            }
            other => panic!("unexpected message {:?}", other),
        }

        let plugin = PushMessage::from_value(json!({
            "plugin": {"plugin": "softwareupdate", "data": {"type": "updating"}}
        }))
        .unwrap();
        assert!(matches!(plugin, PushMessage::Plugin(p) if p.plugin == "softwareupdate"));
    }

    #[test]
    fn test_camel_case_kinds() {
        let progress = PushMessage::from_value(json!({
            "slicingProgress": {"slicer": "curalegacy", "sourcePath": "cube.stl", "progress": 42.0}
        }))
        .unwrap();
        assert!(matches!(&progress, PushMessage::SlicingProgress(p) if p.progress == 42.0));
        assert_eq!(progress.kind(), "slicing_progress");

        let reauth = PushMessage::from_value(json!({"reauthRequired": {"reason": "stale"}})).unwrap();
        assert!(matches!(reauth, PushMessage::ReauthRequired(r) if r.reason == "stale"));
    }

    #[test]
    fn test_unknown_kind_kept() {
        let message = PushMessage::from_value(json!({"flightCheck": {"someValue": 1}})).unwrap();
        match message {
            PushMessage::Other { kind, payload } => {
                assert_eq!(kind, "flight_check");
                assert_eq!(payload, json!({"some_value": 1}));
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_invalid_messages() {
        assert!(PushMessage::from_value(json!("text")).is_err());
        assert!(PushMessage::from_value(json!({})).is_err());
        assert!(PushMessage::from_value(json!({"event": {"payload": {}}})).is_err());
    }
}
