//! `/api/printer`: printer state, temperatures and motion.
//!
//! Most operations answer `409 Conflict` while the printer is not
//! operational; that surfaces as [`OctoPrintError::Conflict`](crate::OctoPrintError::Conflict).

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use crate::resources::Command;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of `GET /api/printer`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterState {
    /// Temperatures, absent when excluded
    #[serde(default)]
    pub temperature: TemperatureState,
    /// SD card state, absent when excluded
    pub sd: Option<SdState>,
    /// State text and flags, absent when excluded
    pub state: Option<PrinterStatus>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Temperatures keyed by heater (`tool0`, `bed`, `chamber`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureState {
    /// Recent readings, only present when history was requested
    #[serde(default, deserialize_with = "null_as_default")]
    pub history: Vec<TemperatureSample>,
    /// Readings keyed by heater (`tool0`, `bed`, ...)
    #[serde(flatten)]
    pub heaters: BTreeMap<String, HeaterTemperature>,
}

impl TemperatureState {
    /// Reading of a single heater.
    pub fn heater(&self, name: &str) -> Option<&HeaterTemperature> {
        self.heaters.get(name)
    }

    /// All tool heaters in tool order.
    pub fn tools(&self) -> impl Iterator<Item = (&String, &HeaterTemperature)> {
        self.heaters.iter().filter(|(k, _)| k.starts_with("tool"))
    }

    /// The bed heater.
    pub fn bed(&self) -> Option<&HeaterTemperature> {
        self.heater("bed")
    }
}

/// One heater's temperatures in °C.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HeaterTemperature {
    /// Measured temperature
    pub actual: Option<f64>,
    /// Target temperature, `None` when off
    pub target: Option<f64>,
    /// Configured offset
    pub offset: Option<f64>,
}

/// A historic temperature reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureSample {
    /// Unix timestamp
    pub time: i64,
    /// Readings keyed by heater
    #[serde(flatten)]
    pub heaters: BTreeMap<String, HeaterTemperature>,
}

/// SD card state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SdState {
    /// Whether the card is initialized
    #[serde(default)]
    pub ready: bool,
}

/// Printer state text and flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrinterStatus {
    /// Human readable state, e.g. `Operational`
    #[serde(default)]
    pub text: String,
    /// State flags
    #[serde(default)]
    pub flags: PrinterFlags,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Boolean state flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterFlags {
    /// Connected and able to take commands
    pub operational: bool,
    /// Printing
    pub printing: bool,
    /// Paused
    pub paused: bool,
    /// Pausing
    pub pausing: bool,
    /// Cancelling
    pub cancelling: bool,
    /// Resuming
    pub resuming: bool,
    /// Finishing a print
    pub finishing: bool,
    /// SD card initialized
    pub sd_ready: bool,
    /// In an error state
    pub error: bool,
    /// Operational and idle
    pub ready: bool,
    /// Disconnected or failed
    pub closed_or_error: bool,
    /// Flags added by newer servers
    #[serde(flatten)]
    pub extra: Extra,
}

/// Axis of the print head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

/// Parameters of the `jog` print head command. Distances in millimeters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Jog {
    /// Distance along X in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Distance along Y in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Distance along Z in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Treat coordinates as absolute instead of relative
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub absolute: bool,
    /// Movement speed in mm/min
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Targets<'a> {
    targets: &'a BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct Offsets<'a> {
    offsets: &'a BTreeMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    tool: &'a str,
}

#[derive(Debug, Serialize)]
struct Target {
    target: f64,
}

#[derive(Debug, Serialize)]
struct Offset {
    offset: f64,
}

#[derive(Debug, Serialize)]
struct Axes<'a> {
    axes: &'a [Axis],
}

#[derive(Debug, Serialize)]
struct Factor {
    factor: f64,
}

#[derive(Debug, Serialize)]
struct Amount {
    amount: f64,
}

/// Handle for the printer endpoints.
pub struct PrinterApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> PrinterApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Full printer state.
    pub async fn state(&self) -> Result<PrinterState> {
        self.client.get(paths::PRINTER).await
    }

    /// Printer state without the given sections (`temperature`, `sd`, `state`).
    pub async fn state_excluding(&self, exclude: &[&str]) -> Result<PrinterState> {
        if exclude.is_empty() {
            return self.state().await;
        }
        let query = [("exclude", exclude.join(","))];
        self.client.get_with_query(paths::PRINTER, &query).await
    }

    /// Printer state including up to `limit` temperature history samples.
    pub async fn state_with_history(&self, limit: u32) -> Result<PrinterState> {
        let query = [("history", "true".to_string()), ("limit", limit.to_string())];
        self.client.get_with_query(paths::PRINTER, &query).await
    }

    /// Tool temperatures.
    pub async fn tool_state(&self) -> Result<TemperatureState> {
        self.client.get(&self.path("tool")).await
    }

    /// Bed temperature.
    pub async fn bed_state(&self) -> Result<TemperatureState> {
        self.client.get(&self.path("bed")).await
    }

    /// SD card state.
    pub async fn sd_state(&self) -> Result<SdState> {
        self.client.get(&self.path("sd")).await
    }

    /// Set target temperatures per tool (`{"tool0": 210.0}`).
    pub async fn set_tool_targets(&self, targets: &BTreeMap<String, f64>) -> Result<()> {
        self.command("tool", Command::with("target", Targets { targets }))
            .await
    }

    /// Set temperature offsets per tool.
    pub async fn set_tool_offsets(&self, offsets: &BTreeMap<String, f64>) -> Result<()> {
        self.command("tool", Command::with("offset", Offsets { offsets }))
            .await
    }

    /// Select the active tool (`tool0`, `tool1`, ...).
    pub async fn select_tool(&self, tool: &str) -> Result<()> {
        self.command("tool", Command::with("select", Tool { tool }))
            .await
    }

    /// Extrude (positive) or retract (negative) `amount` millimeters.
    pub async fn extrude(&self, amount: f64) -> Result<()> {
        self.command("tool", Command::with("extrude", Amount { amount }))
            .await
    }

    /// Set the flow rate factor in percent.
    pub async fn set_flowrate(&self, factor: f64) -> Result<()> {
        self.command("tool", Command::with("flowrate", Factor { factor }))
            .await
    }

    /// Set the bed target temperature.
    pub async fn set_bed_target(&self, target: f64) -> Result<()> {
        self.command("bed", Command::with("target", Target { target }))
            .await
    }

    /// Set the bed temperature offset.
    pub async fn set_bed_offset(&self, offset: f64) -> Result<()> {
        self.command("bed", Command::with("offset", Offset { offset }))
            .await
    }

    /// Move the print head.
    pub async fn jog(&self, jog: &Jog) -> Result<()> {
        self.command("printhead", Command::with("jog", jog)).await
    }

    /// Home the given axes.
    pub async fn home(&self, axes: &[Axis]) -> Result<()> {
        self.command("printhead", Command::with("home", Axes { axes }))
            .await
    }

    /// Set the feed rate factor in percent.
    pub async fn set_feedrate(&self, factor: f64) -> Result<()> {
        self.command("printhead", Command::with("feedrate", Factor { factor }))
            .await
    }

    /// Initialize the SD card.
    pub async fn sd_init(&self) -> Result<()> {
        self.command("sd", Command::bare("init")).await
    }

    /// Refresh the SD card file list.
    pub async fn sd_refresh(&self) -> Result<()> {
        self.command("sd", Command::bare("refresh")).await
    }

    /// Release the SD card.
    pub async fn sd_release(&self) -> Result<()> {
        self.command("sd", Command::bare("release")).await
    }

    async fn command<T: Serialize>(&self, sub: &str, body: Command<'_, T>) -> Result<()> {
        self.client.post_command(&self.path(sub), &body).await
    }

    fn path(&self, sub: &str) -> String {
        join_path(&[paths::PRINTER, sub])
    }
}
