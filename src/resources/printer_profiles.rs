//! `/api/printerprofiles`

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct ProfileList {
    #[serde(default)]
    profiles: BTreeMap<String, PrinterProfile>,
}

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    profile: PrinterProfile,
}

#[derive(Debug, Serialize)]
struct ProfileBody<'a> {
    profile: &'a Value,
}

/// A printer profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrinterProfile {
    /// Identifier used in URLs
    pub id: String,
    /// Display name
    pub name: String,
    /// UI color
    pub color: Option<String>,
    /// Printer model
    pub model: Option<String>,
    /// Whether this is the default profile
    #[serde(default)]
    pub default: bool,
    /// Whether this profile is currently in use
    #[serde(default)]
    pub current: bool,
    /// URL of the profile
    pub resource: Option<String>,
    /// Build volume
    pub volume: Option<Volume>,
    /// Whether the bed is heated
    #[serde(default)]
    pub heated_bed: bool,
    /// Whether the chamber is heated
    #[serde(default)]
    pub heated_chamber: bool,
    /// Extruder setup
    pub extruder: Option<Extruder>,
    /// Axis speeds and inversion, keyed by axis
    #[serde(default, deserialize_with = "null_as_default")]
    pub axes: BTreeMap<String, AxisSettings>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Print volume.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Volume {
    /// Width in mm
    pub width: f64,
    /// Depth in mm
    pub depth: f64,
    /// Height in mm
    pub height: f64,
    /// `rectangular` or `circular`
    pub form_factor: Option<String>,
    /// `lowerleft` or `center`
    pub origin: Option<String>,
    /// Custom bounding box, or `false`
    pub custom_box: Option<Value>,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Extruder configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extruder {
    /// Number of extruders
    #[serde(default)]
    pub count: u32,
    /// Nozzle diameter in mm
    pub nozzle_diameter: Option<f64>,
    /// Whether all extruders feed one nozzle
    #[serde(default)]
    pub shared_nozzle: bool,
    /// Per-extruder `[x, y]` offsets
    #[serde(default, deserialize_with = "null_as_default")]
    pub offsets: Vec<Vec<f64>>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Settings of a single axis.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AxisSettings {
    /// Feed rate in mm/min
    pub speed: Option<f64>,
    /// Whether the axis is inverted
    #[serde(default)]
    pub inverted: bool,
}

/// Handle for the printer profile endpoints.
pub struct PrinterProfilesApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> PrinterProfilesApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// All profiles keyed by their map key.
    ///
    /// Map keys pass through key normalization like every other object key;
    /// use [`PrinterProfile::id`] for the identifier OctoPrint expects.
    pub async fn list(&self) -> Result<Vec<PrinterProfile>> {
        let list: ProfileList = self.client.get(paths::PRINTER_PROFILES).await?;
        Ok(list.profiles.into_values().collect())
    }

    /// A single profile.
    pub async fn get(&self, id: &str) -> Result<PrinterProfile> {
        self.client.get(&self.path(id)).await
    }

    /// Create a profile. `profile` uses OctoPrint's camelCase field names;
    /// fields it leaves out are taken from the default profile.
    pub async fn create(&self, profile: &Value) -> Result<PrinterProfile> {
        let envelope: ProfileEnvelope = self
            .client
            .post(paths::PRINTER_PROFILES, &ProfileBody { profile })
            .await?;
        Ok(envelope.profile)
    }

    /// Update the given fields of a profile.
    pub async fn update(&self, id: &str, profile: &Value) -> Result<PrinterProfile> {
        let envelope: ProfileEnvelope = self
            .client
            .patch(&self.path(id), &ProfileBody { profile })
            .await?;
        Ok(envelope.profile)
    }

    /// Delete a profile. The default and current profiles cannot be deleted.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.send(Method::DELETE, &self.path(id), &[], None).await?;
        Ok(())
    }

    fn path(&self, id: &str) -> String {
        join_path(&[paths::PRINTER_PROFILES, id])
    }
}
