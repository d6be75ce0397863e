//! `/api/timelapse`

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use crate::resources::Command;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/timelapse`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelapseList {
    /// Current configuration
    #[serde(default)]
    pub config: TimelapseConfig,
    /// Whether timelapses are recorded
    #[serde(default)]
    pub enabled: bool,
    /// Rendered timelapses
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<Timelapse>,
    /// Recordings not yet rendered, only when requested
    #[serde(default, deserialize_with = "null_as_default")]
    pub unrendered: Vec<UnrenderedTimelapse>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Timelapse configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelapseConfig {
    /// `off`, `zchange` or `timed`
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Seconds of still frames appended at the end
    pub post_roll: Option<u32>,
    /// Frames per second of the rendered video
    pub fps: Option<u32>,
    /// Seconds between captures (`timed` only)
    pub interval: Option<u32>,
    /// Z hop in millimeters ignored when detecting layer changes (`zchange` only)
    pub retraction_z_hop: Option<f64>,
    /// Minimum seconds between captures (`zchange` only)
    pub min_delay: Option<f64>,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// A rendered timelapse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timelapse {
    /// File name
    pub name: String,
    /// Human readable size, e.g. `1.2MB`
    pub size: Option<String>,
    /// Size in bytes
    pub bytes: Option<u64>,
    /// Human readable date
    pub date: Option<String>,
    /// Download URL
    pub url: Option<String>,
    /// Thumbnail URL
    pub thumbnail: Option<String>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// A recording waiting to be rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnrenderedTimelapse {
    /// Recording name
    pub name: String,
    /// Human readable size
    pub size: Option<String>,
    /// Size in bytes
    pub bytes: Option<u64>,
    /// Human readable date
    pub date: Option<String>,
    /// Whether frames are still captured
    #[serde(default)]
    pub recording: bool,
    /// Whether it is being rendered
    #[serde(default)]
    pub rendering: bool,
    /// Whether it is queued for rendering
    #[serde(default)]
    pub processing: bool,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Changes to the timelapse configuration. Unset fields stay untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelapseConfigUpdate {
    /// `off`, `zchange` or `timed`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Seconds to keep recording after the print
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_roll: Option<u32>,
    /// Frames per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Seconds between frames for `timed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    /// Z hop to ignore for `zchange`
    #[serde(rename = "retractionZHop", skip_serializing_if = "Option::is_none")]
    pub retraction_z_hop: Option<f64>,
    /// Minimum seconds between frames for `zchange`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_delay: Option<f64>,
    /// Persist as the new default configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save: Option<bool>,
}

/// Handle for the timelapse endpoints.
pub struct TimelapseApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> TimelapseApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Configuration and rendered timelapses, plus unrendered recordings
    /// when `unrendered` is set.
    pub async fn list(&self, unrendered: bool) -> Result<TimelapseList> {
        let query = if unrendered {
            vec![("unrendered", "true".to_string())]
        } else {
            Vec::new()
        };
        self.client.get_with_query(paths::TIMELAPSE, &query).await
    }

    /// Delete a rendered timelapse.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &join_path(&[paths::TIMELAPSE, name]), &[], None)
            .await?;
        Ok(())
    }

    /// Render an unrendered recording.
    pub async fn render(&self, name: &str) -> Result<()> {
        self.client
            .post_command(&self.unrendered_path(name), &Command::bare("render"))
            .await
    }

    /// Delete an unrendered recording.
    pub async fn delete_unrendered(&self, name: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &self.unrendered_path(name), &[], None)
            .await?;
        Ok(())
    }

    /// Change the configuration and return the updated state.
    pub async fn update_config(&self, update: &TimelapseConfigUpdate) -> Result<TimelapseList> {
        self.client.post(paths::TIMELAPSE, update).await
    }

    fn unrendered_path(&self, name: &str) -> String {
        join_path(&[paths::TIMELAPSE, "unrendered", name])
    }
}
