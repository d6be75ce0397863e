//! `/api/job`: the current print job.
//!
//! # Examples
//!
//! ```ignore
//! use octoprint_client::resources::job::PauseAction;
//!
//! let info = client.job().get().await?;
//! if let Some(done) = info.progress.completion {
//!     println!("{} is {:.1}% done", info.job.file.display_name().unwrap_or("?"), done);
//! }
//! client.job().pause(PauseAction::Pause).await?;
//! ```

use crate::client::OctoPrintClient;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use crate::resources::Command;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response of `GET /api/job`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobInfo {
    /// Selected file and estimates
    #[serde(default)]
    pub job: Job,
    /// Progress of the current print
    #[serde(default, deserialize_with = "null_as_default")]
    pub progress: Progress,
    /// Printer state text, e.g. `Operational` or `Printing`
    #[serde(default)]
    pub state: String,
    /// Error text when the state is an error state
    pub error: Option<String>,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// The job itself: file and estimates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    /// Selected file
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: JobFile,
    /// Estimated print time in seconds
    pub estimated_print_time: Option<f64>,
    /// Print time of the last print of this file in seconds
    pub last_print_time: Option<f64>,
    /// Filament use per tool (`tool0`, `tool1`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub filament: BTreeMap<String, Filament>,
    /// User that started the job
    pub user: Option<String>,
    /// Fields such as `lastPrintTime` and `user`
    #[serde(flatten)]
    pub extra: Extra,
}

/// The file being printed. All fields are `None` when no file is selected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobFile {
    /// File name
    pub name: Option<String>,
    /// Display name
    pub display: Option<String>,
    /// Path within its origin
    pub path: Option<String>,
    /// `local` or `sdcard`
    pub origin: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    /// Upload timestamp
    pub date: Option<i64>,
}

impl JobFile {
    /// Whether a file is selected.
    pub fn is_selected(&self) -> bool {
        self.name.is_some()
    }

    /// Display name, falling back to the file name.
    pub fn display_name(&self) -> Option<&str> {
        self.display.as_deref().or(self.name.as_deref())
    }
}

/// Filament estimate for one tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Filament {
    /// Length in millimeters
    pub length: Option<f64>,
    /// Volume in cubic centimeters
    pub volume: Option<f64>,
}

/// Progress of the running job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Percentage of completion
    pub completion: Option<f64>,
    /// Current position in the file in bytes
    pub filepos: Option<u64>,
    /// Elapsed time in seconds
    pub print_time: Option<f64>,
    /// Estimated remaining time in seconds
    pub print_time_left: Option<f64>,
    /// Source of the remaining time estimate
    pub print_time_left_origin: Option<String>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Argument of the `pause` job command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PauseAction {
    /// Pause; no-op when already paused
    Pause,
    /// Resume; no-op when not paused
    Resume,
    /// Toggle between paused and printing
    Toggle,
}

#[derive(Debug, Serialize)]
struct PauseArgs {
    action: PauseAction,
}

/// Handle for the job endpoint.
pub struct JobApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> JobApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// Information about the current job.
    pub async fn get(&self) -> Result<JobInfo> {
        self.client.get(paths::JOB).await
    }

    /// Start printing the selected file.
    pub async fn start(&self) -> Result<()> {
        self.command("start").await
    }

    /// Cancel the running job.
    pub async fn cancel(&self) -> Result<()> {
        self.command("cancel").await
    }

    /// Restart the paused job from the beginning.
    pub async fn restart(&self) -> Result<()> {
        self.command("restart").await
    }

    /// Pause, resume or toggle the running job.
    pub async fn pause(&self, action: PauseAction) -> Result<()> {
        self.client
            .post_command(paths::JOB, &Command::with("pause", PauseArgs { action }))
            .await
    }

    /// Shortcut for `pause(PauseAction::Toggle)`.
    pub async fn toggle_pause(&self) -> Result<()> {
        self.pause(PauseAction::Toggle).await
    }

    async fn command(&self, command: &str) -> Result<()> {
        self.client.post_command(paths::JOB, &Command::bare(command)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn test_decode_idle_job() {
        let info: JobInfo = decode(json!({
            "job": {
                "file": {"name": null, "origin": null, "size": null, "date": null},
                "estimatedPrintTime": null,
                "filament": null
            },
            "progress": {"completion": null, "filepos": null, "printTime": null, "printTimeLeft": null},
            "state": "Operational"
        }))
        .unwrap();

        assert!(!info.job.file.is_selected());
        assert!(info.job.filament.is_empty());
        assert_eq!(info.state, "Operational");
    }

    #[test]
    fn test_decode_running_job() {
        let info: JobInfo = decode(json!({
            "job": {
                "file": {"name": "whistle_v2.gcode", "origin": "local", "size": 1468987, "date": 1378847754},
                "estimatedPrintTime": 8811,
                "filament": {"tool0": {"length": 810, "volume": 5.36}}
            },
            "progress": {
                "completion": 0.2298468264184775,
                "filepos": 337942,
                "printTime": 276,
                "printTimeLeft": 912,
                "printTimeLeftOrigin": "linear"
            },
            "state": "Printing"
        }))
        .unwrap();

        assert_eq!(info.job.file.display_name(), Some("whistle_v2.gcode"));
        assert_eq!(info.job.estimated_print_time, Some(8811.0));
        assert_eq!(info.job.filament["tool0"].volume, Some(5.36));
        assert_eq!(info.progress.print_time_left, Some(912.0));
        assert_eq!(info.progress.print_time_left_origin.as_deref(), Some("linear"));
    }

    #[test]
    fn test_pause_body() {
        let body = serde_json::to_value(Command::with(
            "pause",
            PauseArgs {
                action: PauseAction::Resume,
            },
        ))
        .unwrap();
        assert_eq!(body, json!({"command": "pause", "action": "resume"}));
    }
}
