//! Server log files, served by the bundled logging plugin.

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use crate::resources::files::Refs;
use bytes::Bytes;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Response of `GET /plugin/logging/logs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogList {
    /// Log files
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<LogFile>,
    /// Free space in the log folder's file system, in bytes
    pub free: Option<u64>,
    /// Total bytes of the log partition
    pub total: Option<u64>,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// A log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFile {
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: Option<u64>,
    /// Modification timestamp
    pub date: Option<i64>,
    /// Resource and download links
    #[serde(default, deserialize_with = "null_as_default")]
    pub refs: Refs,
}

/// Handle for the logs endpoints.
pub struct LogsApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> LogsApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// All log files.
    pub async fn list(&self) -> Result<LogList> {
        self.client.get(paths::LOGS).await
    }

    /// Delete a log file.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &join_path(&[paths::LOGS, name]), &[], None)
            .await?;
        Ok(())
    }

    /// Download a log file's contents.
    pub async fn download(&self, name: &str) -> Result<Bytes> {
        self.client
            .download(&join_path(&["downloads", "logs", name]))
            .await
    }
}
