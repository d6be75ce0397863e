//! `/api/version` and `/api/server`.

use crate::client::OctoPrintClient;
use crate::error::Result;
use crate::model::Extra;
use crate::protocol::paths;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VersionInfo {
    /// API version, e.g. `0.1`
    pub api: String,
    /// Server version, e.g. `1.9.3`
    pub server: String,
    /// Human readable version string
    #[serde(default)]
    pub text: String,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Response of `GET /api/server`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    /// Server version
    pub version: String,
    /// Why the server runs in safe mode, `None` when it does not
    pub safemode: Option<String>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

impl ServerInfo {
    /// Whether OctoPrint was started in safe mode.
    pub fn in_safe_mode(&self) -> bool {
        self.safemode.is_some()
    }
}

/// Handle for the version and server endpoints.
pub struct ServerApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> ServerApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// `GET /api/version`
    pub async fn version(&self) -> Result<VersionInfo> {
        self.client.get(paths::VERSION).await
    }

    /// `GET /api/server`
    pub async fn info(&self) -> Result<ServerInfo> {
        self.client.get(paths::SERVER).await
    }
}
