//! `/api/slicing`

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A registered slicer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slicer {
    /// Slicer identifier
    pub key: String,
    /// Display name
    pub display_name: Option<String>,
    /// Whether this is the default slicer
    #[serde(default)]
    pub default: bool,
    /// Whether the slicer is set up and usable
    #[serde(default)]
    pub configured: bool,
    /// Profiles keyed by profile key
    #[serde(default, deserialize_with = "null_as_default")]
    pub profiles: BTreeMap<String, SlicingProfile>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// A slicing profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlicingProfile {
    /// Profile key
    pub key: String,
    /// Display name
    pub display_name: Option<String>,
    /// Whether this is the slicer's default profile
    #[serde(default)]
    pub default: bool,
    /// Description
    pub description: Option<String>,
    /// URL of the profile
    pub resource: Option<String>,
    /// Slicer specific profile data, only on single-profile requests
    #[serde(flatten)]
    pub extra: Extra,
}

/// Handle for the slicing endpoints.
pub struct SlicingApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> SlicingApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// All slicers keyed by slicer identifier, each with its profiles.
    pub async fn list(&self) -> Result<BTreeMap<String, Slicer>> {
        self.client.get(paths::SLICING).await
    }

    /// A single profile including its data.
    pub async fn profile(&self, slicer: &str, key: &str) -> Result<SlicingProfile> {
        self.client.get(&self.profile_path(slicer, key)).await
    }

    /// Delete a profile.
    pub async fn delete_profile(&self, slicer: &str, key: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &self.profile_path(slicer, key), &[], None)
            .await?;
        Ok(())
    }

    fn profile_path(&self, slicer: &str, key: &str) -> String {
        join_path(&[paths::SLICING, slicer, "profiles", key])
    }
}
