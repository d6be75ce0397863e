//! `/api/system/commands`: restart, shutdown and custom system actions.

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::Result;
use crate::model::{null_as_default, Extra};
use crate::protocol::paths;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Response of `GET /api/system/commands`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemCommands {
    /// Built-in commands (`shutdown`, `reboot`, `restart`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub core: Vec<SystemCommand>,
    /// Commands configured by the user
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom: Vec<SystemCommand>,
    /// Commands of other sources
    #[serde(flatten)]
    pub extra: Extra,
}

impl SystemCommands {
    /// All commands, core first.
    pub fn iter(&self) -> impl Iterator<Item = &SystemCommand> {
        self.core.iter().chain(self.custom.iter())
    }

    /// Find a command by source and action.
    pub fn find(&self, source: &str, action: &str) -> Option<&SystemCommand> {
        self.iter().find(|c| c.source == source && c.action == action)
    }
}

/// A system command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemCommand {
    /// Identifier within its source
    pub action: String,
    /// Display name
    pub name: String,
    /// `core` or `custom`
    pub source: String,
    /// API resource that executes the command
    pub resource: Option<String>,
    /// Confirmation text to show before executing
    pub confirm: Option<String>,
    /// Whether the command runs asynchronously on the server
    #[serde(rename = "async", default)]
    pub run_async: bool,
    /// Whether failures are ignored
    #[serde(default)]
    pub ignore: bool,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Handle for the system commands endpoint.
pub struct SystemApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> SystemApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// All commands.
    pub async fn list(&self) -> Result<SystemCommands> {
        self.client.get(paths::SYSTEM_COMMANDS).await
    }

    /// Commands of one source (`core` or `custom`).
    pub async fn list_source(&self, source: &str) -> Result<Vec<SystemCommand>> {
        self.client
            .get(&join_path(&[paths::SYSTEM_COMMANDS, source]))
            .await
    }

    /// Execute a command.
    pub async fn execute(&self, source: &str, action: &str) -> Result<()> {
        self.client
            .send(
                Method::POST,
                &join_path(&[paths::SYSTEM_COMMANDS, source, action]),
                &[],
                None,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::decode;
    use serde_json::json;

    #[test]
    fn test_decode_commands() {
        let commands: SystemCommands = decode(json!({
            "core": [
                {
                    "action": "shutdown",
                    "name": "Shutdown",
                    "confirm": "You are about to shutdown the system.",
                    "source": "core",
                    "resource": "http://example.com/api/system/commands/core/shutdown"
                }
            ],
            "custom": [
                {"action": "custom_live_mode", "name": "Live Mode", "source": "custom", "async": true, "ignore": true}
            ]
        }))
        .unwrap();

        assert_eq!(commands.iter().count(), 2);
        let live = commands.find("custom", "custom_live_mode").unwrap();
        assert!(live.run_async && live.ignore);
        assert!(live.confirm.is_none());
        assert!(commands.find("core", "reboot").is_none());
    }
}
