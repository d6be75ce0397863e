//! Typed handles for OctoPrint's REST endpoint groups.
//!
//! Every endpoint group lives in its own module and is reached through an
//! accessor on [`OctoPrintClient`]:
//!
//! | Accessor | Endpoints |
//! |----------|-----------|
//! | [`server`](OctoPrintClient::server) | `/api/version`, `/api/server` |
//! | [`auth`](OctoPrintClient::auth) | `/api/login`, `/api/logout`, `/api/currentuser` |
//! | [`connection`](OctoPrintClient::connection) | `/api/connection` |
//! | [`files`](OctoPrintClient::files) | `/api/files` |
//! | [`job`](OctoPrintClient::job) | `/api/job` |
//! | [`printer`](OctoPrintClient::printer) | `/api/printer` |
//! | [`printer_profiles`](OctoPrintClient::printer_profiles) | `/api/printerprofiles` |
//! | [`access`](OctoPrintClient::access) | `/api/access/*` |
//! | [`settings`](OctoPrintClient::settings) | `/api/settings` |
//! | [`system`](OctoPrintClient::system) | `/api/system/commands` |
//! | [`logs`](OctoPrintClient::logs) | `/plugin/logging/logs` |
//! | [`timelapse`](OctoPrintClient::timelapse) | `/api/timelapse` |
//! | [`slicing`](OctoPrintClient::slicing) | `/api/slicing` |

pub mod access;
pub mod auth;
pub mod connection;
pub mod files;
pub mod job;
pub mod logs;
pub mod printer;
pub mod printer_profiles;
pub mod server;
pub mod settings;
pub mod slicing;
pub mod system;
pub mod timelapse;

use crate::client::OctoPrintClient;
use serde::Serialize;

/// Body of OctoPrint's command endpoints: `{"command": "...", ...args}`.
#[derive(Debug, Serialize)]
pub(crate) struct Command<'a, T: Serialize> {
    command: &'a str,
    #[serde(flatten)]
    args: T,
}

impl<'a, T: Serialize> Command<'a, T> {
    pub(crate) fn with(command: &'a str, args: T) -> Self {
        Command { command, args }
    }
}

impl<'a> Command<'a, serde_json::Map<String, serde_json::Value>> {
    pub(crate) fn bare(command: &'a str) -> Self {
        Command {
            command,
            args: serde_json::Map::new(),
        }
    }
}

impl OctoPrintClient {
    /// Version and server information.
    pub fn server(&self) -> server::ServerApi<'_> {
        server::ServerApi::new(self)
    }

    /// Login, logout and the current user.
    pub fn auth(&self) -> auth::AuthApi<'_> {
        auth::AuthApi::new(self)
    }

    /// Serial connection to the printer.
    pub fn connection(&self) -> connection::ConnectionApi<'_> {
        connection::ConnectionApi::new(self)
    }

    /// File and folder management.
    pub fn files(&self) -> files::FilesApi<'_> {
        files::FilesApi::new(self)
    }

    /// The current print job.
    pub fn job(&self) -> job::JobApi<'_> {
        job::JobApi::new(self)
    }

    /// Printer state and printer operations.
    pub fn printer(&self) -> printer::PrinterApi<'_> {
        printer::PrinterApi::new(self)
    }

    /// Printer profiles.
    pub fn printer_profiles(&self) -> printer_profiles::PrinterProfilesApi<'_> {
        printer_profiles::PrinterProfilesApi::new(self)
    }

    /// Users, groups and permissions.
    pub fn access(&self) -> access::AccessApi<'_> {
        access::AccessApi::new(self)
    }

    /// Instance settings.
    pub fn settings(&self) -> settings::SettingsApi<'_> {
        settings::SettingsApi::new(self)
    }

    /// System commands (restart, shutdown, custom actions).
    pub fn system(&self) -> system::SystemApi<'_> {
        system::SystemApi::new(self)
    }

    /// Server log files.
    pub fn logs(&self) -> logs::LogsApi<'_> {
        logs::LogsApi::new(self)
    }

    /// Timelapse recordings and configuration.
    pub fn timelapse(&self) -> timelapse::TimelapseApi<'_> {
        timelapse::TimelapseApi::new(self)
    }

    /// Slicers and slicing profiles.
    pub fn slicing(&self) -> slicing::SlicingApi<'_> {
        slicing::SlicingApi::new(self)
    }
}
