//! Wire-level constants and the SockJS framing used by the push channel.
//!
//! # Module Structure
//!
//! - **constants** (this module) - header names and endpoint paths
//! - **[sockjs]** - SockJS frame parsing and encoding

pub mod sockjs;

pub use sockjs::{encode_send_body, Frame, FrameParser};

/// Header carrying the API key on every authenticated request.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Endpoint paths relative to the instance base URL.
pub mod paths {
    /// `GET /api/version`
    pub const VERSION: &str = "api/version";
    /// `GET /api/server`
    pub const SERVER: &str = "api/server";
    /// `POST /api/login`
    pub const LOGIN: &str = "api/login";
    /// `POST /api/logout`
    pub const LOGOUT: &str = "api/logout";
    /// `GET /api/currentuser`
    pub const CURRENT_USER: &str = "api/currentuser";
    /// `GET|POST /api/connection`
    pub const CONNECTION: &str = "api/connection";
    /// `/api/files`
    pub const FILES: &str = "api/files";
    /// `GET|POST /api/job`
    pub const JOB: &str = "api/job";
    /// `GET /api/printer`
    pub const PRINTER: &str = "api/printer";
    /// `/api/printerprofiles`
    pub const PRINTER_PROFILES: &str = "api/printerprofiles";
    /// `/api/access/permissions`
    pub const PERMISSIONS: &str = "api/access/permissions";
    /// `/api/access/groups`
    pub const GROUPS: &str = "api/access/groups";
    /// `/api/access/users`
    pub const USERS: &str = "api/access/users";
    /// `GET|POST /api/settings`
    pub const SETTINGS: &str = "api/settings";
    /// `/api/system/commands`
    pub const SYSTEM_COMMANDS: &str = "api/system/commands";
    /// `/plugin/logging/logs`
    pub const LOGS: &str = "plugin/logging/logs";
    /// `/api/timelapse`
    pub const TIMELAPSE: &str = "api/timelapse";
    /// `/api/slicing`
    pub const SLICING: &str = "api/slicing";
    /// SockJS endpoint root
    pub const SOCKJS: &str = "sockjs";
}
