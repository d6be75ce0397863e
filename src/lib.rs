#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # OctoPrint client
//!
//! A typed async client for the REST API of [OctoPrint](https://octoprint.org),
//! the 3D printer host software.
//!
//! ## Overview
//!
//! Every endpoint group is a handle borrowed from [`OctoPrintClient`]:
//!
//! 1. **Files** - List, upload, select, slice, move and delete files
//! 2. **Job** - Start, pause, cancel and watch the current print
//! 3. **Printer** - Temperatures, print head, SD card and serial connection
//! 4. **Administration** - Users, groups, settings, system commands, logs
//!
//! Responses are normalized to snake_case JSON and decoded into plain serde
//! structs. Fields the models don't declare are kept in an `extra` map, so
//! newer OctoPrint versions and plugins never break decoding.
//!
//! ## Client Usage
//!
//! ```ignore
//! use octoprint_client::{ClientConfig, OctoPrintClient};
//! use octoprint_client::resources::files::Location;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OctoPrintClient::new(
//!         ClientConfig::new("http://octopi.local").with_api_key("API_KEY"),
//!     )?;
//!
//!     let version = client.server().version().await?;
//!     println!("OctoPrint {}", version.server);
//!
//!     let files = client.files().list_location(Location::Local, true).await?;
//!     for file in files.iter_recursive().filter(|f| f.is_printable()) {
//!         println!("{}", file.path);
//!     }
//!
//!     client.files().select(Location::Local, "cube.gcode", true).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Push Updates
//!
//! ```ignore
//! use futures::StreamExt;
//! use octoprint_client::push::PushMessage;
//!
//! let mut stream = client.push().subscribe();
//! while let Some(message) = stream.next().await {
//!     if let PushMessage::Event(event) = message? {
//!         println!("{}", event.kind);
//!     }
//! }
//! ```
//!
//! ## Module Structure
//!
//! - **[client]** - HTTP client, configuration and response normalization
//! - **[error]** - Error types and result handling
//! - **[model]** - Key normalization and deserialization helpers
//! - **[resources]** - Typed endpoint groups
//! - **[push]** - SockJS push session and message stream
//! - **[protocol]** - API paths, headers and SockJS framing

pub mod client;
pub mod error;
pub mod model;
pub mod protocol;
pub mod push;
pub mod resources;

pub use client::{ApiResponse, ClientConfig, OctoPrintClient};
pub use error::{OctoPrintError, Result};
pub use push::{PushMessage, PushSession, PushStream};

#[cfg(test)]
mod tests;
