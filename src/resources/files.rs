//! `/api/files`: listing, uploading and managing files and folders.
//!
//! Files live either on OctoPrint's local storage ([`Location::Local`]) or on
//! the printer's SD card ([`Location::SdCard`]). Paths are relative to the
//! location root and use `/` as separator.
//!
//! # Examples
//!
//! ```ignore
//! use octoprint_client::resources::files::{Location, UploadRequest};
//!
//! let listing = client.files().list(true).await?;
//! for entry in listing.iter_recursive() {
//!     println!("{} ({:?})", entry.path, entry.size);
//! }
//!
//! let upload = UploadRequest::new("calibration.gcode", gcode_bytes)
//!     .in_folder("tests")
//!     .select();
//! client.files().upload(Location::Local, upload).await?;
//! ```

use crate::client::OctoPrintClient;
use crate::client::utils::join_path;
use crate::error::{OctoPrintError, Result};
use crate::model::{null_as_default, one_or_many, Extra};
use crate::protocol::paths;
use crate::resources::job::Filament;
use crate::resources::Command;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Storage location of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    /// OctoPrint's upload folder
    #[serde(rename = "local")]
    Local,
    /// The printer's SD card
    #[serde(rename = "sdcard")]
    SdCard,
}

impl Location {
    /// Path segment used by the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Local => "local",
            Location::SdCard => "sdcard",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A 3D model (e.g. STL) that needs slicing
    Model,
    /// Printable machine code
    Machinecode,
    /// A folder
    Folder,
    /// Anything else a plugin registered
    #[serde(other)]
    Other,
}

/// Response of `GET /api/files` and `GET /api/files/{location}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileList {
    /// Top level entries
    #[serde(default, deserialize_with = "one_or_many")]
    pub files: Vec<FileEntry>,
    /// Free space in bytes
    pub free: Option<u64>,
    /// Total space in bytes
    pub total: Option<u64>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl FileList {
    /// Walk all entries depth-first, including folder children.
    pub fn iter_recursive(&self) -> impl Iterator<Item = &FileEntry> {
        let mut stack: Vec<&FileEntry> = self.files.iter().rev().collect();
        std::iter::from_fn(move || {
            let entry = stack.pop()?;
            stack.extend(entry.children.iter().rev());
            Some(entry)
        })
    }

    /// Find an entry by its full path.
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        self.iter_recursive().find(|e| e.path == path)
    }
}

/// A file or folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name on disk
    pub name: String,
    /// Name for display purposes
    pub display: Option<String>,
    /// Path relative to the location root
    #[serde(default)]
    pub path: String,
    /// `machinecode`, `model` or `folder`
    #[serde(rename = "type")]
    pub kind: Option<EntryKind>,
    /// Type hierarchy, e.g. `["machinecode", "gcode"]`
    #[serde(default, deserialize_with = "null_as_default")]
    pub type_path: Vec<String>,
    /// MD5 hash of the file
    pub hash: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
    /// Upload timestamp
    pub date: Option<i64>,
    /// Where the file is stored
    pub origin: Option<Location>,
    /// Links to the entry
    #[serde(default, deserialize_with = "null_as_default")]
    pub refs: Refs,
    /// Analysis results for machine code files
    pub gcode_analysis: Option<GcodeAnalysis>,
    /// Print history
    pub prints: Option<PrintHistory>,
    /// Print time statistics
    pub statistics: Option<PrintStatistics>,
    /// Folder contents (only for folders, only with recursive listings)
    #[serde(default, deserialize_with = "one_or_many")]
    pub children: Vec<FileEntry>,
    /// Undeclared fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl FileEntry {
    /// Whether this entry is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == Some(EntryKind::Folder)
    }

    /// Whether this entry can be printed without slicing.
    pub fn is_printable(&self) -> bool {
        self.kind == Some(EntryKind::Machinecode)
    }

    /// Display name, falling back to the file name.
    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}

/// Links related to an entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Refs {
    /// API resource of the entry
    pub resource: Option<String>,
    /// Download link (local files only)
    pub download: Option<String>,
    /// Source model a machine code file was sliced from
    pub model: Option<String>,
}

/// Results of OctoPrint's G-code analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GcodeAnalysis {
    /// Estimated print time in seconds
    pub estimated_print_time: Option<f64>,
    /// Filament use per tool
    #[serde(default, deserialize_with = "null_as_default")]
    pub filament: BTreeMap<String, Filament>,
    /// Size of the printed object
    pub dimensions: Option<Dimensions>,
    /// Bounding box of extruding moves
    pub printing_area: Option<Area>,
    /// Bounding box of all moves
    pub travel_area: Option<Area>,
    /// Fields not declared above
    #[serde(flatten)]
    pub extra: Extra,
}

/// Bounding box size in millimeters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    /// Width in mm
    pub width: f64,
    /// Depth in mm
    pub depth: f64,
    /// Height in mm
    pub height: f64,
}

/// Bounding box coordinates in millimeters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Area {
    /// Minimum X in mm
    pub min_x: f64,
    /// Maximum X in mm
    pub max_x: f64,
    /// Minimum Y in mm
    pub min_y: f64,
    /// Maximum Y in mm
    pub max_y: f64,
    /// Minimum Z in mm
    pub min_z: f64,
    /// Maximum Z in mm
    pub max_z: f64,
}

/// Print counts for a file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintHistory {
    /// Successful prints
    #[serde(default)]
    pub success: u32,
    /// Failed prints
    #[serde(default)]
    pub failure: u32,
    /// Most recent print
    pub last: Option<LastPrint>,
}

/// Outcome of the most recent print.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LastPrint {
    /// Timestamp of the print
    pub date: Option<f64>,
    /// Duration in seconds
    pub print_time: Option<f64>,
    /// Whether it succeeded
    #[serde(default)]
    pub success: bool,
}

/// Print time statistics per printer profile id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrintStatistics {
    /// Average print time per printer profile
    #[serde(default, deserialize_with = "null_as_default")]
    pub average_print_time: BTreeMap<String, f64>,
    /// Last print time per printer profile
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_print_time: BTreeMap<String, f64>,
    /// Unknown fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// Response of an upload or folder creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Uploaded files keyed by location
    #[serde(default)]
    pub files: BTreeMap<String, FileEntry>,
    /// Created folder
    pub folder: Option<FileEntry>,
    /// Whether processing finished, `false` while slicing
    #[serde(default)]
    pub done: bool,
    /// Whether the upload was selected
    pub effective_select: Option<bool>,
    /// Whether printing started
    pub effective_print: Option<bool>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Extra,
}

/// A file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Name the file gets on the server
    pub file_name: String,
    /// File contents
    pub content: Bytes,
    /// Target folder below the location root
    pub path: Option<String>,
    /// Select the file after upload
    pub select: bool,
    /// Start printing after upload
    pub print: bool,
    /// Opaque JSON string stored as file metadata
    pub user_data: Option<String>,
}

impl UploadRequest {
    /// Upload `content` as `file_name` to the location root.
    pub fn new(file_name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            path: None,
            select: false,
            print: false,
            user_data: None,
        }
    }

    /// Upload into `folder` instead of the root.
    pub fn in_folder(mut self, folder: impl Into<String>) -> Self {
        self.path = Some(folder.into());
        self
    }

    /// Select the file once uploaded.
    pub fn select(mut self) -> Self {
        self.select = true;
        self
    }

    /// Select and print the file once uploaded.
    pub fn print(mut self) -> Self {
        self.select = true;
        self.print = true;
        self
    }

    fn into_form(self) -> Result<Form> {
        let part = Part::bytes(self.content.to_vec())
            .file_name(self.file_name)
            .mime_str("application/octet-stream")?;
        let mut form = Form::new().part("file", part);
        if let Some(path) = self.path {
            form = form.text("path", path);
        }
        if self.select {
            form = form.text("select", "true");
        }
        if self.print {
            form = form.text("print", "true");
        }
        if let Some(user_data) = self.user_data {
            form = form.text("userdata", user_data);
        }
        Ok(form)
    }
}

/// Parameters of the `slice` file command.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SliceRequest {
    /// Slicer to use, server default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slicer: Option<String>,
    /// Slicing profile key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Name of the resulting machine code file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcode: Option<String>,
    /// Printer profile id
    #[serde(rename = "printerProfile", skip_serializing_if = "Option::is_none")]
    pub printer_profile: Option<String>,
    /// Select the result once sliced
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub select: bool,
    /// Print the result once sliced
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub print: bool,
}

#[derive(Debug, Serialize)]
struct SelectArgs {
    print: bool,
}

#[derive(Debug, Serialize)]
struct DestinationArgs<'a> {
    destination: &'a str,
}

/// Handle for the files endpoint.
pub struct FilesApi<'a> {
    client: &'a OctoPrintClient,
}

impl<'a> FilesApi<'a> {
    pub(crate) fn new(client: &'a OctoPrintClient) -> Self {
        Self { client }
    }

    /// List files of all locations.
    pub async fn list(&self, recursive: bool) -> Result<FileList> {
        self.client
            .get_with_query(paths::FILES, &recursive_query(recursive))
            .await
    }

    /// List files of one location.
    pub async fn list_location(&self, location: Location, recursive: bool) -> Result<FileList> {
        let path = join_path(&[paths::FILES, location.as_str()]);
        self.client
            .get_with_query(&path, &recursive_query(recursive))
            .await
    }

    /// Information about one file or folder.
    pub async fn get(&self, location: Location, path: &str) -> Result<FileEntry> {
        self.client.get(&entry_path(location, path)).await
    }

    /// Upload a file.
    pub async fn upload(&self, location: Location, request: UploadRequest) -> Result<UploadResponse> {
        let path = join_path(&[paths::FILES, location.as_str()]);
        let response = self.client.upload(&path, request.into_form()?).await?;
        self.client.model(response)
    }

    /// Upload a file from the local file system, keeping its file name.
    pub async fn upload_file(
        &self,
        location: Location,
        local_path: impl AsRef<Path>,
        folder: Option<&str>,
    ) -> Result<UploadResponse> {
        let local_path = local_path.as_ref();
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                OctoPrintError::Config(format!("no file name in {}", local_path.display()))
            })?
            .to_string();
        let content = tokio::fs::read(local_path).await?;

        let mut request = UploadRequest::new(file_name, content);
        request.path = folder.map(str::to_string);
        self.upload(location, request).await
    }

    /// Create a folder `name` below `parent` (root when `None`).
    pub async fn create_folder(
        &self,
        location: Location,
        name: &str,
        parent: Option<&str>,
    ) -> Result<UploadResponse> {
        let path = join_path(&[paths::FILES, location.as_str()]);
        let mut form = Form::new().text("foldername", name.to_string());
        if let Some(parent) = parent {
            form = form.text("path", parent.to_string());
        }
        let response = self.client.upload(&path, form).await?;
        self.client.model(response)
    }

    /// Select a file for printing, optionally starting the print.
    pub async fn select(&self, location: Location, path: &str, print: bool) -> Result<()> {
        self.client
            .post_command(
                &entry_path(location, path),
                &Command::with("select", SelectArgs { print }),
            )
            .await
    }

    /// Unselect the currently selected file.
    pub async fn unselect(&self, location: Location, path: &str) -> Result<()> {
        self.client
            .post_command(&entry_path(location, path), &Command::bare("unselect"))
            .await
    }

    /// Copy an entry to `destination` (a folder path).
    pub async fn copy(&self, location: Location, path: &str, destination: &str) -> Result<()> {
        self.client
            .post_command(
                &entry_path(location, path),
                &Command::with("copy", DestinationArgs { destination }),
            )
            .await
    }

    /// Move an entry to `destination` (a folder path).
    pub async fn move_to(&self, location: Location, path: &str, destination: &str) -> Result<()> {
        self.client
            .post_command(
                &entry_path(location, path),
                &Command::with("move", DestinationArgs { destination }),
            )
            .await
    }

    /// Slice a model file.
    pub async fn slice(&self, location: Location, path: &str, request: &SliceRequest) -> Result<()> {
        self.client
            .post_command(&entry_path(location, path), &Command::with("slice", request))
            .await
    }

    /// Trigger a new analysis of a machine code file.
    pub async fn analyse(&self, location: Location, path: &str) -> Result<()> {
        self.client
            .post_command(&entry_path(location, path), &Command::bare("analyse"))
            .await
    }

    /// Delete a file or folder.
    pub async fn delete(&self, location: Location, path: &str) -> Result<()> {
        self.client
            .send(Method::DELETE, &entry_path(location, path), &[], None)
            .await?;
        Ok(())
    }

    /// Download the contents of a local file.
    pub async fn download(&self, entry: &FileEntry) -> Result<Bytes> {
        let link = entry.refs.download.as_deref().ok_or_else(|| {
            OctoPrintError::MissingLink(format!("{} has no download link", entry.path))
        })?;
        self.client.download(link).await
    }
}

fn entry_path(location: Location, path: &str) -> String {
    join_path(&[paths::FILES, location.as_str(), path])
}

fn recursive_query(recursive: bool) -> Vec<(&'static str, String)> {
    if recursive {
        vec![("recursive", "true".to_string())]
    } else {
        Vec::new()
    }
}
