//! Directory listing contract.
//!
//! Listing is the only operation a panel waits on. A panel hands a
//! [`ListingRequest`] to its [`DirectoryManager`] and the manager later
//! delivers a [`ListingResponse`] carrying the same token back to
//! `PanelController::on_directory_fetched`.

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ListingSettings;

/// Kind of a directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    /// File name without its parent path.
    pub name: String,
    pub kind: EntryKind,
    /// Size in bytes; zero for directories.
    pub size: u64,
}

impl DirEntry {
    pub fn new(name: impl Into<String>, kind: EntryKind, size: u64) -> Self {
        Self { name: name.into(), kind, size }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Options a listing is performed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub show_hidden: bool,
    pub directories_first: bool,
}

impl From<&ListingSettings> for ListOptions {
    fn from(settings: &ListingSettings) -> Self {
        Self {
            show_hidden: settings.show_hidden,
            directories_first: settings.directories_first,
        }
    }
}

impl Default for ListOptions {
    fn default() -> Self {
        (&ListingSettings::default()).into()
    }
}

/// Identifies one listing request. Tokens issued by a panel strictly
/// increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestToken(pub u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A request to enumerate a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub token: RequestToken,
    pub path: PathBuf,
    pub options: ListOptions,
}

/// Why a listing failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListingError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("no such directory")]
    NotFound,
    #[error("not a directory")]
    NotADirectory,
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for ListingError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => ListingError::PermissionDenied,
            std::io::ErrorKind::NotFound => ListingError::NotFound,
            std::io::ErrorKind::NotADirectory => ListingError::NotADirectory,
            _ => ListingError::Other(err.to_string()),
        }
    }
}

/// The completion of a [`ListingRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingResponse {
    pub token: RequestToken,
    pub path: PathBuf,
    pub result: Result<Vec<DirEntry>, ListingError>,
}

impl ListingResponse {
    /// Build the response answering `request`.
    pub fn for_request(
        request: &ListingRequest,
        result: Result<Vec<DirEntry>, ListingError>,
    ) -> Self {
        Self { token: request.token, path: request.path.clone(), result }
    }
}

/// Asynchronous directory enumeration.
///
/// `list_directory` must not block on the filesystem. The response is
/// delivered through whatever event channel the host uses, on the panel's
/// thread.
pub trait DirectoryManager {
    fn list_directory(&self, request: ListingRequest);
}

/// Filter and order entries according to `options`.
///
/// Names compare case-insensitively, ties broken by the raw name.
pub fn sort_entries(entries: &mut Vec<DirEntry>, options: &ListOptions) {
    if !options.show_hidden {
        entries.retain(|entry| !entry.is_hidden());
    }
    entries.sort_by(|a, b| {
        let by_kind = if options.directories_first {
            b.is_dir().cmp(&a.is_dir())
        } else {
            Ordering::Equal
        };
        by_kind
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.name.cmp(&b.name))
    });
}
