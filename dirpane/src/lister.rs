//! Filesystem-backed directory manager.

use std::fs;
use std::path::Path;
use std::thread;

use log::error;

use dirpane_core::directory::{
    DirEntry, DirectoryManager, EntryKind, ListOptions, ListingError, ListingRequest,
    ListingResponse, sort_entries,
};

use crate::event::{Event, EventProxy, Side};

/// Lists directories on worker threads and posts the results to the main
/// loop.
pub struct ThreadedLister {
    side: Side,
    proxy: EventProxy,
}

impl ThreadedLister {
    pub fn new(side: Side, proxy: EventProxy) -> Self {
        Self { side, proxy }
    }
}

impl DirectoryManager for ThreadedLister {
    fn list_directory(&self, request: ListingRequest) {
        let side = self.side;
        let proxy = self.proxy.clone();
        let fallback = ListingResponse::for_request(&request, Ok(Vec::new()));

        let spawned = thread::Builder::new().name(format!("lister-{side}")).spawn(move || {
            let result = read_entries(&request.path, &request.options);
            let response = ListingResponse::for_request(&request, result);
            proxy.send_event(Event::Listing { side, response });
        });

        if let Err(err) = spawned {
            error!("Unable to spawn lister thread: {err}");
            let response =
                ListingResponse { result: Err(ListingError::Other(err.to_string())), ..fallback };
            self.proxy.send_event(Event::Listing { side, response });
        }
    }
}

/// Enumerate `path`, filtered and ordered by `options`.
///
/// Symlinks pointing at directories are listed as directories.
pub fn read_entries(path: &Path, options: &ListOptions) -> Result<Vec<DirEntry>, ListingError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let name = entry.file_name().to_string_lossy().into_owned();

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_dir() => EntryKind::Directory,
                _ => EntryKind::Symlink,
            }
        } else {
            EntryKind::File
        };

        let size = match kind {
            EntryKind::File => entry.metadata().map(|m| m.len()).unwrap_or(0),
            _ => 0,
        };
        entries.push(DirEntry::new(name, kind, size));
    }

    sort_entries(&mut entries, options);
    Ok(entries)
}
