//! Watching the panels' directories for changes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use notify::event::ModifyKind;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::event::{Event, EventProxy, Side};

/// Non-recursive watches on the directory each panel shows.
pub struct DirectoryWatcher {
    watcher: RecommendedWatcher,
    watched: HashMap<Side, PathBuf>,
}

impl DirectoryWatcher {
    pub fn new(proxy: EventProxy) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    for path in changed_directories(&event) {
                        proxy.send_event(Event::DirectoryChanged(path));
                    }
                },
                Err(err) => warn!("Filesystem watcher error: {err}"),
            }
        })?;
        Ok(Self { watcher, watched: HashMap::new() })
    }

    /// Move the watch of `side` to `path`.
    pub fn watch(&mut self, side: Side, path: &Path) {
        if self.watched.get(&side).is_some_and(|current| current == path) {
            return;
        }

        if let Some(old) = self.watched.remove(&side) {
            if !self.is_watched(&old) {
                let _ = self.watcher.unwatch(&old);
            }
        }

        if !self.is_watched(path) {
            if let Err(err) = self.watcher.watch(path, RecursiveMode::NonRecursive) {
                debug!("Not watching {}: {err}", path.display());
                return;
            }
        }
        self.watched.insert(side, path.to_path_buf());
    }

    fn is_watched(&self, path: &Path) -> bool {
        self.watched.values().any(|p| p == path)
    }
}

/// Directories whose listing an event may have changed.
///
/// Every touched entry changes its parent. A removed or renamed entry may
/// also be a watched directory itself, whose panel must notice it is gone.
fn changed_directories(event: &notify::Event) -> Vec<PathBuf> {
    let vanishes = match event.kind {
        EventKind::Create(_) => false,
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)) => true,
        _ => return Vec::new(),
    };

    let mut changed = Vec::new();
    for path in &event.paths {
        if let Some(parent) = path.parent() {
            changed.push(parent.to_path_buf());
        }
        if vanishes {
            changed.push(path.clone());
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use notify::event::{CreateKind, DataChange, RemoveKind, RenameMode};

    use super::*;

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn created_entry_changes_parent() {
        let changed = changed_directories(&event(EventKind::Create(CreateKind::File), "/srv/a"));
        assert_eq!(changed, vec![PathBuf::from("/srv")]);
    }

    #[test]
    fn removed_directory_reports_itself() {
        let removed = event(EventKind::Remove(RemoveKind::Folder), "/srv/www");
        let changed = changed_directories(&removed);
        assert!(changed.contains(&PathBuf::from("/srv")));
        assert!(changed.contains(&PathBuf::from("/srv/www")));
    }

    #[test]
    fn renamed_directory_reports_itself() {
        let renamed = event(EventKind::Modify(ModifyKind::Name(RenameMode::From)), "/srv/www");
        assert!(changed_directories(&renamed).contains(&PathBuf::from("/srv/www")));
    }

    #[test]
    fn content_changes_are_ignored() {
        let written = event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), "/srv/a");
        assert!(changed_directories(&written).is_empty());
        assert!(changed_directories(&event(EventKind::Any, "/srv")).is_empty());
    }
}
