//! Persisted per-panel UI state.
//!
//! Values are stored as JSON under flat string keys namespaced by panel id,
//! e.g. `terminal.left.isOpen`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{PanelError, PanelResult};

/// Key under which a panel's terminal visibility is stored.
pub fn terminal_open_key(panel_id: &str) -> String {
    format!("terminal.{panel_id}.isOpen")
}

/// Durable key/value storage for UI preferences.
///
/// Shared between panels, so implementations take `&self` and synchronise
/// internally. An absent key is `Ok(None)`, never an error.
pub trait Persister {
    fn get_value(&self, key: &str) -> PanelResult<Option<Value>>;

    fn set_value(&self, key: &str, value: Value) -> PanelResult<()>;
}

/// Typed access on top of [`Persister`].
pub trait PersisterExt: Persister {
    /// Read a value, decoding it as `T`.
    fn get<T: DeserializeOwned>(&self, key: &str) -> PanelResult<Option<T>> {
        match self.get_value(key)? {
            Some(value) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| PanelError::PersistenceError(format!("{key}: {e}"))),
            None => Ok(None),
        }
    }

    /// Encode and write a value.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> PanelResult<()> {
        let value = serde_json::to_value(value)
            .map_err(|e| PanelError::PersistenceError(format!("{key}: {e}")))?;
        self.set_value(key, value)
    }
}

impl<P: Persister + ?Sized> PersisterExt for P {}

/// In-memory persister, used when no durable store is available.
#[derive(Debug, Default)]
pub struct MemoryPersister {
    values: Mutex<HashMap<String, Value>>,
}

impl MemoryPersister {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Persister for MemoryPersister {
    fn get_value(&self, key: &str) -> PanelResult<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: Value) -> PanelResult<()> {
        self.values.lock().insert(key.to_owned(), value);
        Ok(())
    }
}

/// Persister backed by a single JSON object on disk.
///
/// Every `set` rewrites the file.
#[derive(Debug)]
pub struct JsonFilePersister {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFilePersister {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> PanelResult<Self> {
        let path = path.into();
        let values = if path.exists() {
            let json = fs::read_to_string(&path).map_err(|e| {
                PanelError::PersistenceError(format!("failed to read {}: {e}", path.display()))
            })?;
            deserialize_state(&json)?
        } else {
            Map::new()
        };
        Ok(Self { path, values: Mutex::new(values) })
    }

    /// Open the store at the default location.
    pub fn open_default() -> PanelResult<Self> {
        Self::open(state_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persister for JsonFilePersister {
    fn get_value(&self, key: &str) -> PanelResult<Option<Value>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: Value) -> PanelResult<()> {
        let mut values = self.values.lock();
        values.insert(key.to_owned(), value);
        let json = serde_json::to_string_pretty(&*values)
            .map_err(|e| PanelError::PersistenceError(e.to_string()))?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn deserialize_state(json: &str) -> PanelResult<Map<String, Value>> {
    if json.trim().is_empty() {
        return Ok(Map::new());
    }
    serde_json::from_str(json).map_err(|e| PanelError::PersistenceError(e.to_string()))
}

/// Default location of the persisted state file.
pub fn state_file() -> PathBuf {
    dirs_or_default().join("state.json")
}

fn dirs_or_default() -> PathBuf {
    dirs_data().unwrap_or_else(|| std::env::temp_dir().join("dirpane"))
}

fn dirs_data() -> Option<PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")))
        .map(|d| d.join("dirpane"))
}
