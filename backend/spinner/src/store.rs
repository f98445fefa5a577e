use std::{
    fs::{create_dir_all, read_to_string, rename, write},
    io::ErrorKind,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to write cooldown state: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode cooldown state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The single persisted slot: the last spin instant in epoch milliseconds.
pub trait CooldownStore {
    fn load(&self) -> Option<i64>;

    fn save(&mut self, last_spin_ms: i64) -> Result<(), StoreError>;
}

#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    last_spin_ms: Option<i64>,
}

impl MemoryStore {
    pub fn with_last_spin(last_spin_ms: i64) -> Self {
        Self {
            last_spin_ms: Some(last_spin_ms),
        }
    }
}

impl CooldownStore for MemoryStore {
    fn load(&self) -> Option<i64> {
        self.last_spin_ms
    }

    fn save(&mut self, last_spin_ms: i64) -> Result<(), StoreError> {
        self.last_spin_ms = Some(last_spin_ms);
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    last_spin_time: Option<i64>,
}

/// JSON file surviving across runs, `{"lastSpinTime": <ms>}`.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CooldownStore for FileStore {
    fn load(&self) -> Option<i64> {
        let contents = match read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Failed to read {}: {e}", self.path.display());
                return None;
            }
        };

        serde_json::from_str::<PersistedState>(&contents)
            .map_err(|e| {
                warn!("Ignoring corrupt cooldown state in {}: {e}", self.path.display());
            })
            .ok()
            .and_then(|state| state.last_spin_time)
    }

    fn save(&mut self, last_spin_ms: i64) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir_all(parent)?;
        }

        let state = PersistedState {
            last_spin_time: Some(last_spin_ms),
        };

        // a torn write must never leave the slot half written, so swap in a finished file
        let staging = self.staging_path();
        write(&staging, serde_json::to_vec(&state)?)?;
        rename(&staging, &self.path)?;

        Ok(())
    }
}
