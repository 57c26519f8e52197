//! Durable storage for the session record.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use super::{Result, SessionError};

/// Fixed storage key for the session record.
pub const SESSION_STORAGE_KEY: &str = "huddle_tokens";

/// Raw record storage. Implementations hold a single record under
/// [`SESSION_STORAGE_KEY`].
pub trait TokenStore: Send + Sync {
    /// Read the stored record, `None` if nothing has been written yet.
    fn load(&self) -> Result<Option<String>>;

    /// Overwrite the stored record.
    fn save(&self, record: &str) -> Result<()>;
}

/// JSON file store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config dir>/huddle/huddle_tokens.json`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(SessionError::NoConfigDir)?;
        Ok(base
            .join("huddle")
            .join(format!("{SESSION_STORAGE_KEY}.json")))
    }

    /// Store at [`FileTokenStore::default_path`].
    pub fn at_default_path() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a truncated record.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, record)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a record.
    pub fn with_record(record: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(record.into()))),
        }
    }

    /// Current raw record.
    pub fn record(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.record())
    }

    fn save(&self, record: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(record.to_string());
        Ok(())
    }
}
