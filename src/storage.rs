use crate::avatar::DEFAULT_AVATAR;
use crate::errors::DiaryError;
use crate::models::Record;
use std::{
    collections::HashMap,
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};
use tracing::error;

pub const RECORDS_KEY: &str = "diary_records";
pub const AVATAR_KEY: &str = "diary_avatar";

/// Keyed string blobs. Each key is read and written as a whole.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Stores each key as a file named after it inside `dir`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key: {key:?}"),
            ));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Missing or malformed data loads as an empty diary.
pub fn load_records(backend: &dyn KeyValueStore) -> Vec<Record> {
    match backend.get(RECORDS_KEY) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                error!("failed to parse records blob: {err}");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(err) => {
            error!("failed to read records blob: {err}");
            Vec::new()
        }
    }
}

pub fn load_avatar(backend: &dyn KeyValueStore) -> String {
    match backend.get(AVATAR_KEY) {
        Ok(Some(avatar)) if !avatar.trim().is_empty() => avatar,
        Ok(_) => DEFAULT_AVATAR.to_string(),
        Err(err) => {
            error!("failed to read avatar blob: {err}");
            DEFAULT_AVATAR.to_string()
        }
    }
}

pub fn persist_records(backend: &dyn KeyValueStore, records: &[Record]) -> Result<(), DiaryError> {
    let payload = serde_json::to_string_pretty(records)?;
    backend.set(RECORDS_KEY, &payload)?;
    Ok(())
}
