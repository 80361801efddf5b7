//! Session storage
//!
//! The console keeps its session in a flat string key-value store: `token`
//! holds the credential, `user` the serialized profile. The guard only ever
//! reads a snapshot; login and logout write through the helpers below.

use crate::error::{AccessError, Result};
use facility_access_types::{SessionSnapshot, UserProfile, TOKEN_KEY, USER_KEY};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value session storage
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;

    /// Remove every key
    fn clear(&self) -> Result<()>;
}

/// Read the current session from a store
pub fn read_session(store: &dyn SessionStore) -> Result<SessionSnapshot> {
    let token = store.get(TOKEN_KEY)?;
    let user = store.get(USER_KEY)?;
    Ok(SessionSnapshot::from_raw(token, user.as_deref()))
}

/// Persist a freshly established session
pub fn establish_session(
    store: &dyn SessionStore,
    token: &str,
    profile: &UserProfile,
) -> Result<()> {
    let user = serde_json::to_string(profile)?;
    store.set(TOKEN_KEY, token)?;
    store.set(USER_KEY, &user)?;
    debug!("Session established");
    Ok(())
}

/// Destroy the current session
pub fn clear_session(store: &dyn SessionStore) -> Result<()> {
    store.remove(TOKEN_KEY)?;
    store.remove(USER_KEY)?;
    debug!("Session cleared");
    Ok(())
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Session store persisted as a JSON object of string values
///
/// The file is re-read on every access so that other processes writing the
/// same file are observed. A missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileSessionStore {
    path: PathBuf,
    write_lock: RwLock<()>,
}

impl JsonFileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(AccessError::store(self.path.display().to_string(), e)),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let key = self.path.display().to_string();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AccessError::store(&key, e))?;
        }
        let body = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, body).map_err(|e| AccessError::store(key, e))
    }

    fn update(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self.write_lock.write();
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl SessionStore for JsonFileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.write_lock.read();
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.update(BTreeMap::clear)
    }
}
