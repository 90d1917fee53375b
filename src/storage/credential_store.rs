use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::Url;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::domain::Credential;

/// Persistent home of the bearer credential
///
/// Read by the session gate and every privileged request, written only by
/// the credential issuer.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Result<Option<Credential>>;
    fn set(&self, credential: &Credential) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// File-backed store of named entries, one file per service origin
pub struct FileCredentialStore {
    path: PathBuf,
    key: String,
}

impl FileCredentialStore {
    /// Create a store for the origin of `base_url` under `dir`
    pub fn for_origin<P: AsRef<Path>>(dir: P, base_url: &str, key: &str) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).context("Failed to create credential storage directory")?;

        let slug = origin_slug(base_url)?;
        Ok(Self {
            path: dir.join(format!("{}.json", slug)),
            key: key.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // --- Helper Methods ---

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let json = fs::read_to_string(&self.path).context("Failed to read credential storage")?;
        let value: Value = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse credential storage {:?}", self.path))?;

        match value {
            Value::Object(entries) => Ok(entries),
            _ => anyhow::bail!("Credential storage {:?} is not a JSON object", self.path),
        }
    }

    /// Entries to update; unreadable storage is replaced rather than blocking writes
    fn entries_for_update(&self) -> Map<String, Value> {
        self.read_entries().unwrap_or_else(|e| {
            warn!("Discarding unreadable credential storage: {:?}", e);
            Map::new()
        })
    }

    /// Writes a sibling temp file and renames it over the storage file
    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, json).context("Failed to write credential storage")?;
        fs::rename(&temp_path, &self.path).context("Failed to replace credential storage")?;
        Ok(())
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        let entries = self.read_entries()?;
        let token = entries
            .get(&self.key)
            .and_then(Value::as_str)
            .map(Credential::new);
        debug!("Credential present in {}: {}", self.path.display(), token.is_some());
        Ok(token)
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        let mut entries = self.entries_for_update();
        entries.insert(self.key.clone(), Value::String(credential.as_str().to_string()));
        self.write_entries(&entries)?;
        info!("Stored credential in {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Resetting unreadable credential storage: {:?}", e);
                return self.write_entries(&Map::new());
            }
        };

        if entries.remove(&self.key).is_some() {
            self.write_entries(&entries)?;
            info!("Cleared credential from {}", self.path.display());
        }
        Ok(())
    }
}

/// In-process store; nothing survives the process
#[derive(Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
    writes: Mutex<usize>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
            writes: Mutex::new(0),
        }
    }

    /// Number of `set` calls so far
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Result<Option<Credential>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, credential: &Credential) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(credential.clone());
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// File-name-safe form of a URL's origin: `https://elo.example.com:8000/x`
/// becomes `https_elo.example.com_8000`
pub fn origin_slug(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid service URL: {}", base_url))?;
    let host = url
        .host_str()
        .with_context(|| format!("Service URL has no host: {}", base_url))?;

    let slug = match url.port_or_known_default() {
        Some(port) => format!("{}_{}_{}", url.scheme(), host, port),
        None => format!("{}_{}", url.scheme(), host),
    };

    Ok(slug
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' { c } else { '_' })
        .collect())
}
