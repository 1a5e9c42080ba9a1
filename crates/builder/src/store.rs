//! Persistence for section records.

use std::{
    collections::HashMap,
    fmt,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use async_trait::async_trait;
use preview::{SectionConfig, SectionKind};
use serde::{Deserialize, Serialize};
use tempfile::Builder as TempBuilder;
use tokio::{fs, task, time::sleep};
use tracing::debug;

use crate::{Error, Result};

/// Identifier a section is stored under, e.g. `HeroSection`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectionId(String);

impl SectionId {
    /// Validate and wrap an id. Only `[A-Za-z0-9_-]` is allowed.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(Self(id))
        } else {
            Err(Error::InvalidSectionId(id))
        }
    }

    /// The id as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The built-in kind for this id, if it names one.
    pub fn kind(&self) -> Option<SectionKind> {
        SectionKind::from_section_id(&self.0)
    }
}

impl From<SectionKind> for SectionId {
    fn from(kind: SectionKind) -> Self {
        Self(kind.section_id().to_string())
    }
}

impl TryFrom<String> for SectionId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<SectionId> for String {
    fn from(id: SectionId) -> Self {
        id.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted section: its config, source and optional custom CSS.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredSection {
    /// Section config.
    #[serde(default)]
    pub config: SectionConfig,
    /// Component source.
    #[serde(default)]
    pub code: String,
    /// Custom CSS attached to the section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

/// Load and save section records.
#[async_trait]
pub trait SectionStore: Send + Sync {
    /// Load the record stored under `id`.
    async fn load(&self, id: &SectionId) -> Result<StoredSection>;

    /// Replace the record stored under `id`.
    async fn save(&self, id: &SectionId, section: &StoredSection) -> Result<()>;

    /// Ids of every stored record, sorted.
    async fn list(&self) -> Result<Vec<SectionId>>;
}

/// One pretty-printed JSON file per section under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    /// Directory holding `<id>.json` files.
    root: PathBuf,
}

impl FsStore {
    /// A store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for `id`.
    pub fn path_for(&self, id: &SectionId) -> PathBuf {
        self.root.join(format!("{}.json", id.as_str()))
    }
}

#[async_trait]
impl SectionStore for FsStore {
    async fn load(&self, id: &SectionId) -> Result<StoredSection> {
        let path = self.path_for(id);
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        let section = serde_json::from_str(&text)?;
        debug!(path = %path.display(), "loaded section");
        Ok(section)
    }

    async fn save(&self, id: &SectionId, section: &StoredSection) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        let path = self.path_for(id);
        let mut text = serde_json::to_string_pretty(section)?;
        text.push('\n');

        // Each save writes its own temp file, so concurrent saves of one id never share a path.
        let root = self.root.clone();
        let prefix = format!(".{}.", id.as_str());
        let target = path.clone();
        task::spawn_blocking(move || -> Result<()> {
            let mut tmp = TempBuilder::new()
                .prefix(&prefix)
                .suffix(".json.tmp")
                .tempfile_in(&root)?;
            tmp.write_all(text.as_bytes())?;
            tmp.persist(&target).map_err(|e| e.error)?;
            Ok(())
        })
        .await??;
        debug!(path = %path.display(), "saved section");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SectionId>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| SectionId::new(s).ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Lock a mutex, recovering the data if a holder panicked.
fn lock_unpoisoned<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory store with optional per-section load latency.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// Stored records.
    sections: Mutex<HashMap<SectionId, StoredSection>>,
    /// Artificial load latency per id.
    latency: Mutex<HashMap<SectionId, Duration>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly.
    pub fn insert(&self, id: SectionId, section: StoredSection) {
        lock_unpoisoned(&self.sections).insert(id, section);
    }

    /// Delay every load of `id` by `delay`.
    pub fn set_latency(&self, id: SectionId, delay: Duration) {
        lock_unpoisoned(&self.latency).insert(id, delay);
    }

    /// The record stored under `id`, without latency.
    pub fn get(&self, id: &SectionId) -> Option<StoredSection> {
        lock_unpoisoned(&self.sections).get(id).cloned()
    }
}

#[async_trait]
impl SectionStore for MemoryStore {
    async fn load(&self, id: &SectionId) -> Result<StoredSection> {
        let delay = lock_unpoisoned(&self.latency).get(id).copied();
        if let Some(delay) = delay {
            sleep(delay).await;
        }
        self.get(id).ok_or_else(|| Error::NotFound(id.to_string()))
    }

    async fn save(&self, id: &SectionId, section: &StoredSection) -> Result<()> {
        self.insert(id.clone(), section.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<SectionId>> {
        let mut ids: Vec<SectionId> = lock_unpoisoned(&self.sections).keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
