//! Person directory
//!
//! Records live outside the core behind the [`PersonDirectory`] trait; the
//! pipeline only ever resolves names at call time and never caches identity
//! across calls. [`InMemoryDirectory`] is the reference implementation used
//! by the CLI (loaded from config) and by tests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DirectoryError, Result};
use crate::platform::Platform;

/// One person the author may mention with `@{Name}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Stable identifier, assigned at creation
    pub id: String,
    /// Primary lookup key
    pub name: String,
    /// Shown on platforms where no handle is configured
    pub display_name: String,
    /// Per-platform handles; stored with or without a leading `@`
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub bluesky: Option<String>,
    pub mastodon: Option<String>,
    /// When the record was created (Unix timestamp)
    pub created_at: i64,
}

impl PersonRecord {
    /// Create a new record with a generated id and no handles
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            display_name: display_name.into(),
            linkedin: None,
            twitter: None,
            bluesky: None,
            mastodon: None,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    /// The stored handle for a platform, if configured
    pub fn handle_for(&self, platform: Platform) -> Option<&str> {
        match platform {
            Platform::LinkedIn => self.linkedin.as_deref(),
            Platform::Twitter => self.twitter.as_deref(),
            Platform::Bluesky => self.bluesky.as_deref(),
            Platform::Mastodon => self.mastodon.as_deref(),
        }
    }
}

/// Injected repository of person records
///
/// Lookup semantics are defined here once: `name` matches take priority
/// over `display_name` matches, both case-insensitive, and within each pass
/// the first match in insertion order wins.
pub trait PersonDirectory: Send + Sync {
    /// Add a record; fails if the id is already present
    fn create(&mut self, record: PersonRecord) -> Result<()>;

    /// Fetch a record by id
    fn get(&self, id: &str) -> Option<PersonRecord>;

    /// Replace the record with the same id
    fn update(&mut self, record: PersonRecord) -> Result<()>;

    /// Remove a record entirely; nothing else references it
    fn delete(&mut self, id: &str) -> Result<()>;

    /// All records in insertion order
    fn all(&self) -> Vec<PersonRecord>;

    /// Case-insensitive lookup by `name`, then by `display_name`
    fn find_by_name(&self, name: &str) -> Option<PersonRecord> {
        let wanted = name.to_lowercase();
        let records = self.all();
        records
            .iter()
            .find(|r| r.name.to_lowercase() == wanted)
            .or_else(|| records.iter().find(|r| r.display_name.to_lowercase() == wanted))
            .cloned()
    }
}

/// Vec-backed directory preserving insertion order
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectory {
    records: Vec<PersonRecord>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from pre-existing records, keeping their order
    pub fn from_records(records: Vec<PersonRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PersonDirectory for InMemoryDirectory {
    fn create(&mut self, record: PersonRecord) -> Result<()> {
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(DirectoryError::DuplicateId(record.id).into());
        }
        self.records.push(record);
        Ok(())
    }

    fn get(&self, id: &str) -> Option<PersonRecord> {
        self.records.iter().find(|r| r.id == id).cloned()
    }

    fn update(&mut self, record: PersonRecord) -> Result<()> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(DirectoryError::NotFound(record.id).into()),
        }
    }

    fn delete(&mut self, id: &str) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return Err(DirectoryError::NotFound(id.to_string()).into());
        }
        Ok(())
    }

    fn all(&self) -> Vec<PersonRecord> {
        self.records.clone()
    }
}
