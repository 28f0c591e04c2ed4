// Catalog Store Port (Interface)

use crate::domain::{CatalogEntry, CatalogKind};
use crate::error::Result;
use async_trait::async_trait;

/// Catalog listing filter (one kind at a time)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub kind: CatalogKind,
    /// Case-insensitive substring of the name
    pub name_contains: Option<String>,
    pub is_active: Option<bool>,
}

impl CatalogFilter {
    pub fn new(kind: CatalogKind) -> Self {
        Self {
            kind,
            name_contains: None,
            is_active: None,
        }
    }

    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        entry.kind == self.kind
            && self.is_active.map_or(true, |a| entry.is_active == a)
            && self.name_contains.as_ref().map_or(true, |q| {
                entry.name.to_lowercase().contains(&q.to_lowercase())
            })
    }
}

/// Store interface for category and skill entries
///
/// Names are unique per kind ignoring case: `insert` and `update` fail with
/// `AppError::DuplicateEntity` when another entry of the same kind already has the name.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert(&self, entry: &CatalogEntry) -> Result<()>;

    async fn find_by_id(&self, kind: CatalogKind, id: &str) -> Result<Option<CatalogEntry>>;

    /// Exact name match ignoring case
    async fn find_by_name(&self, kind: CatalogKind, name: &str) -> Result<Option<CatalogEntry>>;

    /// Entries among `ids` that exist (unknown ids are simply absent)
    async fn find_by_ids(&self, kind: CatalogKind, ids: &[String]) -> Result<Vec<CatalogEntry>>;

    /// Matching entries, newest first
    async fn find_by_filter(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>>;

    /// Write name, active flag and `updated_at`; `false` when the entry does not exist
    async fn update(&self, entry: &CatalogEntry) -> Result<bool>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryCatalogStore {
        entries: Mutex<HashMap<(CatalogKind, String), CatalogEntry>>,
    }

    impl InMemoryCatalogStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert unconditionally (test setup)
        pub fn put(&self, entry: CatalogEntry) {
            self.entries
                .lock()
                .unwrap()
                .insert((entry.kind, entry.id.clone()), entry);
        }

        fn name_taken(
            entries: &HashMap<(CatalogKind, String), CatalogEntry>,
            entry: &CatalogEntry,
        ) -> bool {
            entries
                .values()
                .any(|e| e.kind == entry.kind && e.id != entry.id && e.has_name(&entry.name))
        }
    }

    #[async_trait]
    impl CatalogStore for InMemoryCatalogStore {
        async fn insert(&self, entry: &CatalogEntry) -> Result<()> {
            let mut entries = self.entries.lock().unwrap();
            let key = (entry.kind, entry.id.clone());
            if entries.contains_key(&key) || Self::name_taken(&entries, entry) {
                return Err(AppError::DuplicateEntity(format!(
                    "{} {}",
                    entry.kind, entry.name
                )));
            }
            entries.insert(key, entry.clone());
            Ok(())
        }

        async fn find_by_id(&self, kind: CatalogKind, id: &str) -> Result<Option<CatalogEntry>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .get(&(kind, id.to_string()))
                .cloned())
        }

        async fn find_by_name(
            &self,
            kind: CatalogKind,
            name: &str,
        ) -> Result<Option<CatalogEntry>> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .values()
                .find(|e| e.kind == kind && e.has_name(name))
                .cloned())
        }

        async fn find_by_ids(
            &self,
            kind: CatalogKind,
            ids: &[String],
        ) -> Result<Vec<CatalogEntry>> {
            let entries = self.entries.lock().unwrap();
            Ok(ids
                .iter()
                .filter_map(|id| entries.get(&(kind, id.clone())).cloned())
                .collect())
        }

        async fn find_by_filter(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>> {
            let mut found: Vec<CatalogEntry> = self
                .entries
                .lock()
                .unwrap()
                .values()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(found)
        }

        async fn update(&self, entry: &CatalogEntry) -> Result<bool> {
            let mut entries = self.entries.lock().unwrap();
            if Self::name_taken(&entries, entry) {
                return Err(AppError::DuplicateEntity(format!(
                    "{} {}",
                    entry.kind, entry.name
                )));
            }
            match entries.get_mut(&(entry.kind, entry.id.clone())) {
                Some(stored) => {
                    stored.name = entry.name.clone();
                    stored.is_active = entry.is_active;
                    stored.updated_at = entry.updated_at;
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}
