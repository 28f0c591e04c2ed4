// Category and skill catalog use cases

use crate::domain::validation::{require_text, validate_id};
use crate::domain::{CatalogEntry, CatalogKind, JobDetails};
use crate::error::{AppError, Result};
use crate::port::{CatalogFilter, CatalogStore, IdProvider, TimeProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

fn active_by_default() -> bool {
    true
}

/// Create-entry request (`category.create.v1`, `skill.create.v1`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCatalogEntryRequest {
    pub name: String,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCatalogEntryRequest {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

pub struct CatalogService {
    catalog: Arc<dyn CatalogStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
}

impl CatalogService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            catalog,
            id_provider,
            time_provider,
        }
    }

    /// Add a category or skill; the name is capitalized and must be new ignoring case
    pub async fn create_entry(
        &self,
        kind: CatalogKind,
        req: CreateCatalogEntryRequest,
    ) -> Result<CatalogEntry> {
        let entry = CatalogEntry::new(
            self.id_provider.generate_id(),
            self.time_provider.now_millis(),
            kind,
            &req.name,
            req.is_active,
        )?;
        if self.catalog.find_by_name(kind, &entry.name).await?.is_some() {
            return Err(already_exists(kind, &entry.name));
        }
        // The store's unique name index still catches a concurrent create
        self.catalog.insert(&entry).await?;
        info!(kind = %kind, id = %entry.id, name = %entry.name, "Catalog entry created");
        Ok(entry)
    }

    /// Rename and/or (de)activate an entry
    pub async fn update_entry(
        &self,
        kind: CatalogKind,
        req: UpdateCatalogEntryRequest,
    ) -> Result<CatalogEntry> {
        let mut entry = self.get_entry(kind, &req.id).await?;
        let now = self.time_provider.now_millis();

        if let Some(name) = &req.name {
            entry.rename(name, now)?;
            if let Some(other) = self.catalog.find_by_name(kind, &entry.name).await? {
                if other.id != entry.id {
                    return Err(already_exists(kind, &entry.name));
                }
            }
        }
        if let Some(is_active) = req.is_active {
            entry.set_active(is_active, now);
        }

        if !self.catalog.update(&entry).await? {
            return Err(AppError::not_found(kind.as_str(), &entry.id));
        }
        info!(
            kind = %kind,
            id = %entry.id,
            name = %entry.name,
            active = entry.is_active,
            "Catalog entry updated"
        );
        Ok(entry)
    }

    pub async fn get_entry(&self, kind: CatalogKind, id: &str) -> Result<CatalogEntry> {
        validate_id(kind.as_str(), id)?;
        self.catalog
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| AppError::not_found(kind.as_str(), id))
    }

    /// Exact lookup ignoring case; `None` when no entry has the name
    pub async fn get_by_name(&self, kind: CatalogKind, name: &str) -> Result<Option<CatalogEntry>> {
        let name = require_text(&format!("{} name", kind), name)?;
        self.catalog.find_by_name(kind, &name).await
    }

    pub async fn list_entries(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>> {
        self.catalog.find_by_filter(filter).await
    }

    /// Every category and skill id of `details` must resolve
    ///
    /// New references need an active entry. Ids already on `current` only need to exist, so a
    /// job keeps entries that were deactivated after it was posted.
    pub async fn ensure_job_references(
        &self,
        details: &JobDetails,
        current: Option<&JobDetails>,
    ) -> Result<()> {
        self.ensure_references(
            CatalogKind::Category,
            &details.categories,
            current.map(|d| d.categories.as_slice()).unwrap_or_default(),
        )
        .await?;
        self.ensure_references(
            CatalogKind::Skill,
            &details.skills,
            current.map(|d| d.skills.as_slice()).unwrap_or_default(),
        )
        .await
    }

    async fn ensure_references(
        &self,
        kind: CatalogKind,
        ids: &[String],
        kept: &[String],
    ) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self.catalog.find_by_ids(kind, ids).await?;
        let unresolved: Vec<&str> = ids
            .iter()
            .filter(|id| {
                !found
                    .iter()
                    .any(|e| &e.id == *id && (e.is_active || kept.contains(*id)))
            })
            .map(String::as_str)
            .collect();

        if unresolved.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "unknown or inactive {} id(s): {}",
                kind,
                unresolved.join(", ")
            )))
        }
    }
}

fn already_exists(kind: CatalogKind, name: &str) -> AppError {
    AppError::DuplicateEntity(format!("{} '{}' already exists", kind, name))
}
