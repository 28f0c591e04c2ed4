// Category / Skill Catalog Domain Model
// Named entries jobs reference by id

use crate::domain::error::{DomainError, Result};
use crate::domain::job::normalize_title;
use crate::domain::validation::{require_text, validate_id};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum catalog entry name length
pub const MAX_CATALOG_NAME_LEN: usize = 80;

/// Which catalog an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    Category,
    Skill,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Category, CatalogKind::Skill];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Category => "category",
            CatalogKind::Skill => "skill",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalogKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self> {
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown catalog kind: {}", s)))
    }
}

/// Canonical display form of a catalog name ("machine LEARNING" -> "Machine Learning")
///
/// Names are unique per kind regardless of case, so the canonical form is also what the
/// duplicate guard compares (lowercased).
pub fn normalize_catalog_name(kind: CatalogKind, name: &str) -> Result<String> {
    let name = normalize_title(&require_text(&format!("{} name", kind), name)?);
    if name.chars().count() > MAX_CATALOG_NAME_LEN {
        return Err(DomainError::ValidationError(format!(
            "{} name too long (max {} chars)",
            kind, MAX_CATALOG_NAME_LEN
        )));
    }
    Ok(name)
}

/// Category or skill entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub kind: CatalogKind,
    pub name: String,
    /// Inactive entries stay resolvable for stored jobs but cannot be newly referenced
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CatalogEntry {
    pub fn new(
        id: impl Into<String>,
        created_at: i64,
        kind: CatalogKind,
        name: &str,
        is_active: bool,
    ) -> Result<Self> {
        let id = id.into();
        validate_id(kind.as_str(), &id)?;
        Ok(Self {
            id,
            kind,
            name: normalize_catalog_name(kind, name)?,
            is_active,
            created_at,
            updated_at: created_at,
        })
    }

    pub fn rename(&mut self, name: &str, now_millis: i64) -> Result<()> {
        self.name = normalize_catalog_name(self.kind, name)?;
        self.updated_at = now_millis;
        Ok(())
    }

    pub fn set_active(&mut self, is_active: bool, now_millis: i64) {
        self.is_active = is_active;
        self.updated_at = now_millis;
    }

    /// Case-insensitive name comparison used by the duplicate guard
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
