// SQLite CatalogStore Implementation

use crate::error::{corrupt_row, map_sqlx_error};
use async_trait::async_trait;
use hireflow_core::domain::{CatalogEntry, CatalogKind};
use hireflow_core::error::Result;
use hireflow_core::port::{CatalogFilter, CatalogStore};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn insert(&self, entry: &CatalogEntry) -> Result<()> {
        // ux_catalog_entries_name turns a case-insensitive clash into DuplicateEntity
        sqlx::query(
            r#"
            INSERT INTO catalog_entries (kind, id, name, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.kind.as_str())
        .bind(&entry.id)
        .bind(&entry.name)
        .bind(entry.is_active)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, kind: CatalogKind, id: &str) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query_as::<_, CatalogRow>(
            "SELECT * FROM catalog_entries WHERE kind = ? AND id = ?",
        )
        .bind(kind.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(CatalogRow::into_entry).transpose()
    }

    async fn find_by_name(&self, kind: CatalogKind, name: &str) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query_as::<_, CatalogRow>(
            "SELECT * FROM catalog_entries WHERE kind = ? AND lower(name) = lower(?)",
        )
        .bind(kind.as_str())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(CatalogRow::into_entry).transpose()
    }

    async fn find_by_ids(&self, kind: CatalogKind, ids: &[String]) -> Result<Vec<CatalogEntry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM catalog_entries WHERE kind = ");
        qb.push_bind(kind.as_str());
        qb.push(" AND id IN (");
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows: Vec<CatalogRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(CatalogRow::into_entry).collect()
    }

    async fn find_by_filter(&self, filter: &CatalogFilter) -> Result<Vec<CatalogEntry>> {
        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM catalog_entries WHERE kind = ");
        qb.push_bind(filter.kind.as_str());
        if let Some(is_active) = filter.is_active {
            qb.push(" AND is_active = ");
            qb.push_bind(is_active);
        }
        if let Some(query) = &filter.name_contains {
            // instr, not LIKE: '%' and '_' in the query are literal
            qb.push(" AND instr(lower(name), lower(");
            qb.push_bind(query.clone());
            qb.push(")) > 0");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<CatalogRow> = qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(CatalogRow::into_entry).collect()
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_entries
            SET name = ?, is_active = ?, updated_at = ?
            WHERE kind = ? AND id = ?
            "#,
        )
        .bind(&entry.name)
        .bind(entry.is_active)
        .bind(entry.updated_at)
        .bind(entry.kind.as_str())
        .bind(&entry.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct CatalogRow {
    kind: String,
    id: String,
    name: String,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl CatalogRow {
    fn into_entry(self) -> Result<CatalogEntry> {
        let kind: CatalogKind = self
            .kind
            .parse()
            .map_err(|e| corrupt_row("catalog_entries", &self.id, e))?;

        Ok(CatalogEntry {
            id: self.id,
            kind,
            name: self.name,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
