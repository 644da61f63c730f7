use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::catalogs::models::{CatalogEntry, ExpenseKind};

/// Storage for the fixed and variable expense catalogs
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Entries ordered by supplier, optionally restricted to one catalog
    async fn list(&self, kind: Option<ExpenseKind>) -> Result<Vec<CatalogEntry>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<CatalogEntry>>;

    async fn create(&self, entry: &CatalogEntry) -> Result<()>;

    /// Returns false when no entry has that id
    async fn update(&self, entry: &CatalogEntry) -> Result<bool>;

    /// Returns false when no entry has that id
    async fn delete(&self, id: &str) -> Result<bool>;
}

#[derive(Debug, FromRow)]
struct CatalogRow {
    id: String,
    supplier: String,
    amount: Decimal,
    kind: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CatalogRow> for CatalogEntry {
    type Error = AppError;

    fn try_from(row: CatalogRow) -> Result<Self> {
        Ok(CatalogEntry {
            id: row.id,
            supplier: row.supplier,
            amount: row.amount,
            kind: row.kind.parse()?,
            created_at: row.created_at,
        })
    }
}

pub struct MySqlCatalogRepository {
    pool: MySqlPool,
}

impl MySqlCatalogRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for MySqlCatalogRepository {
    async fn list(&self, kind: Option<ExpenseKind>) -> Result<Vec<CatalogEntry>> {
        let rows = match kind {
            Some(kind) => {
                sqlx::query_as::<_, CatalogRow>(
                    r#"
                    SELECT id, supplier, amount, kind, created_at
                    FROM catalog_expenses
                    WHERE kind = ?
                    ORDER BY supplier ASC
                    "#,
                )
                .bind(kind.as_str())
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, CatalogRow>(
                    r#"
                    SELECT id, supplier, amount, kind, created_at
                    FROM catalog_expenses
                    ORDER BY supplier ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(CatalogEntry::try_from).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query_as::<_, CatalogRow>(
            r#"
            SELECT id, supplier, amount, kind, created_at
            FROM catalog_expenses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogEntry::try_from).transpose()
    }

    async fn create(&self, entry: &CatalogEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_expenses (id, supplier, amount, kind, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.supplier)
        .bind(entry.amount)
        .bind(entry.kind.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, entry: &CatalogEntry) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_expenses
            SET supplier = ?, amount = ?, kind = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.supplier)
        .bind(entry.amount)
        .bind(entry.kind.as_str())
        .bind(&entry.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM catalog_expenses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
