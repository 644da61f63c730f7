use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::closings::models::{
    ClosingContext, ClosingRecord, ClosingResult, FranchiseId,
};

/// Storage for monthly closings, one record per franchise/month/year
#[async_trait]
pub trait ClosingRepository: Send + Sync {
    /// Insert or replace the closing for `context`
    async fn upsert(&self, context: &ClosingContext, result: &ClosingResult) -> Result<()>;

    /// Load the closing stored for `context`, if any
    async fn find(&self, context: &ClosingContext) -> Result<Option<ClosingRecord>>;

    /// All closings of a franchise, oldest first
    async fn list_by_franchise(&self, franchise: &FranchiseId) -> Result<Vec<ClosingRecord>>;
}

#[derive(Debug, FromRow)]
struct ClosingRow {
    franchise_id: String,
    reference_month: u8,
    reference_year: u16,
    result: Json<ClosingResult>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClosingRow> for ClosingRecord {
    type Error = AppError;

    fn try_from(row: ClosingRow) -> Result<Self> {
        let context = ClosingContext::new(
            FranchiseId::new(&row.franchise_id),
            u32::from(row.reference_month),
            i32::from(row.reference_year),
        )?;
        Ok(ClosingRecord {
            context,
            result: row.result.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct MySqlClosingRepository {
    pool: MySqlPool,
}

impl MySqlClosingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClosingRepository for MySqlClosingRepository {
    async fn upsert(&self, context: &ClosingContext, result: &ClosingResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO monthly_closings (franchise_id, reference_month, reference_year, result)
            VALUES (?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE result = VALUES(result), updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(context.franchise.as_str())
        .bind(context.month)
        .bind(context.year)
        .bind(Json(result))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, context: &ClosingContext) -> Result<Option<ClosingRecord>> {
        let row = sqlx::query_as::<_, ClosingRow>(
            r#"
            SELECT franchise_id, reference_month, reference_year, result, created_at, updated_at
            FROM monthly_closings
            WHERE franchise_id = ? AND reference_month = ? AND reference_year = ?
            "#,
        )
        .bind(context.franchise.as_str())
        .bind(context.month)
        .bind(context.year)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ClosingRecord::try_from).transpose()
    }

    async fn list_by_franchise(&self, franchise: &FranchiseId) -> Result<Vec<ClosingRecord>> {
        let rows = sqlx::query_as::<_, ClosingRow>(
            r#"
            SELECT franchise_id, reference_month, reference_year, result, created_at, updated_at
            FROM monthly_closings
            WHERE franchise_id = ?
            ORDER BY reference_year ASC, reference_month ASC
            "#,
        )
        .bind(franchise.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ClosingRecord::try_from).collect()
    }
}
