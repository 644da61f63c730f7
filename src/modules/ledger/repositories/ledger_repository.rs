use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySqlPool};

use crate::core::{AppError, Result};
use crate::modules::ledger::models::{CashBook, LedgerEntry};

/// Storage for ledger entries
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    async fn insert(&self, entry: &LedgerEntry) -> Result<()>;

    /// Entries of one cash book, newest first
    async fn list_by_cash_book(&self, cash_book: CashBook) -> Result<Vec<LedgerEntry>>;
}

#[derive(Debug, FromRow)]
struct LedgerRow {
    id: String,
    amount: Decimal,
    description: String,
    payer: String,
    cash_book: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = AppError;

    fn try_from(row: LedgerRow) -> Result<Self> {
        Ok(LedgerEntry {
            id: row.id,
            amount: row.amount,
            description: row.description,
            payer: row.payer.parse()?,
            cash_book: row.cash_book.parse()?,
            created_at: row.created_at,
        })
    }
}

pub struct MySqlLedgerRepository {
    pool: MySqlPool,
}

impl MySqlLedgerRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerRepository for MySqlLedgerRepository {
    async fn insert(&self, entry: &LedgerEntry) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ledger_entries (id, amount, description, payer, cash_book, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(entry.amount)
        .bind(&entry.description)
        .bind(entry.payer.as_str())
        .bind(entry.cash_book.as_str())
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_cash_book(&self, cash_book: CashBook) -> Result<Vec<LedgerEntry>> {
        let rows = sqlx::query_as::<_, LedgerRow>(
            r#"
            SELECT id, amount, description, payer, cash_book, created_at
            FROM ledger_entries
            WHERE cash_book = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(cash_book.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }
}
