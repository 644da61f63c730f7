use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::money::validate_storable;
use crate::core::{AppError, Result};

/// Who paid an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Payer {
    Allyson,
    Gabriel,
}

impl Payer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allyson => "Allyson",
            Self::Gabriel => "Gabriel",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::Allyson => Self::Gabriel,
            Self::Gabriel => Self::Allyson,
        }
    }
}

impl std::fmt::Display for Payer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Payer {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "allyson" => Ok(Self::Allyson),
            "gabriel" => Ok(Self::Gabriel),
            _ => Err(AppError::validation(format!("Invalid payer: {}", s))),
        }
    }
}

/// Cash book ("caixa") an entry is booked into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CashBook {
    Atlas,
    Franquia,
    Pessoal,
}

impl CashBook {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atlas => "Atlas",
            Self::Franquia => "Franquia",
            Self::Pessoal => "Pessoal",
        }
    }
}

impl std::fmt::Display for CashBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CashBook {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "atlas" => Ok(Self::Atlas),
            "franquia" => Ok(Self::Franquia),
            "pessoal" => Ok(Self::Pessoal),
            _ => Err(AppError::validation(format!("Invalid cash book: {}", s))),
        }
    }
}

/// A recorded ledger entry ("lancamento")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: String,
    pub amount: Decimal,
    pub description: String,
    pub payer: Payer,
    pub cash_book: CashBook,
    pub created_at: DateTime<Utc>,
}

/// Entry to be recorded, typed by the user or extracted from chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub amount: Decimal,
    pub description: String,
    pub payer: Payer,
    pub cash_book: CashBook,
}

impl NewLedgerEntry {
    /// Amount must be positive and the description non-blank
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Amount must be positive, got: {}",
                self.amount
            )));
        }
        validate_storable("Amount", self.amount).map_err(AppError::Validation)?;
        if self.description.trim().is_empty() {
            return Err(AppError::validation("Description cannot be empty"));
        }
        if self.description.trim().chars().count() > 255 {
            return Err(AppError::validation(
                "Description cannot exceed 255 characters",
            ));
        }
        Ok(())
    }

    pub fn into_entry(self) -> Result<LedgerEntry> {
        self.validate()?;
        Ok(LedgerEntry {
            id: Uuid::new_v4().to_string(),
            amount: self.amount,
            description: self.description.trim().to_string(),
            payer: self.payer,
            cash_book: self.cash_book,
            created_at: Utc::now(),
        })
    }
}
