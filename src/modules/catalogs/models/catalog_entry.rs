use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::money::{validate_non_negative, validate_storable};
use crate::core::{AppError, Result};
use crate::modules::closings::models::{ExpenseEntry, VariableExpenseEntry};

/// Which catalog an expense belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseKind {
    /// Recurring monthly cost ("padrao"), prorated
    Fixed,
    /// Per-unit cost multiplied by a monthly quantity
    Variable,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Variable => "variable",
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExpenseKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" | "padrao" => Ok(Self::Fixed),
            "variable" | "variavel" => Ok(Self::Variable),
            _ => Err(AppError::validation(format!("Invalid expense kind: {}", s))),
        }
    }
}

/// A stored catalog expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub supplier: String,
    pub amount: Decimal,
    pub kind: ExpenseKind,
    pub created_at: DateTime<Utc>,
}

impl CatalogEntry {
    pub fn to_expense_entry(&self) -> ExpenseEntry {
        ExpenseEntry::new(self.supplier.clone(), self.amount)
    }

    pub fn to_variable_entry(&self) -> VariableExpenseEntry {
        VariableExpenseEntry::new(self.supplier.clone(), self.amount)
    }
}

/// Create/update payload for a catalog expense
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntryRequest {
    pub supplier: String,
    pub amount: Decimal,
    pub kind: ExpenseKind,
}

impl CatalogEntryRequest {
    /// Validate and build a new entry with a fresh id
    pub fn into_entry(self) -> Result<CatalogEntry> {
        let supplier = self.validated_supplier()?;
        Ok(CatalogEntry {
            id: Uuid::new_v4().to_string(),
            supplier,
            amount: self.amount,
            kind: self.kind,
            created_at: Utc::now(),
        })
    }

    /// Validate and apply onto an existing entry, keeping id and creation time
    pub fn apply_to(self, existing: &CatalogEntry) -> Result<CatalogEntry> {
        let supplier = self.validated_supplier()?;
        Ok(CatalogEntry {
            id: existing.id.clone(),
            supplier,
            amount: self.amount,
            kind: self.kind,
            created_at: existing.created_at,
        })
    }

    fn validated_supplier(&self) -> Result<String> {
        let supplier = self.supplier.trim();
        if supplier.is_empty() {
            return Err(AppError::validation("Supplier cannot be empty"));
        }
        if supplier.chars().count() > 255 {
            return Err(AppError::validation(
                "Supplier cannot exceed 255 characters",
            ));
        }
        validate_non_negative("Amount", self.amount).map_err(AppError::Validation)?;
        validate_storable("Amount", self.amount).map_err(AppError::Validation)?;
        Ok(supplier.to_string())
    }
}
