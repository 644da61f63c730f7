// Expense inputs of a closing: the fixed and variable catalogs loaded at
// closing start plus the one-off ("esporadico") entries typed by the user.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supplier-name token that marks a variable expense as charged in full
const FULL_CHARGE_TOKEN: &str = "boleto";

/// Fixed ("padrao") expense, prorated by the participation percentage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub supplier: String,
    pub amount: Decimal,
}

impl ExpenseEntry {
    pub fn new(supplier: impl Into<String>, amount: Decimal) -> Self {
        Self {
            supplier: supplier.into(),
            amount,
        }
    }
}

/// Per-unit expense multiplied by a quantity given at closing time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableExpenseEntry {
    pub supplier: String,
    pub unit_amount: Decimal,
}

impl VariableExpenseEntry {
    pub fn new(supplier: impl Into<String>, unit_amount: Decimal) -> Self {
        Self {
            supplier: supplier.into(),
            unit_amount,
        }
    }

    /// Boleto lines are charged in full and never prorated
    pub fn is_full_charge(&self) -> bool {
        self.supplier.to_lowercase().contains(FULL_CHARGE_TOKEN)
    }
}

/// One-off expense collected during the closing conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdHocExpenseEntry {
    pub description: String,
    pub amount: Decimal,
}

impl AdHocExpenseEntry {
    pub fn new(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount,
        }
    }
}

/// Catalog snapshot a closing starts from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClosingCatalog {
    pub fixed_entries: Vec<ExpenseEntry>,
    pub variable_entries: Vec<VariableExpenseEntry>,
}
