use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::{round_for_display, MAX_AMOUNT};
use crate::modules::ledger::models::{CashBook, NewLedgerEntry, Payer};

/// Structured ledger entry as returned by the extraction model
///
/// Field names follow the JSON the model is instructed to produce. Any
/// extra or missing field makes the reply plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedEntry {
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "quemPagou")]
    pub payer: Payer,
    #[serde(rename = "tipoCaixa")]
    pub cash_book: CashBook,
}

impl ExtractedEntry {
    /// Positive once rounded to centavos, storable, and described
    pub fn is_usable(&self) -> bool {
        let amount = round_for_display(self.amount);
        amount > Decimal::ZERO && amount <= MAX_AMOUNT && !self.description.trim().is_empty()
    }

    /// Candidate for the ledger, with the amount rounded to centavos
    pub fn into_new_entry(self) -> NewLedgerEntry {
        NewLedgerEntry {
            amount: round_for_display(self.amount),
            description: self.description.trim().to_string(),
            payer: self.payer,
            cash_book: self.cash_book,
        }
    }
}

/// Ledger entry extracted from chat, waiting for the user to confirm it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub id: String,
    pub entry: NewLedgerEntry,
}
