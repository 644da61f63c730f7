use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_entry::{CashBook, LedgerEntry, Payer};
use crate::core::money::format_brl;

/// Differences below one centavo count as settled
const SETTLED_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Who owes whom after comparing what each payer spent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Settlement {
    Settled,
    Owes {
        debtor: Payer,
        creditor: Payer,
        amount: Decimal,
    },
}

impl Settlement {
    pub fn describe(&self) -> String {
        match self {
            Settlement::Settled => "Contas em dia".to_string(),
            Settlement::Owes {
                debtor,
                creditor,
                amount,
            } => format!("{} deve {} para {}", debtor, format_brl(*amount), creditor),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerBalance {
    pub cash_book: CashBook,
    pub total_allyson: Decimal,
    pub total_gabriel: Decimal,
    pub settlement: Settlement,
    pub summary: String,
}

impl LedgerBalance {
    /// Totals per payer; whoever paid less owes the other the difference
    pub fn from_entries(cash_book: CashBook, entries: &[LedgerEntry]) -> Self {
        let total_for = |payer: Payer| -> Decimal {
            entries
                .iter()
                .filter(|entry| entry.payer == payer)
                .map(|entry| entry.amount)
                .sum()
        };
        let total_allyson = total_for(Payer::Allyson);
        let total_gabriel = total_for(Payer::Gabriel);
        let diff = total_allyson - total_gabriel;

        let settlement = if diff.abs() < SETTLED_TOLERANCE {
            Settlement::Settled
        } else if diff > Decimal::ZERO {
            Settlement::Owes {
                debtor: Payer::Gabriel,
                creditor: Payer::Allyson,
                amount: diff,
            }
        } else {
            Settlement::Owes {
                debtor: Payer::Allyson,
                creditor: Payer::Gabriel,
                amount: diff.abs(),
            }
        };
        let summary = settlement.describe();

        Self {
            cash_book,
            total_allyson,
            total_gabriel,
            settlement,
            summary,
        }
    }
}
