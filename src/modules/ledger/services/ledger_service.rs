use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::money::round_for_display;
use crate::core::Result;
use crate::modules::closings::models::ClosingContext;
use crate::modules::ledger::models::{
    CashBook, LedgerBalance, LedgerEntry, NewLedgerEntry, Payer,
};
use crate::modules::ledger::repositories::LedgerRepository;

/// Payer of the franchisee share when a closing is confirmed
pub const CLOSING_PAYMENT_PAYER: Payer = Payer::Gabriel;
/// Cash book the franchisee share is booked into
pub const CLOSING_PAYMENT_CASH_BOOK: CashBook = CashBook::Pessoal;

pub struct LedgerService {
    ledger_repo: Arc<dyn LedgerRepository>,
}

impl LedgerService {
    pub fn new(ledger_repo: Arc<dyn LedgerRepository>) -> Self {
        Self { ledger_repo }
    }

    pub async fn record(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry> {
        let entry = new_entry.into_entry()?;
        self.ledger_repo.insert(&entry).await?;

        info!(
            id = %entry.id,
            amount = %entry.amount,
            payer = %entry.payer,
            cash_book = %entry.cash_book,
            "Ledger entry recorded"
        );

        Ok(entry)
    }

    pub async fn list(&self, cash_book: CashBook) -> Result<Vec<LedgerEntry>> {
        self.ledger_repo.list_by_cash_book(cash_book).await
    }

    /// Who owes whom in `cash_book`
    pub async fn balance(&self, cash_book: CashBook) -> Result<LedgerBalance> {
        let entries = self.ledger_repo.list_by_cash_book(cash_book).await?;
        Ok(LedgerBalance::from_entries(cash_book, &entries))
    }

    /// Books the franchisee share of a confirmed closing
    ///
    /// Returns `None` without writing when the share is not positive.
    pub async fn record_closing_payment(
        &self,
        context: &ClosingContext,
        share_amount: Decimal,
    ) -> Result<Option<LedgerEntry>> {
        let amount = round_for_display(share_amount);
        if amount <= Decimal::ZERO {
            info!(
                franchise = %context.franchise,
                period = %context.period_label(),
                share = %share_amount,
                "Franchisee share not positive, no payment recorded"
            );
            return Ok(None);
        }

        let entry = self
            .record(NewLedgerEntry {
                amount,
                description: closing_payment_description(context),
                payer: CLOSING_PAYMENT_PAYER,
                cash_book: CLOSING_PAYMENT_CASH_BOOK,
            })
            .await?;

        Ok(Some(entry))
    }
}

/// `Pagamento Fechamento CVT - 02/2025`
pub fn closing_payment_description(context: &ClosingContext) -> String {
    format!(
        "Pagamento Fechamento {} - {}",
        context.franchise,
        context.period_label()
    )
}
