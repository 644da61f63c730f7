pub mod balance;
pub mod ledger_entry;

pub use balance::{LedgerBalance, Settlement};
pub use ledger_entry::{CashBook, LedgerEntry, NewLedgerEntry, Payer};
