pub mod ledger_service;

pub use ledger_service::{closing_payment_description, LedgerService};
