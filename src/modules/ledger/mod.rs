// Shared expense ledger between the two partners
pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CashBook, LedgerBalance, LedgerEntry, NewLedgerEntry, Payer, Settlement};
pub use repositories::{LedgerRepository, MySqlLedgerRepository};
pub use services::LedgerService;
