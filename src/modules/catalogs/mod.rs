// Expense catalogs (fixed and variable) maintained from the settings screen

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CatalogEntry, CatalogEntryRequest, ExpenseKind};
pub use repositories::{CatalogRepository, MySqlCatalogRepository};
pub use services::CatalogService;
