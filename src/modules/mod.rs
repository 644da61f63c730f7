pub mod assistant;
pub mod catalogs;
pub mod closings;
pub mod health;
pub mod ledger;
