//! Atlas Ledger
//!
//! Backend of the Atlas shared-expense assistant: monthly franchise
//! closings with rateio allocation, the chat wizard that collects their
//! inputs, and the personal ledger fed by model-extracted entries.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

pub use modules::assistant;
pub use modules::catalogs;
pub use modules::closings;
pub use modules::ledger;
