// Monthly franchise closings: rateio calculation and storage

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{ClosingContext, ClosingInput, ClosingRecord, ClosingResult, FranchiseId};
pub use repositories::{ClosingRepository, MySqlClosingRepository};
pub use services::{AllocationCalculator, ClosingService};
