pub mod closing_repository;

pub use closing_repository::{ClosingRepository, MySqlClosingRepository};
