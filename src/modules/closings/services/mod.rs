pub mod allocation_calculator;
pub mod closing_service;

pub use allocation_calculator::AllocationCalculator;
pub use closing_service::ClosingService;
