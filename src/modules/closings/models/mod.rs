pub mod closing;
pub mod expense;
pub mod franchise;
pub mod report;

pub use closing::{
    ChargeMode, ClosingContext, ClosingInput, ClosingRecord, ClosingResult, ProratedLine,
    VariableLine,
};
pub use expense::{AdHocExpenseEntry, ClosingCatalog, ExpenseEntry, VariableExpenseEntry};
pub use franchise::{FranchiseId, DEFAULT_FRANCHISEE_SHARE_PCT};
pub use report::{ClosingReport, ExpenseBreakdown};
