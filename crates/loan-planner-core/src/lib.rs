pub mod error;
pub mod format;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "persistence")]
pub mod persistence;

pub use error::LoanPlannerError;
pub use types::*;

/// Standard result type for all loan-planner operations
pub type LoanPlannerResult<T> = Result<T, LoanPlannerError>;
