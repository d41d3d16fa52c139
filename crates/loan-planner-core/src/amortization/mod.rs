pub mod loan;
pub mod scenarios;
pub mod schedule;
pub mod summary;
