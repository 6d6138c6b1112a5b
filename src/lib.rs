//! Fixed-rate mortgage amortization with mortgage-interest tax deduction.

pub mod amortization;
pub mod error;
pub mod schedule;
pub mod table;
pub mod tax;

pub use amortization::LoanTerms;
pub use error::{MortgageError, Result};
pub use schedule::{DisplayWindow, MortgageInputs, Schedule, ScheduleRow};
pub use tax::{TaxContext, TaxPolicy};
