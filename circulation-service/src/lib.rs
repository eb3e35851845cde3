pub mod app;
pub mod catalog_handlers;
pub mod ledger;
pub mod loan_handlers;

pub use crate::app::{build_router, AppState};
pub use crate::ledger::{ItemRecord, LedgerError, LoanRecord};

/// Maximum simultaneous active loans per member.
pub const DEFAULT_LOAN_LIMIT: i64 = 5;
/// Canonical loan period applied when a borrow request names no due date.
pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;
