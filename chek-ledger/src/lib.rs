//! chek-ledger: persistent check/item ledger and period spending reports.

pub mod report;
pub mod store;

pub use report::{Period, spending_by_category};
pub use store::{LedgerStore, SavedCheck, StoreError};
