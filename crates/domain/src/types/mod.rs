//! Domain types and models
//!
//! Typed Ponto resources, the JSON:API envelope they arrive in, and the
//! options accepted by list operations.

pub mod envelope;
pub mod options;
pub mod resources;

pub use envelope::{DataWrapper, Links, ListMeta, ListWrapper, Paging, Resource};
pub use options::TransactionListOptions;
pub use resources::{
    Account, FinancialInstitution, Identified, Organization, PendingTransaction, SyncError,
    Synchronization, Transaction,
};
