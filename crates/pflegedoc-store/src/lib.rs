//! Persistence layer: REST client for the remote `documentation_entries` table.

mod error;
pub use error::StoreError;

mod rest;
pub use rest::{EntryStore, RestEntryStore};
