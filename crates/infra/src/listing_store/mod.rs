//! Building and unit persistence boundary.
//!
//! The only write path for a flat's status and review claim is
//! [`ListingStore::compare_and_set_flat_status`]; both implementations apply it
//! as a single atomic step per flat.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryListingStore;
pub use postgres::PostgresListingStore;
pub use r#trait::ListingStore;
