//! User persistence boundary.
//!
//! Verification of bearer credentials never goes through this store; it is only
//! consulted for registration and password login.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryCredentialStore;
pub use postgres::PostgresCredentialStore;
pub use r#trait::CredentialStore;
