//! Infrastructure layer: configuration, persistence and the orchestration
//! services that sit between the HTTP surface and the pure domain crates.

pub mod accounts;
pub mod config;
pub mod credential_store;
pub mod db;
pub mod listing_service;
pub mod listing_store;
pub mod moderation;
pub mod store;

pub use accounts::AccountService;
pub use config::{AppConfig, ConfigError};
pub use credential_store::{CredentialStore, InMemoryCredentialStore, PostgresCredentialStore};
pub use listing_service::ListingService;
pub use listing_store::{InMemoryListingStore, ListingStore, PostgresListingStore};
pub use moderation::ModerationService;
pub use store::StoreError;
