//! Service wiring: picks the store backend and builds the orchestration
//! services shared by every handler.

use std::sync::Arc;

use tracing::info;

use estate_auth::TokenService;
use estate_infra::{
    AccountService, AppConfig, CredentialStore, InMemoryCredentialStore, InMemoryListingStore, ListingService,
    ListingStore, ModerationService, PostgresCredentialStore, PostgresListingStore, StoreError, db,
};

pub type DynCredentialStore = Arc<dyn CredentialStore>;
pub type DynListingStore = Arc<dyn ListingStore>;

pub struct AppServices {
    pub tokens: Arc<TokenService>,
    pub accounts: AccountService<DynCredentialStore>,
    pub listings: ListingService<DynListingStore>,
    pub moderation: ModerationService<DynListingStore>,
}

impl AppServices {
    pub fn new(tokens: Arc<TokenService>, credentials: DynCredentialStore, listings: DynListingStore) -> Self {
        Self {
            accounts: AccountService::new(credentials, tokens.clone()),
            listings: ListingService::new(listings.clone()),
            moderation: ModerationService::new(listings),
            tokens,
        }
    }

    /// Services over fresh in-memory stores.
    pub fn in_memory(tokens: Arc<TokenService>) -> Self {
        Self::new(
            tokens,
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryListingStore::new()),
        )
    }

    /// Services over Postgres when a database URL is configured, otherwise
    /// in-memory stores.
    pub async fn from_config(config: &AppConfig, tokens: Arc<TokenService>) -> Result<Self, StoreError> {
        let Some(url) = config.database.url.as_deref() else {
            info!("no database configured; using in-memory stores");
            return Ok(Self::in_memory(tokens));
        };

        let pool = db::connect(url, config.database.max_connections).await?;
        db::migrate(&pool).await?;

        Ok(Self::new(
            tokens,
            Arc::new(PostgresCredentialStore::new(pool.clone())),
            Arc::new(PostgresListingStore::new(pool)),
        ))
    }
}
