use std::sync::Arc;

use async_trait::async_trait;

use estate_core::{FlatId, HouseId, UserId};
use estate_listings::{Flat, FlatState, House, NewFlat, NewHouse};

use crate::store::StoreError;

/// Persists houses and flats.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn create_house(&self, house: NewHouse) -> Result<House, StoreError>;

    /// Insert a flat in state `created` and stamp the house's
    /// `last_flat_added`, atomically. Unknown house: [`StoreError::NotFound`].
    async fn create_flat(&self, flat: NewFlat) -> Result<Flat, StoreError>;

    async fn get_flat(&self, id: FlatId) -> Result<Flat, StoreError>;

    /// Flats of a house ordered by id. An unknown house yields an empty list.
    async fn list_flats(&self, house_id: HouseId, approved_only: bool) -> Result<Vec<Flat>, StoreError>;

    /// Replace the flat's state with `next` only if its current review claim
    /// still equals `expected_claim`.
    ///
    /// Returns the updated flat, [`StoreError::NotFound`] for an unknown id, or
    /// [`StoreError::StaleState`] when the claim moved underneath the caller.
    async fn compare_and_set_flat_status(
        &self,
        id: FlatId,
        expected_claim: Option<UserId>,
        next: FlatState,
    ) -> Result<Flat, StoreError>;
}

#[async_trait]
impl<S> ListingStore for Arc<S>
where
    S: ListingStore + ?Sized,
{
    async fn create_house(&self, house: NewHouse) -> Result<House, StoreError> {
        (**self).create_house(house).await
    }

    async fn create_flat(&self, flat: NewFlat) -> Result<Flat, StoreError> {
        (**self).create_flat(flat).await
    }

    async fn get_flat(&self, id: FlatId) -> Result<Flat, StoreError> {
        (**self).get_flat(id).await
    }

    async fn list_flats(&self, house_id: HouseId, approved_only: bool) -> Result<Vec<Flat>, StoreError> {
        (**self).list_flats(house_id, approved_only).await
    }

    async fn compare_and_set_flat_status(
        &self,
        id: FlatId,
        expected_claim: Option<UserId>,
        next: FlatState,
    ) -> Result<Flat, StoreError> {
        (**self).compare_and_set_flat_status(id, expected_claim, next).await
    }
}
