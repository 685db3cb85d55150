//! House and flat creation plus the per-role flat listing.

use tracing::{info, instrument};

use estate_auth::Principal;
use estate_core::{DomainError, HouseId};
use estate_listings::{Flat, House, NewFlat, NewHouse};

use crate::listing_store::ListingStore;

#[derive(Debug, Clone)]
pub struct ListingService<S> {
    store: S,
}

impl<S> ListingService<S>
where
    S: ListingStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[instrument(skip(self, house), err)]
    pub async fn create_house(&self, house: NewHouse) -> Result<House, DomainError> {
        let house = self.store.create_house(house.validated()?).await?;
        info!(house_id = %house.id, "house created");
        Ok(house)
    }

    #[instrument(skip(self, flat), fields(house_id = %flat.house_id), err)]
    pub async fn create_flat(&self, flat: NewFlat) -> Result<Flat, DomainError> {
        let flat = self.store.create_flat(flat.validated()?).await?;
        info!(flat_id = %flat.id, "flat created");
        Ok(flat)
    }

    /// Flats of a house as `viewer` may see them: moderators see every flat,
    /// everyone else only approved ones.
    #[instrument(skip(self, viewer), fields(role = %viewer.role), err)]
    pub async fn flats_in_house(&self, house_id: HouseId, viewer: &Principal) -> Result<Vec<Flat>, DomainError> {
        let approved_only = !viewer.is_moderator();
        Ok(self.store.list_flats(house_id, approved_only).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use estate_auth::Role;
    use estate_core::UserId;
    use estate_listings::{FlatState, FlatStatus};

    use super::*;
    use crate::listing_store::InMemoryListingStore;

    fn service() -> (Arc<InMemoryListingStore>, ListingService<Arc<InMemoryListingStore>>) {
        let store = Arc::new(InMemoryListingStore::new());
        (store.clone(), ListingService::new(store))
    }

    fn viewer(role: Role) -> Principal {
        Principal {
            subject_id: UserId::new(),
            role,
        }
    }

    #[tokio::test]
    async fn create_house_validates_and_trims() {
        let (_, listings) = service();

        let house = listings
            .create_house(NewHouse {
                address: "  10 Downing St ".to_string(),
                year_built: 1684,
                builder: Some("  ".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(house.address, "10 Downing St");
        assert_eq!(house.builder, None);

        let err = listings
            .create_house(NewHouse {
                address: "".to_string(),
                year_built: 2000,
                builder: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn create_flat_rules() {
        let (_, listings) = service();
        let house = listings
            .create_house(NewHouse {
                address: "1 Elm St".to_string(),
                year_built: 2010,
                builder: None,
            })
            .await
            .unwrap();

        let flat = listings
            .create_flat(NewFlat {
                house_id: house.id,
                flat_number: None,
                price: 0,
                rooms: 1,
            })
            .await
            .unwrap();
        assert_eq!(flat.status(), FlatStatus::Created);

        let negative = listings
            .create_flat(NewFlat {
                house_id: house.id,
                flat_number: None,
                price: -1,
                rooms: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(negative, DomainError::InvalidInput(_)));

        let orphan = listings
            .create_flat(NewFlat {
                house_id: HouseId::new(404),
                flat_number: None,
                price: 10,
                rooms: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(orphan, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn clients_only_see_approved_flats() {
        let (store, listings) = service();
        let house = listings
            .create_house(NewHouse {
                address: "1 Elm St".to_string(),
                year_built: 2010,
                builder: None,
            })
            .await
            .unwrap();

        let mut ids = Vec::new();
        for rooms in 1..=3 {
            let flat = listings
                .create_flat(NewFlat {
                    house_id: house.id,
                    flat_number: Some(rooms),
                    price: 1000,
                    rooms,
                })
                .await
                .unwrap();
            ids.push(flat.id);
        }
        store
            .compare_and_set_flat_status(ids[1], None, FlatState::Approved)
            .await
            .unwrap();

        let seen_by_client = listings.flats_in_house(house.id, &viewer(Role::Client)).await.unwrap();
        assert_eq!(seen_by_client.iter().map(|f| f.id).collect::<Vec<_>>(), vec![ids[1]]);

        let seen_by_moderator = listings
            .flats_in_house(house.id, &viewer(Role::Moderator))
            .await
            .unwrap();
        assert_eq!(seen_by_moderator.len(), 3);
    }
}
