use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use estate_core::{FlatId, HouseId, UserId};
use estate_listings::{Flat, FlatState, FlatStatus, House, NewFlat, NewHouse};

use super::r#trait::ListingStore;
use crate::store::StoreError;

/// In-memory listing store for tests/dev.
///
/// Every flat sits behind its own mutex; the outer map lock is only held long
/// enough to find or insert an entry, so transitions on different flats never
/// wait on each other.
#[derive(Debug)]
pub struct InMemoryListingStore {
    houses: RwLock<HashMap<HouseId, House>>,
    flats: RwLock<BTreeMap<FlatId, Arc<Mutex<Flat>>>>,
    next_house_id: AtomicI64,
    next_flat_id: AtomicI64,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self {
            houses: RwLock::new(HashMap::new()),
            flats: RwLock::new(BTreeMap::new()),
            next_house_id: AtomicI64::new(1),
            next_flat_id: AtomicI64::new(1),
        }
    }

    fn flat_entry(&self, id: FlatId) -> Result<Arc<Mutex<Flat>>, StoreError> {
        let flats = self.flats.read().map_err(|_| poisoned())?;
        flats
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("flat {id}")))
    }
}

impl Default for InMemoryListingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("listing store lock poisoned".to_string())
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn create_house(&self, house: NewHouse) -> Result<House, StoreError> {
        let mut houses = self.houses.write().map_err(|_| poisoned())?;
        let id = HouseId::new(self.next_house_id.fetch_add(1, Ordering::SeqCst));
        let created = House {
            id,
            address: house.address,
            year_built: house.year_built,
            builder: house.builder,
            created_at: Utc::now(),
            last_flat_added: None,
        };
        houses.insert(id, created.clone());
        Ok(created)
    }

    async fn create_flat(&self, flat: NewFlat) -> Result<Flat, StoreError> {
        // Lock order: houses, then flats.
        let mut houses = self.houses.write().map_err(|_| poisoned())?;
        let house = houses
            .get_mut(&flat.house_id)
            .ok_or_else(|| StoreError::NotFound(format!("house {}", flat.house_id)))?;

        let now = Utc::now();
        let created = Flat {
            id: FlatId::new(self.next_flat_id.fetch_add(1, Ordering::SeqCst)),
            house_id: flat.house_id,
            flat_number: flat.flat_number,
            price: flat.price,
            rooms: flat.rooms,
            state: FlatState::Created,
            created_at: now,
        };

        let mut flats = self.flats.write().map_err(|_| poisoned())?;
        flats.insert(created.id, Arc::new(Mutex::new(created.clone())));
        house.last_flat_added = Some(now);
        Ok(created)
    }

    async fn get_flat(&self, id: FlatId) -> Result<Flat, StoreError> {
        let entry = self.flat_entry(id)?;
        let flat = entry.lock().map_err(|_| poisoned())?;
        Ok(flat.clone())
    }

    async fn list_flats(&self, house_id: HouseId, approved_only: bool) -> Result<Vec<Flat>, StoreError> {
        let flats = self.flats.read().map_err(|_| poisoned())?;
        let mut out = Vec::new();
        for entry in flats.values() {
            let flat = entry.lock().map_err(|_| poisoned())?;
            if flat.house_id != house_id {
                continue;
            }
            if approved_only && flat.status() != FlatStatus::Approved {
                continue;
            }
            out.push(flat.clone());
        }
        Ok(out)
    }

    async fn compare_and_set_flat_status(
        &self,
        id: FlatId,
        expected_claim: Option<UserId>,
        next: FlatState,
    ) -> Result<Flat, StoreError> {
        let entry = self.flat_entry(id)?;
        let mut flat = entry.lock().map_err(|_| poisoned())?;

        if flat.claimed_by() != expected_claim {
            return Err(StoreError::StaleState(format!(
                "flat {id} claim changed since it was read"
            )));
        }

        flat.state = next;
        Ok(flat.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (InMemoryListingStore, House) {
        let store = InMemoryListingStore::new();
        let house = store
            .create_house(NewHouse {
                address: "1 Main St".to_string(),
                year_built: 1999,
                builder: None,
            })
            .await
            .unwrap();
        (store, house)
    }

    fn new_flat(house_id: HouseId) -> NewFlat {
        NewFlat {
            house_id,
            flat_number: Some(1),
            price: 100_000,
            rooms: 2,
        }
    }

    #[tokio::test]
    async fn create_flat_stamps_house() {
        let (store, house) = seeded().await;
        let flat = store.create_flat(new_flat(house.id)).await.unwrap();

        assert_eq!(flat.state, FlatState::Created);
        let houses = store.houses.read().unwrap();
        assert_eq!(houses[&house.id].last_flat_added, Some(flat.created_at));
    }

    #[tokio::test]
    async fn create_flat_in_unknown_house() {
        let store = InMemoryListingStore::new();
        let err = store.create_flat(new_flat(HouseId::new(42))).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_filters_by_house_and_approval() {
        let (store, house) = seeded().await;
        let other = store
            .create_house(NewHouse {
                address: "2 Side St".to_string(),
                year_built: 2005,
                builder: Some("Acme".to_string()),
            })
            .await
            .unwrap();

        let a = store.create_flat(new_flat(house.id)).await.unwrap();
        let b = store.create_flat(new_flat(house.id)).await.unwrap();
        store.create_flat(new_flat(other.id)).await.unwrap();
        store
            .compare_and_set_flat_status(b.id, None, FlatState::Approved)
            .await
            .unwrap();

        let all: Vec<_> = store.list_flats(house.id, false).await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(all, vec![a.id, b.id]);

        let approved: Vec<_> = store.list_flats(house.id, true).await.unwrap().iter().map(|f| f.id).collect();
        assert_eq!(approved, vec![b.id]);
    }

    #[tokio::test]
    async fn cas_rejects_moved_claim_and_leaves_flat_untouched() {
        let (store, house) = seeded().await;
        let flat = store.create_flat(new_flat(house.id)).await.unwrap();
        let (mod_a, mod_b) = (UserId::new(), UserId::new());

        store
            .compare_and_set_flat_status(flat.id, None, FlatState::OnModeration { moderator: mod_a })
            .await
            .unwrap();

        let err = store
            .compare_and_set_flat_status(flat.id, None, FlatState::OnModeration { moderator: mod_b })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::StaleState(_)));

        let current = store.get_flat(flat.id).await.unwrap();
        assert_eq!(current.claimed_by(), Some(mod_a));
    }

    #[tokio::test]
    async fn cas_on_unknown_flat() {
        let store = InMemoryListingStore::new();
        let err = store
            .compare_and_set_flat_status(FlatId::new(7), None, FlatState::Approved)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
