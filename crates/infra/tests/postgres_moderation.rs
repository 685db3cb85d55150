//! Moderation against a live Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -p estate-infra -- --ignored`.

use std::sync::Arc;

use estate_core::{DomainError, FlatId, UserId};
use estate_infra::{ListingStore, ModerationService, PostgresListingStore, StoreError, db};
use estate_listings::{Flat, FlatState, ModerationTarget, NewFlat, NewHouse};

async fn store() -> Option<Arc<PostgresListingStore>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = db::connect(&url, 8).await.expect("connect to DATABASE_URL");
    db::migrate(&pool).await.expect("apply schema");
    Some(Arc::new(PostgresListingStore::new(pool)))
}

async fn fresh_flat(store: &PostgresListingStore) -> Flat {
    let house = store
        .create_house(NewHouse {
            address: "Race St 1".to_string(),
            year_built: 1999,
            builder: None,
        })
        .await
        .unwrap();
    store
        .create_flat(NewFlat {
            house_id: house.id,
            flat_number: Some(1),
            price: 1_000_000,
            rooms: 2,
        })
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "needs DATABASE_URL"]
async fn concurrent_claims_have_exactly_one_winner() {
    let Some(store) = store().await else {
        return;
    };

    for _ in 0..20 {
        let service = Arc::new(ModerationService::new(store.clone()));
        let flat = fresh_flat(&store).await;
        let (mod_a, mod_b) = (UserId::new(), UserId::new());

        let claim = |actor: UserId| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .request_transition(flat.id, ModerationTarget::OnModeration, actor)
                    .await
            })
        };
        let (a, b) = (claim(mod_a), claim(mod_b));
        let results = [a.await.unwrap(), b.await.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(DomainError::Conflict(_))))
            .count();
        assert_eq!(winners.len(), 1);
        assert_eq!(conflicts, 1);
        assert_eq!(
            store.get_flat(flat.id).await.unwrap().claimed_by(),
            winners[0].claimed_by()
        );
    }
}

#[tokio::test]
#[ignore = "needs DATABASE_URL"]
async fn compare_and_set_tells_stale_from_missing() {
    let Some(store) = store().await else {
        return;
    };
    let flat = fresh_flat(&store).await;
    let moderator = UserId::new();

    let claimed = store
        .compare_and_set_flat_status(flat.id, None, FlatState::OnModeration { moderator })
        .await
        .unwrap();
    assert_eq!(claimed.claimed_by(), Some(moderator));

    let stale = store
        .compare_and_set_flat_status(flat.id, None, FlatState::Approved)
        .await
        .unwrap_err();
    assert!(matches!(stale, StoreError::StaleState(_)));

    let missing = store
        .compare_and_set_flat_status(FlatId::new(i64::MAX), None, FlatState::Approved)
        .await
        .unwrap_err();
    assert!(matches!(missing, StoreError::NotFound(_)));

    let approved = store
        .compare_and_set_flat_status(flat.id, Some(moderator), FlatState::Approved)
        .await
        .unwrap();
    assert_eq!(approved.state, FlatState::Approved);
}
