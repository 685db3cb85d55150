//! Postgres-backed listing store.
//!
//! The moderation write is a single conditional `UPDATE`:
//!
//! ```sql
//! UPDATE flats SET status = $1, moderator_id = $2
//! WHERE id = $3 AND moderator_id IS NOT DISTINCT FROM $4
//! ```
//!
//! Two requests that both read "unclaimed" both send `$4 = NULL`; row locking
//! makes the second re-evaluate the predicate after the first commits, so only
//! one of them matches. No application-level lock is involved, and the
//! guarantee holds across service instances sharing the database.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::{instrument, warn};
use uuid::Uuid;

use estate_core::{FlatId, HouseId, UserId};
use estate_listings::{Flat, FlatState, FlatStatus, House, NewFlat, NewHouse};

use super::r#trait::ListingStore;
use crate::store::{StoreError, map_sqlx_error};

const FLAT_COLUMNS: &str = "id, house_id, flat_number, price, rooms, status, moderator_id, created_at";

#[derive(Debug, Clone)]
pub struct PostgresListingStore {
    pool: Arc<PgPool>,
}

impl PostgresListingStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

struct HouseRow {
    id: i64,
    address: String,
    year_built: i32,
    builder: Option<String>,
    created_at: DateTime<Utc>,
    last_flat_added: Option<DateTime<Utc>>,
}

impl<'r> FromRow<'r, PgRow> for HouseRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            address: row.try_get("address")?,
            year_built: row.try_get("year_built")?,
            builder: row.try_get("builder")?,
            created_at: row.try_get("created_at")?,
            last_flat_added: row.try_get("last_flat_added")?,
        })
    }
}

impl From<HouseRow> for House {
    fn from(row: HouseRow) -> Self {
        House {
            id: HouseId::new(row.id),
            address: row.address,
            year_built: row.year_built,
            builder: row.builder,
            created_at: row.created_at,
            last_flat_added: row.last_flat_added,
        }
    }
}

struct FlatRow {
    id: i64,
    house_id: i64,
    flat_number: Option<i32>,
    price: i64,
    rooms: i32,
    status: String,
    moderator_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for FlatRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            house_id: row.try_get("house_id")?,
            flat_number: row.try_get("flat_number")?,
            price: row.try_get("price")?,
            rooms: row.try_get("rooms")?,
            status: row.try_get("status")?,
            moderator_id: row.try_get("moderator_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl TryFrom<FlatRow> for Flat {
    type Error = StoreError;

    fn try_from(row: FlatRow) -> Result<Self, Self::Error> {
        let status: FlatStatus = row
            .status
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("stored flat {}: {e}", row.id)))?;
        let state = FlatState::from_parts(status, row.moderator_id.map(UserId::from_uuid))
            .map_err(|e| StoreError::Corrupt(format!("stored flat {}: {e}", row.id)))?;

        Ok(Flat {
            id: FlatId::new(row.id),
            house_id: HouseId::new(row.house_id),
            flat_number: row.flat_number,
            price: row.price,
            rooms: row.rooms,
            state,
            created_at: row.created_at,
        })
    }
}

fn decode_flat(operation: &str, row: &PgRow) -> Result<Flat, StoreError> {
    FlatRow::from_row(row)
        .map_err(|e| map_sqlx_error(operation, e))?
        .try_into()
}

fn claim_param(claim: Option<UserId>) -> Option<Uuid> {
    claim.map(|id| *id.as_uuid())
}

#[async_trait]
impl ListingStore for PostgresListingStore {
    #[instrument(skip(self, house), err)]
    async fn create_house(&self, house: NewHouse) -> Result<House, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO houses (address, year_built, builder, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, address, year_built, builder, created_at, last_flat_added
            "#,
        )
        .bind(&house.address)
        .bind(house.year_built)
        .bind(&house.builder)
        .bind(Utc::now())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_house", e))?;

        let house = HouseRow::from_row(&row).map_err(|e| map_sqlx_error("create_house", e))?;
        Ok(house.into())
    }

    #[instrument(skip(self, flat), fields(house_id = %flat.house_id), err)]
    async fn create_flat(&self, flat: NewFlat) -> Result<Flat, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("create_flat", e))?;

        let now = Utc::now();

        // Stamping the house first also takes its row lock and proves it exists.
        let touched = sqlx::query("UPDATE houses SET last_flat_added = $1 WHERE id = $2")
            .bind(now)
            .bind(flat.house_id.get())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_flat", e))?;
        if touched.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("house {}", flat.house_id)));
        }

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO flats (house_id, flat_number, price, rooms, status, moderator_id, created_at)
            VALUES ($1, $2, $3, $4, $5, NULL, $6)
            RETURNING {FLAT_COLUMNS}
            "#
        ))
        .bind(flat.house_id.get())
        .bind(flat.flat_number)
        .bind(flat.price)
        .bind(flat.rooms)
        .bind(FlatStatus::Created.as_str())
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("create_flat", e))?;

        let created = decode_flat("create_flat", &row)?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("create_flat", e))?;

        Ok(created)
    }

    #[instrument(skip(self), fields(flat_id = %id), err)]
    async fn get_flat(&self, id: FlatId) -> Result<Flat, StoreError> {
        let row = sqlx::query(&format!("SELECT {FLAT_COLUMNS} FROM flats WHERE id = $1"))
            .bind(id.get())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_flat", e))?
            .ok_or_else(|| StoreError::NotFound(format!("flat {id}")))?;

        decode_flat("get_flat", &row)
    }

    #[instrument(skip(self), fields(house_id = %house_id), err)]
    async fn list_flats(&self, house_id: HouseId, approved_only: bool) -> Result<Vec<Flat>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {FLAT_COLUMNS}
            FROM flats
            WHERE house_id = $1 AND (NOT $2 OR status = $3)
            ORDER BY id ASC
            "#
        ))
        .bind(house_id.get())
        .bind(approved_only)
        .bind(FlatStatus::Approved.as_str())
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_flats", e))?;

        rows.iter().map(|row| decode_flat("list_flats", row)).collect()
    }

    #[instrument(
        skip(self, next),
        fields(flat_id = %id, next_status = %next.status()),
        err
    )]
    async fn compare_and_set_flat_status(
        &self,
        id: FlatId,
        expected_claim: Option<UserId>,
        next: FlatState,
    ) -> Result<Flat, StoreError> {
        let updated = sqlx::query(&format!(
            r#"
            UPDATE flats
            SET status = $1, moderator_id = $2
            WHERE id = $3 AND moderator_id IS NOT DISTINCT FROM $4
            RETURNING {FLAT_COLUMNS}
            "#
        ))
        .bind(next.status().as_str())
        .bind(claim_param(next.claimed_by()))
        .bind(id.get())
        .bind(claim_param(expected_claim))
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("compare_and_set_flat_status", e))?;

        if let Some(row) = updated {
            return decode_flat("compare_and_set_flat_status", &row);
        }

        // No row matched: either the flat is gone or its claim moved.
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM flats WHERE id = $1)")
            .bind(id.get())
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("compare_and_set_flat_status", e))?;

        if exists {
            warn!(flat_id = %id, "compare-and-set lost to a concurrent transition");
            Err(StoreError::StaleState(format!("flat {id} claim changed since it was read")))
        } else {
            Err(StoreError::NotFound(format!("flat {id}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use estate_core::DomainError;

    use super::*;

    fn row(status: &str, moderator_id: Option<Uuid>) -> FlatRow {
        FlatRow {
            id: 7,
            house_id: 1,
            flat_number: Some(12),
            price: 4_500_000,
            rooms: 2,
            status: status.to_string(),
            moderator_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn well_formed_row_decodes() {
        let moderator = Uuid::now_v7();
        let flat = Flat::try_from(row("on moderation", Some(moderator))).unwrap();
        assert_eq!(flat.claimed_by(), Some(UserId::from_uuid(moderator)));
        assert_eq!(flat.status(), FlatStatus::OnModeration);
    }

    #[test]
    fn bad_stored_rows_are_server_faults() {
        let unknown_status = Flat::try_from(row("archived", None)).unwrap_err();
        let orphan_claim = Flat::try_from(row("approved", Some(Uuid::now_v7()))).unwrap_err();
        let missing_claim = Flat::try_from(row("on moderation", None)).unwrap_err();

        for err in [unknown_status, orphan_claim, missing_claim] {
            assert!(matches!(err, StoreError::Corrupt(_)), "{err:?}");
            assert!(matches!(DomainError::from(err), DomainError::Internal(_)));
        }
    }
}
