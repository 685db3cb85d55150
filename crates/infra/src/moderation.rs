//! Flat moderation pipeline.
//!
//! ```text
//! request_transition(flat, target, actor)
//!   ↓
//! 1. Load the flat (NotFound if absent)
//!   ↓
//! 2. decide(): claim check, next state, expected claim (pure)
//!   ↓
//! 3. compare_and_set_flat_status(flat, expected claim, next)
//!   ↓
//! updated flat | Conflict
//! ```
//!
//! Step 3 re-checks the claim inside the store, so a transition that raced
//! between steps 1 and 3 surfaces as `Conflict` instead of overwriting the
//! winner. There is no retry; the caller decides whether to try again.

use tracing::{info, instrument, warn};

use estate_core::{DomainError, FlatId, UserId};
use estate_listings::{Flat, ModerationTarget, decide};

use crate::listing_store::ListingStore;
use crate::store::StoreError;

#[derive(Debug, Clone)]
pub struct ModerationService<S> {
    store: S,
}

impl<S> ModerationService<S>
where
    S: ListingStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Move `flat_id` to `target` on behalf of moderator `actor`.
    ///
    /// The flat is unchanged on any error.
    #[instrument(
        skip(self, target, actor),
        fields(moderator = %actor, requested = %target.status()),
        err
    )]
    pub async fn request_transition(
        &self,
        flat_id: FlatId,
        target: ModerationTarget,
        actor: UserId,
    ) -> Result<Flat, DomainError> {
        let current = self.store.get_flat(flat_id).await?;

        let transition = decide(current.state, target, actor).map_err(|conflict| {
            warn!(held_by = %conflict.held_by, "flat is claimed by another moderator");
            DomainError::from(conflict)
        })?;

        let updated = self
            .store
            .compare_and_set_flat_status(flat_id, transition.expected_claim, transition.next)
            .await
            .map_err(|err| {
                if let StoreError::StaleState(_) = err {
                    warn!("flat changed while the transition was being decided");
                }
                DomainError::from(err)
            })?;

        info!(status = %updated.status(), "flat status updated");
        Ok(updated)
    }
}
