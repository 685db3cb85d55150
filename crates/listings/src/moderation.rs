//! Moderation decision logic.
//!
//! A flat under review is claimed by exactly one moderator. Only the claim
//! holder may move it out of `on moderation`; anyone with the moderator role may
//! claim a flat that is not currently claimed. This module only *decides*;
//! applying the decision atomically is the listing store's job, using
//! [`Transition::expected_claim`] as the compare-and-set guard.

use thiserror::Error;

use estate_core::{DomainError, UserId};

use crate::{FlatState, FlatStatus};

/// Statuses a moderator may request. `created` is never a target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ModerationTarget {
    OnModeration,
    Approved,
    Declined,
}

impl ModerationTarget {
    pub fn status(&self) -> FlatStatus {
        match self {
            ModerationTarget::OnModeration => FlatStatus::OnModeration,
            ModerationTarget::Approved => FlatStatus::Approved,
            ModerationTarget::Declined => FlatStatus::Declined,
        }
    }
}

impl TryFrom<FlatStatus> for ModerationTarget {
    type Error = DomainError;

    fn try_from(value: FlatStatus) -> Result<Self, Self::Error> {
        match value {
            FlatStatus::OnModeration => Ok(ModerationTarget::OnModeration),
            FlatStatus::Approved => Ok(ModerationTarget::Approved),
            FlatStatus::Declined => Ok(ModerationTarget::Declined),
            FlatStatus::Created => Err(DomainError::invalid_input(
                "'created' cannot be requested by a moderator",
            )),
        }
    }
}

/// The flat is claimed by someone other than the acting moderator.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("flat is being moderated by {held_by}")]
pub struct ClaimConflict {
    pub held_by: UserId,
}

impl From<ClaimConflict> for DomainError {
    fn from(value: ClaimConflict) -> Self {
        DomainError::conflict(value.to_string())
    }
}

/// A legal transition: the claim that must still be in place when the write
/// lands, and the resulting state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transition {
    pub expected_claim: Option<UserId>,
    pub next: FlatState,
}

/// Decide whether `actor` may move a flat from `current` to `target`.
pub fn decide(current: FlatState, target: ModerationTarget, actor: UserId) -> Result<Transition, ClaimConflict> {
    if let FlatState::OnModeration { moderator } = current {
        if moderator != actor {
            return Err(ClaimConflict { held_by: moderator });
        }
    }

    let next = match target {
        ModerationTarget::OnModeration => FlatState::OnModeration { moderator: actor },
        ModerationTarget::Approved => FlatState::Approved,
        ModerationTarget::Declined => FlatState::Declined,
    };

    Ok(Transition {
        expected_claim: current.claimed_by(),
        next,
    })
}
