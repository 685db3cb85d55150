use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use estate_core::{DomainError, FlatId, HouseId, UserId};

/// Moderation status of a flat, as it appears on the wire and in storage.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlatStatus {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "on moderation")]
    OnModeration,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "declined")]
    Declined,
}

impl FlatStatus {
    pub const ALL: [FlatStatus; 4] = [
        FlatStatus::Created,
        FlatStatus::OnModeration,
        FlatStatus::Approved,
        FlatStatus::Declined,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FlatStatus::Created => "created",
            FlatStatus::OnModeration => "on moderation",
            FlatStatus::Approved => "approved",
            FlatStatus::Declined => "declined",
        }
    }
}

impl core::fmt::Display for FlatStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlatStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FlatStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::invalid_input(format!(
                    "unknown status '{s}' (expected one of: created, approved, declined, on moderation)"
                ))
            })
    }
}

/// Status plus review claim, with the claim present exactly when the flat is
/// on moderation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FlatState {
    Created,
    OnModeration { moderator: UserId },
    Approved,
    Declined,
}

impl FlatState {
    /// Rebuild a state from its stored columns, rejecting rows that break the
    /// claim invariant.
    pub fn from_parts(status: FlatStatus, claimed_by: Option<UserId>) -> Result<Self, DomainError> {
        match (status, claimed_by) {
            (FlatStatus::Created, None) => Ok(FlatState::Created),
            (FlatStatus::Approved, None) => Ok(FlatState::Approved),
            (FlatStatus::Declined, None) => Ok(FlatState::Declined),
            (FlatStatus::OnModeration, Some(moderator)) => Ok(FlatState::OnModeration { moderator }),
            (status, claimed_by) => Err(DomainError::internal(format!(
                "inconsistent flat state: status '{status}' with claim {claimed_by:?}"
            ))),
        }
    }

    pub fn status(&self) -> FlatStatus {
        match self {
            FlatState::Created => FlatStatus::Created,
            FlatState::OnModeration { .. } => FlatStatus::OnModeration,
            FlatState::Approved => FlatStatus::Approved,
            FlatState::Declined => FlatStatus::Declined,
        }
    }

    pub fn claimed_by(&self) -> Option<UserId> {
        match self {
            FlatState::OnModeration { moderator } => Some(*moderator),
            _ => None,
        }
    }
}

/// A unit listing inside a house.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    pub id: FlatId,
    pub house_id: HouseId,
    pub flat_number: Option<i32>,
    pub price: i64,
    pub rooms: i32,
    pub state: FlatState,
    pub created_at: DateTime<Utc>,
}

impl Flat {
    pub fn status(&self) -> FlatStatus {
        self.state.status()
    }

    pub fn claimed_by(&self) -> Option<UserId> {
        self.state.claimed_by()
    }
}

/// Input for creating a flat. New flats always start in [`FlatState::Created`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFlat {
    pub house_id: HouseId,
    pub flat_number: Option<i32>,
    pub price: i64,
    pub rooms: i32,
}

impl NewFlat {
    pub fn validated(self) -> Result<Self, DomainError> {
        if self.price < 0 {
            return Err(DomainError::invalid_input("price must not be negative"));
        }
        if self.rooms < 1 {
            return Err(DomainError::invalid_input("rooms must be at least 1"));
        }
        if matches!(self.flat_number, Some(n) if n < 1) {
            return Err(DomainError::invalid_input("flat_number must be positive"));
        }
        Ok(self)
    }
}
