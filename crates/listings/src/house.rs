use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use estate_core::{DomainError, HouseId};

/// A building. Address, year and builder are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    pub id: HouseId,
    pub address: String,
    pub year_built: i32,
    pub builder: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set whenever a flat is added to this house.
    pub last_flat_added: Option<DateTime<Utc>>,
}

/// Input for creating a house (moderator action).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHouse {
    pub address: String,
    pub year_built: i32,
    pub builder: Option<String>,
}

impl NewHouse {
    /// Trim text fields and reject values the store would accept but the
    /// service should not. A blank builder is treated as absent.
    pub fn validated(self) -> Result<Self, DomainError> {
        let address = self.address.trim().to_string();
        if address.is_empty() {
            return Err(DomainError::invalid_input("address is required"));
        }
        if self.year_built < 0 {
            return Err(DomainError::invalid_input("year must not be negative"));
        }
        let builder = self
            .builder
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty());

        Ok(Self {
            address,
            year_built: self.year_built,
            builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(address: &str, year: i32, builder: Option<&str>) -> NewHouse {
        NewHouse {
            address: address.to_string(),
            year_built: year,
            builder: builder.map(str::to_string),
        }
    }

    #[test]
    fn trims_and_keeps_builder() {
        let h = input("  Lenina 1 ", 1999, Some(" Acme ")).validated().unwrap();
        assert_eq!(h.address, "Lenina 1");
        assert_eq!(h.builder.as_deref(), Some("Acme"));
    }

    #[test]
    fn blank_builder_becomes_none() {
        let h = input("Lenina 1", 2000, Some("   ")).validated().unwrap();
        assert_eq!(h.builder, None);
    }

    #[test]
    fn rejects_blank_address_and_negative_year() {
        assert!(matches!(
            input(" ", 2000, None).validated(),
            Err(DomainError::InvalidInput(_))
        ));
        assert!(matches!(
            input("Lenina 1", -1, None).validated(),
            Err(DomainError::InvalidInput(_))
        ));
    }
}
