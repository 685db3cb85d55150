use axum::Json;
use axum::extract::rejection::JsonRejection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use estate_auth::{Role, User};
use estate_core::{DomainError, FlatId, HouseId, UserId};
use estate_listings::{Flat, FlatStatus, House};

use crate::app::errors::ApiError;

/// Unwrap a JSON body, turning any extractor rejection into a 400.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError(DomainError::invalid_input(rejection.body_text())))
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct DummyLoginQuery {
    pub user_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// User id or email.
    #[serde(alias = "email")]
    pub id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateHouseRequest {
    pub address: String,
    pub year: i32,
    pub developer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlatRequest {
    pub house_id: HouseId,
    pub flat_number: Option<i32>,
    pub price: i64,
    pub rooms: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFlatRequest {
    pub id: FlatId,
    /// Kept as text so an unknown value is reported as invalid input rather
    /// than a generic body error.
    pub status: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl From<User> for RegisterResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HouseResponse {
    pub id: HouseId,
    pub address: String,
    pub year: i32,
    pub developer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub update_at: Option<DateTime<Utc>>,
}

impl From<House> for HouseResponse {
    fn from(house: House) -> Self {
        Self {
            id: house.id,
            address: house.address,
            year: house.year_built,
            developer: house.builder,
            created_at: house.created_at,
            update_at: house.last_flat_added,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlatResponse {
    pub id: FlatId,
    pub house_id: HouseId,
    pub flat_number: Option<i32>,
    pub price: i64,
    pub rooms: i32,
    pub status: FlatStatus,
    pub moderator_id: Option<UserId>,
}

impl From<Flat> for FlatResponse {
    fn from(flat: Flat) -> Self {
        Self {
            id: flat.id,
            house_id: flat.house_id,
            flat_number: flat.flat_number,
            price: flat.price,
            rooms: flat.rooms,
            status: flat.status(),
            moderator_id: flat.claimed_by(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlatsResponse {
    pub flats: Vec<FlatResponse>,
}

#[cfg(test)]
mod tests {
    use estate_listings::FlatState;

    use super::*;

    #[test]
    fn flat_response_exposes_claim_and_wire_status() {
        let moderator = UserId::new();
        let flat = Flat {
            id: FlatId::new(1),
            house_id: HouseId::new(2),
            flat_number: None,
            price: 100,
            rooms: 1,
            state: FlatState::OnModeration { moderator },
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(FlatResponse::from(flat)).unwrap();
        assert_eq!(json["status"], "on moderation");
        assert_eq!(json["moderator_id"], moderator.to_string());
        assert_eq!(json["id"], 1);
        assert!(json["flat_number"].is_null());
    }

    #[test]
    fn login_accepts_email_alias() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@b.c","password":"pw"}"#).unwrap();
        assert_eq!(req.id, "a@b.c");
    }
}
