use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
};

use estate_auth::{Capability, Claims};
use estate_core::{DomainError, HouseId};
use estate_listings::NewHouse;

use crate::app::dto::{self, FlatsResponse, HouseResponse};
use crate::app::errors::ApiError;
use crate::app::routes::common::require;
use crate::app::services::AppServices;

pub async fn create_house(
    Extension(services): Extension<Arc<AppServices>>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<dto::CreateHouseRequest>, JsonRejection>,
) -> Result<Json<HouseResponse>, ApiError> {
    require(&claims, Capability::CreateHouse)?;
    let req = dto::body(payload)?;

    let house = services
        .listings
        .create_house(NewHouse {
            address: req.address,
            year_built: req.year,
            builder: req.developer,
        })
        .await?;
    Ok(Json(house.into()))
}

pub async fn flats_in_house(
    Extension(services): Extension<Arc<AppServices>>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<String>,
) -> Result<Json<FlatsResponse>, ApiError> {
    let viewer = require(&claims, Capability::ReadFlats)?;
    let house_id: HouseId = id
        .parse()
        .map_err(|_: DomainError| ApiError(DomainError::invalid_input(format!("invalid house id '{id}'"))))?;

    let flats = services.listings.flats_in_house(house_id, &viewer).await?;
    Ok(Json(FlatsResponse {
        flats: flats.into_iter().map(Into::into).collect(),
    }))
}
