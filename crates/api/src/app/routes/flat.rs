use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, rejection::JsonRejection},
};

use estate_auth::{Capability, Claims};
use estate_core::{DomainError, FlatId};
use estate_listings::{FlatStatus, ModerationTarget, NewFlat};

use crate::app::dto::{self, FlatResponse};
use crate::app::errors::ApiError;
use crate::app::routes::common::require;
use crate::app::services::AppServices;

pub async fn create_flat(
    Extension(services): Extension<Arc<AppServices>>,
    claims: Option<Extension<Claims>>,
    payload: Result<Json<dto::CreateFlatRequest>, JsonRejection>,
) -> Result<Json<FlatResponse>, ApiError> {
    require(&claims, Capability::CreateFlat)?;
    let req = dto::body(payload)?;

    let flat = services
        .listings
        .create_flat(NewFlat {
            house_id: req.house_id,
            flat_number: req.flat_number,
            price: req.price,
            rooms: req.rooms,
        })
        .await?;
    Ok(Json(flat.into()))
}

/// Moderator status change. The body's `id` names the flat; when the path
/// carries a different id the request is rejected.
pub async fn update_flat(
    Extension(services): Extension<Arc<AppServices>>,
    claims: Option<Extension<Claims>>,
    Path(path_id): Path<String>,
    payload: Result<Json<dto::UpdateFlatRequest>, JsonRejection>,
) -> Result<Json<FlatResponse>, ApiError> {
    let moderator = require(&claims, Capability::ChangeFlatStatus)?;
    let req = dto::body(payload)?;

    let path_id: FlatId = path_id.parse()?;
    if path_id != req.id {
        return Err(ApiError(DomainError::invalid_input(format!(
            "flat id in path ({path_id}) does not match body ({})",
            req.id
        ))));
    }

    let status: FlatStatus = req.status.parse()?;
    let target = ModerationTarget::try_from(status)?;

    let flat = services
        .moderation
        .request_transition(req.id, target, moderator.subject_id)
        .await?;
    Ok(Json(flat.into()))
}
