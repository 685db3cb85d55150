use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Query, rejection::JsonRejection},
};

use estate_auth::Role;
use estate_core::DomainError;

use crate::app::dto::{self, RegisterResponse, TokenResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

fn parse_role(raw: &str) -> Result<Role, ApiError> {
    raw.parse::<Role>()
        .map_err(|e| ApiError(DomainError::invalid_input(e.to_string())))
}

pub async fn dummy_login(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::DummyLoginQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let user_type = query
        .user_type
        .ok_or_else(|| ApiError(DomainError::invalid_input("user_type is required")))?;
    let role = parse_role(&user_type)?;

    let token = services.accounts.dummy_login(role)?;
    Ok(Json(TokenResponse { token }))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let req = dto::body(payload)?;
    let role = parse_role(&req.role)?;

    let user = services.accounts.register(&req.email, &req.password, role).await?;
    Ok(Json(user.into()))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let req = dto::body(payload)?;

    let token = services.accounts.login(&req.id, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
