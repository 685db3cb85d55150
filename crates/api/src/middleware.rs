use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use estate_auth::TokenService;
use estate_core::DomainError;

use crate::app::errors::ApiError;

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
}

/// Verify the bearer credential, if any, and attach its `Claims` to the request.
///
/// A request without an `Authorization` header passes through unauthenticated;
/// whether that is acceptable is decided per route by the authorizer. A header
/// that is present but unusable is rejected here with 401.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if req.headers().contains_key(AUTHORIZATION) {
        let claims = match extract_bearer(req.headers()).and_then(|token| {
            state.tokens.verify(token).map_err(|err| {
                warn!(reason = %err, "bearer credential rejected");
                DomainError::from(err)
            })
        }) {
            Ok(claims) => claims,
            Err(err) => return ApiError(err).into_response(),
        };
        req.extensions_mut().insert(claims);
    }

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, DomainError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| DomainError::unauthenticated("missing Authorization header"))?;

    let header = header
        .to_str()
        .map_err(|_| DomainError::unauthenticated("Authorization header is not valid text"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| DomainError::unauthenticated("expected a Bearer credential"))?
        .trim();

    if token.is_empty() {
        return Err(DomainError::unauthenticated("empty bearer credential"));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_shapes() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert!(extract_bearer(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_bearer(&headers("Bearer    ")).is_err());
        assert!(extract_bearer(&HeaderMap::new()).is_err());
    }
}
