use axum::Extension;

use estate_auth::{Capability, Claims, Principal, authorize_capability};

use crate::app::errors::ApiError;

/// Run the authorizer for `capability` against the request's verified claims.
pub fn require(claims: &Option<Extension<Claims>>, capability: Capability) -> Result<Principal, ApiError> {
    let claims = claims.as_ref().map(|Extension(claims)| claims);
    Ok(authorize_capability(claims, capability)?)
}
