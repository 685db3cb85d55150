use axum::{
    Router,
    routing::{get, post},
};

pub mod auth;
pub mod common;
pub mod flat;
pub mod house;
pub mod system;

/// Routes that do not need a credential.
pub fn public_router() -> Router {
    Router::new()
        .route("/dummyLogin", get(auth::dummy_login))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Routes gated by the authorizer. Each handler checks its own capability.
pub fn protected_router() -> Router {
    Router::new()
        .route("/house/create", post(house::create_house))
        .route("/house/:id", get(house::flats_in_house))
        .route("/flat/create", post(flat::create_flat))
        .route("/flat/:id/update", post(flat::update_flat))
}
