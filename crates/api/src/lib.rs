//! HTTP API: routing, bearer verification and request/response mapping.

pub mod app;
pub mod middleware;
