//! `estate-core`: shared building blocks for the estate service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{FlatId, HouseId, UserId};
