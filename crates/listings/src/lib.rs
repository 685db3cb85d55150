//! Listings domain: buildings, unit listings and the moderation decision.
//!
//! This crate contains business rules only, implemented as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod flat;
pub mod house;
pub mod moderation;

pub use flat::{Flat, FlatState, FlatStatus, NewFlat};
pub use house::{House, NewHouse};
pub use moderation::{ClaimConflict, ModerationTarget, Transition, decide};
