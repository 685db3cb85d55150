//! `estate-auth`: credential issuance/verification and role-based authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: every decision
//! here is a pure function of its arguments plus the process-wide signing secret.

pub mod authorize;
pub mod capability;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{AuthzError, authorize, authorize_capability};
pub use capability::Capability;
pub use claims::{Claims, TOKEN_TTL_HOURS, TokenError, validate_claims};
pub use password::PasswordError;
pub use principal::Principal;
pub use roles::{ParseRoleError, Role};
pub use token::TokenService;
pub use user::{NewUser, User};
