//! Conversion between typed JWT claims and the flat claim maps handled by
//! `jsonwebtoken`, plus helpers to issue and verify tokens carrying them.

pub mod config;
pub mod error;
pub mod helpers;
pub mod jwt_core;
pub mod types;

pub use error::ClaimsError;
pub use jwt_core::{from_map_claims, to_map_claims};
pub use types::{claims_type, ClaimType, CustomClaims, JwtClaims, MapClaims};
