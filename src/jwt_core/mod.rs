pub mod issuer;
pub mod map_claims;
pub mod token;

pub use issuer::ClaimsIssuer;
pub use map_claims::{from_map_claims, to_map_claims};
pub use token::{decode_unverified, parse_token, sign_claims};
