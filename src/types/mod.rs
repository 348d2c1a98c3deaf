pub mod claim_type;
pub mod claims;
pub mod output;

pub use claim_type::{claims_type, ClaimType};
pub use claims::{ClusterClaims, CustomClaims, JwtClaims, MapClaims, ServiceClaims, UserClaims};
pub use output::Output;
