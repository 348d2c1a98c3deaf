use serde::Serialize;
use std::fmt;

use super::claims::JwtClaims;

/// Principal kind carried by a set of claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    User,
    Service,
    Cluster,
    Unknown,
}

impl ClaimType {
    pub const USER_SCOPE: &'static str = "user";
    pub const SERVICE_SCOPE: &'static str = "service";
    pub const CLUSTER_SCOPE: &'static str = "cluster";

    pub fn from_scope(scope: &str) -> Option<Self> {
        match scope {
            Self::USER_SCOPE => Some(ClaimType::User),
            Self::SERVICE_SCOPE => Some(ClaimType::Service),
            Self::CLUSTER_SCOPE => Some(ClaimType::Cluster),
            _ => None,
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimType::User => write!(f, "user"),
            ClaimType::Service => write!(f, "service"),
            ClaimType::Cluster => write!(f, "cluster"),
            ClaimType::Unknown => write!(f, "unknown"),
        }
    }
}

/// Classifies scopes by the first recognized scope marker.
pub fn claims_type<S: AsRef<str>>(scopes: &[S]) -> ClaimType {
    scopes
        .iter()
        .find_map(|scope| ClaimType::from_scope(scope.as_ref()))
        .unwrap_or(ClaimType::Unknown)
}

impl JwtClaims {
    pub fn claim_type(&self) -> ClaimType {
        claims_type(&self.scopes)
    }
}
