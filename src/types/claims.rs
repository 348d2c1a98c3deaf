use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::claim_type::ClaimType;

/// Flat claims map exchanged with the JWT library.
pub type MapClaims = HashMap<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JwtClaims {
    pub audience: String,
    pub expires_at: i64,
    pub jti: String,
    pub issued_at: i64,
    pub issuer: String,
    pub not_before: i64,
    pub subject: String,
    pub scopes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_claims: Option<CustomClaims>,
}

/// Principal-specific claims. At most one is attached to a [`JwtClaims`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CustomClaims {
    User(UserClaims),
    Service(ServiceClaims),
    Cluster(ClusterClaims),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserClaims {
    pub user_id: String,
    pub org_id: String,
    pub email: String,
    pub is_api_user: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceClaims {
    pub service_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterClaims {
    pub cluster_id: String,
}

impl CustomClaims {
    pub fn claim_type(&self) -> ClaimType {
        match self {
            CustomClaims::User(_) => ClaimType::User,
            CustomClaims::Service(_) => ClaimType::Service,
            CustomClaims::Cluster(_) => ClaimType::Cluster,
        }
    }

    /// The scope marker that selects this variant.
    pub fn scope(&self) -> &'static str {
        match self {
            CustomClaims::User(_) => ClaimType::USER_SCOPE,
            CustomClaims::Service(_) => ClaimType::SERVICE_SCOPE,
            CustomClaims::Cluster(_) => ClaimType::CLUSTER_SCOPE,
        }
    }
}

impl From<UserClaims> for CustomClaims {
    fn from(claims: UserClaims) -> Self {
        CustomClaims::User(claims)
    }
}

impl From<ServiceClaims> for CustomClaims {
    fn from(claims: ServiceClaims) -> Self {
        CustomClaims::Service(claims)
    }
}

impl From<ClusterClaims> for CustomClaims {
    fn from(claims: ClusterClaims) -> Self {
        CustomClaims::Cluster(claims)
    }
}

impl JwtClaims {
    pub fn user_claims(&self) -> Option<&UserClaims> {
        match &self.custom_claims {
            Some(CustomClaims::User(claims)) => Some(claims),
            _ => None,
        }
    }

    pub fn service_claims(&self) -> Option<&ServiceClaims> {
        match &self.custom_claims {
            Some(CustomClaims::Service(claims)) => Some(claims),
            _ => None,
        }
    }

    pub fn cluster_claims(&self) -> Option<&ClusterClaims> {
        match &self.custom_claims {
            Some(CustomClaims::Cluster(claims)) => Some(claims),
            _ => None,
        }
    }
}
