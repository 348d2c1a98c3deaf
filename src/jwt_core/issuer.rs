use chrono::{Duration, Utc};
use rand::Rng;

use crate::error::ClaimsError;
use crate::types::{ClusterClaims, CustomClaims, JwtClaims, ServiceClaims, UserClaims};

/// Builds claims for each principal kind with consistent scopes.
#[derive(Debug, Clone)]
pub struct ClaimsIssuer {
    issuer: String,
    audience: String,
    ttl: Duration,
}

impl ClaimsIssuer {
    pub fn new(issuer: impl Into<String>, audience: impl Into<String>, ttl: Duration) -> Self {
        ClaimsIssuer {
            issuer: issuer.into(),
            audience: audience.into(),
            ttl,
        }
    }

    pub fn for_user(&self, user_id: &str, org_id: &str, email: &str) -> Result<JwtClaims, ClaimsError> {
        self.build(
            user_id,
            UserClaims {
                user_id: user_id.to_string(),
                org_id: org_id.to_string(),
                email: email.to_string(),
                is_api_user: false,
            }
            .into(),
        )
    }

    pub fn for_api_user(&self, user_id: &str, org_id: &str) -> Result<JwtClaims, ClaimsError> {
        self.build(
            user_id,
            UserClaims {
                user_id: user_id.to_string(),
                org_id: org_id.to_string(),
                email: String::new(),
                is_api_user: true,
            }
            .into(),
        )
    }

    pub fn for_service(&self, service_id: &str) -> Result<JwtClaims, ClaimsError> {
        self.build(
            service_id,
            ServiceClaims {
                service_id: service_id.to_string(),
            }
            .into(),
        )
    }

    pub fn for_cluster(&self, cluster_id: &str) -> Result<JwtClaims, ClaimsError> {
        self.build(
            cluster_id,
            ClusterClaims {
                cluster_id: cluster_id.to_string(),
            }
            .into(),
        )
    }

    fn build(&self, subject: &str, custom_claims: CustomClaims) -> Result<JwtClaims, ClaimsError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.ttl).ok_or_else(|| {
            ClaimsError::Config(format!("token lifetime of {}s overflows the expiry", self.ttl.num_seconds()))
        })?;

        Ok(JwtClaims {
            audience: self.audience.clone(),
            expires_at: expires_at.timestamp(),
            jti: generate_jti(),
            issued_at: now.timestamp(),
            issuer: self.issuer.clone(),
            not_before: now.timestamp(),
            subject: subject.to_string(),
            scopes: vec![custom_claims.scope().to_string()],
            custom_claims: Some(custom_claims),
        })
    }
}

fn generate_jti() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

impl Default for ClaimsIssuer {
    fn default() -> Self {
        ClaimsIssuer::new("token_claims", "token_claims", Duration::hours(1))
    }
}
