use serde::Serialize;

use super::{ClaimType, JwtClaims};

#[derive(Debug, Serialize)]
pub struct Output {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub claim_type: ClaimType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<JwtClaims>,
    pub detail: String,
}

impl Output {
    pub fn issued(token: String, claims: JwtClaims) -> Self {
        Output {
            status: "issued".to_string(),
            token: Some(token),
            claim_type: claims.claim_type(),
            claims: Some(claims),
            detail: "token signed".to_string(),
        }
    }

    pub fn valid(claims: JwtClaims, detail: impl Into<String>) -> Self {
        Output {
            status: "valid".to_string(),
            token: None,
            claim_type: claims.claim_type(),
            claims: Some(claims),
            detail: detail.into(),
        }
    }

    pub fn unverified(claims: JwtClaims) -> Self {
        Output {
            status: "unverified".to_string(),
            token: None,
            claim_type: claims.claim_type(),
            claims: Some(claims),
            detail: "signature not checked".to_string(),
        }
    }

    pub fn rejected(token: &str, detail: impl Into<String>) -> Self {
        Output {
            status: "rejected".to_string(),
            token: Some(token.to_string()),
            claim_type: ClaimType::Unknown,
            claims: None,
            detail: detail.into(),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.status == "rejected"
    }
}
