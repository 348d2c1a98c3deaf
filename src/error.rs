use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("JWT claim {field} is malformed: {reason}")]
    MalformedStandardField { field: &'static str, reason: String },
    #[error("Invalid JWT format")]
    InvalidFormat,
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Token verification failed: {0}")]
    Verification(#[source] jsonwebtoken::errors::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ClaimsError {
    pub(crate) fn malformed(field: &'static str, reason: impl Into<String>) -> Self {
        ClaimsError::MalformedStandardField {
            field,
            reason: reason.into(),
        }
    }
}
