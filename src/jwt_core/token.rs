use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use tracing::debug;

use super::map_claims::{from_map_claims, to_map_claims};
use crate::error::ClaimsError;
use crate::types::{JwtClaims, MapClaims};

/// Signs claims with HS256.
pub fn sign_claims(claims: &JwtClaims, signing_key: &str) -> Result<String, ClaimsError> {
    let map = to_map_claims(claims);
    debug!(claim_type = %claims.claim_type(), subject = %claims.subject, "signing claims");

    encode(
        &Header::new(Algorithm::HS256),
        &map,
        &EncodingKey::from_secret(signing_key.as_bytes()),
    )
    .map_err(ClaimsError::Signing)
}

/// Verifies signature, expiry and, when given, audience before decoding
/// the principal.
pub fn parse_token(
    token: &str,
    signing_key: &str,
    audience: Option<&str>,
) -> Result<JwtClaims, ClaimsError> {
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<MapClaims>(
        token,
        &DecodingKey::from_secret(signing_key.as_bytes()),
        &validation,
    )
    .map_err(ClaimsError::Verification)?;

    let claims = from_map_claims(&token_data.claims)?;
    debug!(claim_type = %claims.claim_type(), subject = %claims.subject, "verified claims");
    Ok(claims)
}

/// Reads the payload without checking the signature.
pub fn decode_unverified(token: &str) -> Result<MapClaims, ClaimsError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ClaimsError::InvalidFormat);
    }

    let payload_bytes = base64::decode_config(parts[1], base64::URL_SAFE_NO_PAD)
        .map_err(|_| ClaimsError::InvalidFormat)?;

    match serde_json::from_slice::<Value>(&payload_bytes).map_err(|_| ClaimsError::InvalidFormat)? {
        Value::Object(object) => Ok(object.into_iter().collect()),
        _ => Err(ClaimsError::InvalidFormat),
    }
}
