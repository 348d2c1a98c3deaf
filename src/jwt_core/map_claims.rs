//! Conversion between [`JwtClaims`] and the flat [`MapClaims`] used by the
//! JWT library.
//!
//! Standard claims use their registered keys. Timestamps are stored as
//! floating point numbers, scopes as a single comma-joined string under
//! [`SCOPES_KEY`], and the active principal's fields are flattened into the
//! same map under their own names.

use serde_json::Value;

use crate::error::ClaimsError;
use crate::types::{
    claims_type, ClaimType, ClusterClaims, CustomClaims, JwtClaims, MapClaims, ServiceClaims,
    UserClaims,
};

pub const AUDIENCE_KEY: &str = "aud";
pub const EXPIRES_AT_KEY: &str = "exp";
pub const JTI_KEY: &str = "jti";
pub const ISSUED_AT_KEY: &str = "iat";
pub const ISSUER_KEY: &str = "iss";
pub const NOT_BEFORE_KEY: &str = "nbf";
pub const SUBJECT_KEY: &str = "sub";
pub const SCOPES_KEY: &str = "Scopes";

pub const USER_ID_KEY: &str = "UserID";
pub const ORG_ID_KEY: &str = "OrgID";
pub const EMAIL_KEY: &str = "Email";
pub const IS_API_USER_KEY: &str = "IsAPIUser";
pub const SERVICE_ID_KEY: &str = "ServiceID";
pub const CLUSTER_ID_KEY: &str = "ClusterID";

const SCOPE_SEPARATOR: &str = ",";

// Largest integer an f64 holds exactly.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_991.0;

pub fn to_map_claims(claims: &JwtClaims) -> MapClaims {
    let mut map = MapClaims::new();

    map.insert(AUDIENCE_KEY.to_string(), Value::from(claims.audience.as_str()));
    map.insert(EXPIRES_AT_KEY.to_string(), Value::from(claims.expires_at as f64));
    map.insert(JTI_KEY.to_string(), Value::from(claims.jti.as_str()));
    map.insert(ISSUED_AT_KEY.to_string(), Value::from(claims.issued_at as f64));
    map.insert(ISSUER_KEY.to_string(), Value::from(claims.issuer.as_str()));
    map.insert(NOT_BEFORE_KEY.to_string(), Value::from(claims.not_before as f64));
    map.insert(SUBJECT_KEY.to_string(), Value::from(claims.subject.as_str()));
    map.insert(
        SCOPES_KEY.to_string(),
        Value::from(claims.scopes.join(SCOPE_SEPARATOR)),
    );

    match (claims.claim_type(), &claims.custom_claims) {
        (ClaimType::User, Some(CustomClaims::User(user))) => {
            map.insert(USER_ID_KEY.to_string(), Value::from(user.user_id.as_str()));
            map.insert(ORG_ID_KEY.to_string(), Value::from(user.org_id.as_str()));
            map.insert(EMAIL_KEY.to_string(), Value::from(user.email.as_str()));
            map.insert(IS_API_USER_KEY.to_string(), Value::from(user.is_api_user));
        }
        (ClaimType::Service, Some(CustomClaims::Service(service))) => {
            map.insert(SERVICE_ID_KEY.to_string(), Value::from(service.service_id.as_str()));
        }
        (ClaimType::Cluster, Some(CustomClaims::Cluster(cluster))) => {
            map.insert(CLUSTER_ID_KEY.to_string(), Value::from(cluster.cluster_id.as_str()));
        }
        // Unknown scope, or a payload that the scopes do not select.
        _ => {}
    }

    map
}

pub fn from_map_claims(map: &MapClaims) -> Result<JwtClaims, ClaimsError> {
    let scopes = read_scopes(map)?;

    let custom_claims = match claims_type(&scopes) {
        ClaimType::User => Some(CustomClaims::User(UserClaims {
            user_id: read_variant_string(map, USER_ID_KEY),
            org_id: read_variant_string(map, ORG_ID_KEY),
            email: read_variant_string(map, EMAIL_KEY),
            is_api_user: read_variant_bool(map, IS_API_USER_KEY),
        })),
        ClaimType::Service => Some(CustomClaims::Service(ServiceClaims {
            service_id: read_variant_string(map, SERVICE_ID_KEY),
        })),
        ClaimType::Cluster => Some(CustomClaims::Cluster(ClusterClaims {
            cluster_id: read_variant_string(map, CLUSTER_ID_KEY),
        })),
        ClaimType::Unknown => None,
    };

    Ok(JwtClaims {
        audience: read_string(map, AUDIENCE_KEY)?,
        expires_at: read_timestamp(map, EXPIRES_AT_KEY)?,
        jti: read_string(map, JTI_KEY)?,
        issued_at: read_timestamp(map, ISSUED_AT_KEY)?,
        issuer: read_string(map, ISSUER_KEY)?,
        not_before: read_timestamp(map, NOT_BEFORE_KEY)?,
        subject: read_string(map, SUBJECT_KEY)?,
        scopes,
        custom_claims,
    })
}

fn read_timestamp(map: &MapClaims, key: &'static str) -> Result<i64, ClaimsError> {
    let number = match map.get(key) {
        Some(Value::Number(number)) => number,
        Some(other) => {
            return Err(ClaimsError::malformed(
                key,
                format!("expected a number, found {}", kind_of(other)),
            ))
        }
        None => return Err(ClaimsError::malformed(key, "missing")),
    };

    if let Some(value) = number.as_i64() {
        return Ok(value);
    }

    match number.as_f64() {
        Some(value) if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER => Ok(value as i64),
        _ => Err(ClaimsError::malformed(
            key,
            format!("{} is not an exact integer timestamp", number),
        )),
    }
}

fn read_string(map: &MapClaims, key: &'static str) -> Result<String, ClaimsError> {
    match map.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        None | Some(Value::Null) => Ok(String::new()),
        Some(other) => Err(ClaimsError::malformed(
            key,
            format!("expected a string, found {}", kind_of(other)),
        )),
    }
}

fn read_scopes(map: &MapClaims) -> Result<Vec<String>, ClaimsError> {
    match map.get(SCOPES_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(joined)) if joined.is_empty() => Ok(Vec::new()),
        Some(Value::String(joined)) => Ok(joined.split(SCOPE_SEPARATOR).map(String::from).collect()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(String::from).ok_or_else(|| {
                    ClaimsError::malformed(
                        SCOPES_KEY,
                        format!("expected string scopes, found {}", kind_of(item)),
                    )
                })
            })
            .collect(),
        Some(other) => Err(ClaimsError::malformed(
            SCOPES_KEY,
            format!("expected a string, found {}", kind_of(other)),
        )),
    }
}

// Principal fields fall back to their zero value when absent or mistyped.
fn read_variant_string(map: &MapClaims, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn read_variant_bool(map: &MapClaims, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn standard_claims(scope: &str) -> JwtClaims {
        JwtClaims {
            audience: "audience".to_string(),
            expires_at: 100,
            jti: "jti".to_string(),
            issued_at: 15,
            issuer: "issuer".to_string(),
            not_before: 5,
            subject: "subject".to_string(),
            scopes: vec![scope.to_string()],
            custom_claims: None,
        }
    }

    fn standard_map(scope: &str) -> MapClaims {
        let mut map = MapClaims::new();
        map.insert("aud".to_string(), json!("audience"));
        map.insert("exp".to_string(), json!(100.0));
        map.insert("jti".to_string(), json!("jti"));
        map.insert("iat".to_string(), json!(15.0));
        map.insert("iss".to_string(), json!("issuer"));
        map.insert("nbf".to_string(), json!(5.0));
        map.insert("sub".to_string(), json!("subject"));
        map.insert("Scopes".to_string(), json!(scope));
        map
    }

    fn assert_standard_map(map: &MapClaims) {
        assert_eq!(map["aud"], json!("audience"));
        assert_eq!(map["exp"], json!(100.0));
        assert_eq!(map["jti"], json!("jti"));
        assert_eq!(map["iat"], json!(15.0));
        assert_eq!(map["iss"], json!("issuer"));
        assert_eq!(map["nbf"], json!(5.0));
        assert_eq!(map["sub"], json!("subject"));
    }

    fn assert_standard_claims(claims: &JwtClaims) {
        assert_eq!(claims.audience, "audience");
        assert_eq!(claims.expires_at, 100);
        assert_eq!(claims.jti, "jti");
        assert_eq!(claims.issued_at, 15);
        assert_eq!(claims.issuer, "issuer");
        assert_eq!(claims.not_before, 5);
        assert_eq!(claims.subject, "subject");
    }

    #[test]
    fn user_claims_to_map() {
        let mut claims = standard_claims("user");
        claims.custom_claims = Some(
            UserClaims {
                user_id: "user_id".to_string(),
                org_id: "org_id".to_string(),
                email: "user@email.com".to_string(),
                is_api_user: false,
            }
            .into(),
        );

        let map = to_map_claims(&claims);
        assert_standard_map(&map);
        assert_eq!(map["Scopes"], json!("user"));
        assert_eq!(map["UserID"], json!("user_id"));
        assert_eq!(map["OrgID"], json!("org_id"));
        assert_eq!(map["Email"], json!("user@email.com"));
        assert_eq!(map["IsAPIUser"], json!(false));
        assert_eq!(map.len(), 12);
    }

    #[test]
    fn service_claims_to_map() {
        let mut claims = standard_claims("service");
        claims.custom_claims = Some(
            ServiceClaims {
                service_id: "service_id".to_string(),
            }
            .into(),
        );

        let map = to_map_claims(&claims);
        assert_standard_map(&map);
        assert_eq!(map["Scopes"], json!("service"));
        assert_eq!(map["ServiceID"], json!("service_id"));
        assert!(!map.contains_key("UserID"));
    }

    #[test]
    fn cluster_claims_to_map() {
        let mut claims = standard_claims("cluster");
        claims.custom_claims = Some(
            ClusterClaims {
                cluster_id: "cluster_id".to_string(),
            }
            .into(),
        );

        let map = to_map_claims(&claims);
        assert_standard_map(&map);
        assert_eq!(map["Scopes"], json!("cluster"));
        assert_eq!(map["ClusterID"], json!("cluster_id"));
    }

    #[test]
    fn unknown_scope_writes_no_principal_keys() {
        let map = to_map_claims(&standard_claims("admin"));
        assert_standard_map(&map);
        assert_eq!(map["Scopes"], json!("admin"));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn payload_not_selected_by_scope_is_not_written() {
        let mut claims = standard_claims("cluster");
        claims.custom_claims = Some(
            ServiceClaims {
                service_id: "service_id".to_string(),
            }
            .into(),
        );

        let map = to_map_claims(&claims);
        assert!(!map.contains_key("ServiceID"));
        assert!(!map.contains_key("ClusterID"));
    }

    #[test]
    fn multiple_scopes_are_comma_joined() {
        let mut claims = standard_claims("user");
        claims.scopes.push("admin".to_string());

        let map = to_map_claims(&claims);
        assert_eq!(map["Scopes"], json!("user,admin"));
        assert_eq!(from_map_claims(&map).unwrap().scopes, vec!["user", "admin"]);
    }

    #[test]
    fn map_to_user_claims() {
        let mut map = standard_map("user");
        map.insert("UserID".to_string(), json!("user_id"));
        map.insert("OrgID".to_string(), json!("org_id"));
        map.insert("Email".to_string(), json!("user@email.com"));
        map.insert("IsAPIUser".to_string(), json!(false));

        let claims = from_map_claims(&map).unwrap();
        assert_standard_claims(&claims);
        assert_eq!(claims.scopes, vec!["user"]);

        let user = claims.user_claims().unwrap();
        assert_eq!(user.user_id, "user_id");
        assert_eq!(user.org_id, "org_id");
        assert_eq!(user.email, "user@email.com");
        assert!(!user.is_api_user);
    }

    #[test]
    fn map_to_service_claims() {
        let mut map = standard_map("service");
        map.insert("ServiceID".to_string(), json!("service_id"));

        let claims = from_map_claims(&map).unwrap();
        assert_standard_claims(&claims);
        assert_eq!(claims.scopes, vec!["service"]);
        assert_eq!(claims.service_claims().unwrap().service_id, "service_id");
    }

    #[test]
    fn map_to_cluster_claims() {
        let mut map = standard_map("cluster");
        map.insert("ClusterID".to_string(), json!("cluster_id"));

        let claims = from_map_claims(&map).unwrap();
        assert_standard_claims(&claims);
        assert_eq!(claims.scopes, vec!["cluster"]);
        assert_eq!(claims.cluster_claims().unwrap().cluster_id, "cluster_id");
    }

    #[test]
    fn string_expiry_is_rejected() {
        let mut map = standard_map("cluster");
        map.insert("ClusterID".to_string(), json!("cluster_id"));
        map.insert("exp".to_string(), json!("12345"));

        match from_map_claims(&map) {
            Err(ClaimsError::MalformedStandardField { field, .. }) => assert_eq!(field, "exp"),
            other => panic!("expected malformed exp, got {:?}", other),
        }
    }

    #[test]
    fn missing_or_fractional_timestamps_are_rejected() {
        let mut map = standard_map("user");
        map.remove("iat");
        assert!(matches!(
            from_map_claims(&map),
            Err(ClaimsError::MalformedStandardField { field: "iat", .. })
        ));

        let mut map = standard_map("user");
        map.insert("nbf".to_string(), json!(5.5));
        assert!(matches!(
            from_map_claims(&map),
            Err(ClaimsError::MalformedStandardField { field: "nbf", .. })
        ));
    }

    #[test]
    fn integer_timestamps_are_accepted() {
        let mut map = standard_map("user");
        map.insert("exp".to_string(), json!(1_700_000_000_i64));

        assert_eq!(from_map_claims(&map).unwrap().expires_at, 1_700_000_000);
    }

    #[test]
    fn mistyped_string_claim_is_rejected() {
        let mut map = standard_map("user");
        map.insert("iss".to_string(), json!(42));

        assert!(matches!(
            from_map_claims(&map),
            Err(ClaimsError::MalformedStandardField { field: "iss", .. })
        ));
    }

    // Missing principal fields decode to zero values rather than failing.
    // This leniency is intentional and differs from the standard claims.
    #[test]
    fn missing_service_id_defaults_to_empty() {
        let claims = from_map_claims(&standard_map("service")).unwrap();
        assert_eq!(claims.service_claims().unwrap().service_id, "");
    }

    #[test]
    fn missing_user_fields_default_to_zero_values() {
        let mut map = standard_map("user");
        map.insert("UserID".to_string(), json!("user_id"));
        map.insert("IsAPIUser".to_string(), json!("yes"));

        let claims = from_map_claims(&map).unwrap();
        assert_eq!(
            claims.user_claims(),
            Some(&UserClaims {
                user_id: "user_id".to_string(),
                ..Default::default()
            })
        );
    }

    #[test]
    fn unknown_scope_decodes_without_principal() {
        let mut map = standard_map("admin");
        map.insert("UserID".to_string(), json!("user_id"));

        let claims = from_map_claims(&map).unwrap();
        assert_eq!(claims.claim_type(), ClaimType::Unknown);
        assert!(claims.custom_claims.is_none());
        assert_eq!(claims.scopes, vec!["admin"]);
    }

    #[test]
    fn scopes_accept_arrays_and_empty_values() {
        let mut map = standard_map("");
        assert!(from_map_claims(&map).unwrap().scopes.is_empty());

        map.remove("Scopes");
        assert!(from_map_claims(&map).unwrap().scopes.is_empty());

        map.insert("Scopes".to_string(), json!(["cluster"]));
        let claims = from_map_claims(&map).unwrap();
        assert_eq!(claims.claim_type(), ClaimType::Cluster);

        map.insert("Scopes".to_string(), json!(7));
        assert!(matches!(
            from_map_claims(&map),
            Err(ClaimsError::MalformedStandardField { field: "Scopes", .. })
        ));
    }
}
