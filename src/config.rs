use chrono::{Duration, Utc};
use clap::{Arg, ArgMatches};
use std::str::FromStr;

use crate::error::ClaimsError;
use crate::jwt_core::ClaimsIssuer;

pub const DEFAULT_ISSUER: &str = "token_claims";
pub const DEFAULT_AUDIENCE: &str = "token_claims";
pub const DEFAULT_TTL_SECS: &str = "3600";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ClaimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ClaimsError::Config(format!("unknown output format '{}'", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub signing_key: Option<String>,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
    pub format: OutputFormat,
    pub log_level: String,
}

/// Top-level options shared by every subcommand.
pub fn settings_args<'a, 'b>() -> Vec<Arg<'a, 'b>> {
    vec![
        Arg::with_name("signing-key")
            .help("HMAC key used to sign and verify tokens")
            .long("signing-key")
            .env("CLAIMS_SIGNING_KEY")
            .hide_env_values(true)
            .takes_value(true),
        Arg::with_name("issuer")
            .help("Issuer written into new tokens")
            .long("issuer")
            .env("CLAIMS_ISSUER")
            .takes_value(true)
            .default_value(DEFAULT_ISSUER),
        Arg::with_name("audience")
            .help("Audience written into new tokens and required when verifying")
            .long("audience")
            .env("CLAIMS_AUDIENCE")
            .takes_value(true)
            .default_value(DEFAULT_AUDIENCE),
        Arg::with_name("ttl")
            .help("Lifetime of new tokens in seconds")
            .long("ttl")
            .env("CLAIMS_TTL_SECS")
            .takes_value(true)
            .allow_hyphen_values(true)
            .default_value(DEFAULT_TTL_SECS),
        Arg::with_name("format")
            .help("The output format (text, json)")
            .short("f")
            .long("format")
            .takes_value(true)
            .possible_values(&["text", "json"])
            .default_value("text"),
        Arg::with_name("log-level")
            .help("Log level when RUST_LOG is not set")
            .long("log-level")
            .takes_value(true)
            .default_value("warn"),
    ]
}

impl Settings {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ClaimsError> {
        let ttl_secs = matches.value_of("ttl").unwrap_or(DEFAULT_TTL_SECS);
        let ttl = ttl_secs
            .parse::<i64>()
            .ok()
            .filter(|secs| *secs > 0)
            .and_then(Duration::try_seconds)
            .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
            .ok_or_else(|| {
                ClaimsError::Config(format!(
                    "ttl must be a positive number of seconds within the representable range, got '{}'",
                    ttl_secs
                ))
            })?;

        Ok(Settings {
            signing_key: matches
                .value_of("signing-key")
                .filter(|key| !key.is_empty())
                .map(String::from),
            issuer: matches.value_of("issuer").unwrap_or(DEFAULT_ISSUER).to_string(),
            audience: matches.value_of("audience").unwrap_or(DEFAULT_AUDIENCE).to_string(),
            ttl,
            format: matches.value_of("format").unwrap_or("text").parse()?,
            log_level: matches.value_of("log-level").unwrap_or("warn").to_string(),
        })
    }

    pub fn signing_key(&self) -> Result<&str, ClaimsError> {
        self.signing_key.as_deref().ok_or_else(|| {
            ClaimsError::Config("a signing key is required (--signing-key or CLAIMS_SIGNING_KEY)".to_string())
        })
    }

    pub fn claims_issuer(&self) -> ClaimsIssuer {
        ClaimsIssuer::new(self.issuer.as_str(), self.audience.as_str(), self.ttl)
    }
}
