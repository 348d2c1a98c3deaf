use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use colored::*;
use rayon::prelude::*;
use std::error::Error;
use std::process;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use token_claims::config::{settings_args, Settings};
use token_claims::error::ClaimsError;
use token_claims::helpers::print_output;
use token_claims::jwt_core::{decode_unverified, from_map_claims, parse_token, sign_claims};
use token_claims::types::{JwtClaims, Output};

fn main() -> Result<(), Box<dyn Error>> {
    let matches = build_app().get_matches();
    let settings = Settings::from_matches(&matches)?;

    init_logging(&settings.log_level);
    info!(issuer = %settings.issuer, audience = %settings.audience, "token_claims starting");

    match run(&settings, &matches) {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "[!]".red(), e.to_string().red());
            process::exit(2);
        }
    }
}

fn build_app<'a, 'b>() -> App<'a, 'b> {
    App::new("token_claims")
        .version("1.0")
        .about("Issues, verifies and inspects JWTs carrying user, service or cluster claims")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .args(&settings_args())
        .subcommand(
            SubCommand::with_name("issue")
                .about("Sign a new token for a principal")
                .setting(AppSettings::SubcommandRequiredElseHelp)
                .subcommand(
                    SubCommand::with_name("user")
                        .arg(Arg::with_name("user-id").long("user-id").takes_value(true).required(true))
                        .arg(Arg::with_name("org-id").long("org-id").takes_value(true).required(true))
                        .arg(Arg::with_name("email").long("email").takes_value(true))
                        .arg(Arg::with_name("api-user").long("api-user").help("Issue an API user token")),
                )
                .subcommand(
                    SubCommand::with_name("service")
                        .arg(Arg::with_name("service-id").long("service-id").takes_value(true).required(true)),
                )
                .subcommand(
                    SubCommand::with_name("cluster")
                        .arg(Arg::with_name("cluster-id").long("cluster-id").takes_value(true).required(true)),
                ),
        )
        .subcommand(
            SubCommand::with_name("verify")
                .about("Verify tokens and print their principals")
                .arg(
                    Arg::with_name("token")
                        .help("The JWT tokens to verify")
                        .required(true)
                        .multiple(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("any-audience")
                        .long("any-audience")
                        .help("Skip the audience check"),
                ),
        )
        .subcommand(
            SubCommand::with_name("inspect")
                .about("Decode a token without checking its signature")
                .arg(
                    Arg::with_name("token")
                        .help("The JWT token to inspect")
                        .required(true)
                        .index(1),
                ),
        )
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

/// Returns `Ok(false)` when any verified token was rejected.
fn run(settings: &Settings, matches: &ArgMatches) -> Result<bool, ClaimsError> {
    match matches.subcommand() {
        ("issue", Some(issue)) => {
            let claims = issue_claims(settings, issue)?;
            let token = sign_claims(&claims, settings.signing_key()?)?;
            print_output(settings.format, &Output::issued(token, claims));
            Ok(true)
        }
        ("verify", Some(verify)) => {
            let key = settings.signing_key()?;
            let audience = if verify.is_present("any-audience") {
                None
            } else {
                Some(settings.audience.as_str())
            };

            let tokens: Vec<&str> = verify.values_of("token").into_iter().flatten().collect();
            let outputs: Vec<Output> = tokens
                .par_iter()
                .map(|token| match parse_token(token, key, audience) {
                    Ok(claims) => Output::valid(claims, "signature and expiry verified"),
                    Err(e) => {
                        warn!(error = %e, "token rejected");
                        Output::rejected(token, e.to_string())
                    }
                })
                .collect();

            for output in &outputs {
                print_output(settings.format, output);
            }
            Ok(!outputs.iter().any(Output::is_rejected))
        }
        ("inspect", Some(inspect)) => {
            let token = inspect.value_of("token").ok_or(ClaimsError::InvalidFormat)?;
            let claims = from_map_claims(&decode_unverified(token)?)?;
            print_output(settings.format, &Output::unverified(claims));
            Ok(true)
        }
        _ => Ok(true),
    }
}

fn issue_claims(settings: &Settings, matches: &ArgMatches) -> Result<JwtClaims, ClaimsError> {
    let issuer = settings.claims_issuer();

    let claims = match matches.subcommand() {
        ("user", Some(user)) => {
            let user_id = user.value_of("user-id").unwrap_or_default();
            let org_id = user.value_of("org-id").unwrap_or_default();
            if user.is_present("api-user") {
                issuer.for_api_user(user_id, org_id)?
            } else {
                issuer.for_user(user_id, org_id, user.value_of("email").unwrap_or_default())?
            }
        }
        ("service", Some(service)) => {
            issuer.for_service(service.value_of("service-id").unwrap_or_default())?
        }
        ("cluster", Some(cluster)) => {
            issuer.for_cluster(cluster.value_of("cluster-id").unwrap_or_default())?
        }
        (other, _) => {
            return Err(ClaimsError::Config(format!("unknown principal kind '{}'", other)))
        }
    };

    info!(claim_type = %claims.claim_type(), subject = %claims.subject, "issuing token");
    Ok(claims)
}
