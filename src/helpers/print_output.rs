use chrono::{DateTime, Utc};
use colored::*;

use crate::config::OutputFormat;
use crate::types::{CustomClaims, JwtClaims, Output};

pub fn print_output(format: OutputFormat, output: &Output) {
    println!("{}", render_output(format, output));
}

pub fn render_output(format: OutputFormat, output: &Output) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string(output).unwrap_or_else(|e| json_error(&e.to_string()))
        }
        OutputFormat::Text => render_text(output),
    }
}

fn json_error(detail: &str) -> String {
    serde_json::json!({ "status": "error", "detail": detail }).to_string()
}

fn render_text(output: &Output) -> String {
    let mut report = String::new();

    match output.status.as_str() {
        "rejected" => {
            report.push_str(&format!("{} Token rejected: {}\n", "[!]".red(), output.detail.red()));
            if let Some(token) = &output.token {
                report.push_str(&format!("    {}\n", token.bright_blue()));
            }
            return report;
        }
        "issued" => {
            report.push_str(&format!("{} Issued {} token\n", "[+]".green(), output.claim_type));
            if let Some(token) = &output.token {
                report.push_str(&format!("{}\n", token.bright_blue()));
            }
        }
        _ => {
            report.push_str(&format!(
                "{} {} claims ({})\n",
                "[+]".green(),
                output.claim_type,
                output.detail.yellow()
            ));
        }
    }

    if let Some(claims) = &output.claims {
        report.push_str(&render_claims(claims));
    }

    report
}

fn render_claims(claims: &JwtClaims) -> String {
    let mut report = String::new();
    report.push_str(&"\nToken payload values:\n".yellow());

    for (field, value) in [
        ("aud", &claims.audience),
        ("jti", &claims.jti),
        ("iss", &claims.issuer),
        ("sub", &claims.subject),
    ] {
        report.push_str(&format!("[+] {} = \"{}\"\n", field, value.bright_blue()));
    }

    for (field, timestamp) in [
        ("iat", claims.issued_at),
        ("exp", claims.expires_at),
        ("nbf", claims.not_before),
    ] {
        report.push_str(&format!(
            "[+] {} = {}    ==> TIMESTAMP = {}\n",
            field,
            timestamp.to_string().bright_blue(),
            decode_timestamp(timestamp).bright_blue()
        ));
    }

    report.push_str(&format!("[+] Scopes = \"{}\"\n", claims.scopes.join(",").bright_blue()));

    match &claims.custom_claims {
        Some(CustomClaims::User(user)) => {
            report.push_str(&format!("[+] UserID = \"{}\"\n", user.user_id.bright_blue()));
            report.push_str(&format!("[+] OrgID = \"{}\"\n", user.org_id.bright_blue()));
            report.push_str(&format!("[+] Email = \"{}\"\n", user.email.bright_blue()));
            report.push_str(&format!(
                "[+] IsAPIUser = {}\n",
                user.is_api_user.to_string().bright_blue()
            ));
        }
        Some(CustomClaims::Service(service)) => {
            report.push_str(&format!("[+] ServiceID = \"{}\"\n", service.service_id.bright_blue()));
        }
        Some(CustomClaims::Cluster(cluster)) => {
            report.push_str(&format!("[+] ClusterID = \"{}\"\n", cluster.cluster_id.bright_blue()));
        }
        None => {
            report.push_str(&format!("{} No principal claims attached\n", "[-]".yellow()));
        }
    }

    report
}

fn decode_timestamp(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(utc) => utc.format("%Y-%m-%d %H:%M:%S (UTC)").to_string(),
        None => "out of range".to_string(),
    }
}
