use crate::app_config::{AppConfig, Environment, PartnerApiConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let http_url = |var: &str, raw: String| -> Result<String, ConfigError> {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(trimmed.trim_end_matches('/').to_string())
        } else {
            Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("'{trimmed}' is not an http(s) URL"),
            })
        }
    };

    let env = parse_environment(&or_default("PAYA_ENV", "development"));

    let api_base_url = http_url(
        "PAYA_API_URL",
        or_default("PAYA_API_URL", "http://localhost:5001/api"),
    )?;

    let partner = match lookup("PAYA_PARTNER_API_URL").ok() {
        Some(raw) => {
            let base_url = http_url("PAYA_PARTNER_API_URL", raw)?;
            let api_key = lookup("PAYA_PARTNER_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar("PAYA_PARTNER_API_KEY".to_string()))?;
            Some(PartnerApiConfig { base_url, api_key })
        }
        None => None,
    };

    let state_dir = PathBuf::from(or_default("PAYA_STATE_DIR", "./.paya"));
    let log_level = or_default("PAYA_LOG_LEVEL", "info");
    let request_timeout_secs = parse_u64("PAYA_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("PAYA_USER_AGENT", "paya-merchant/0.1");

    Ok(AppConfig {
        env,
        api_base_url,
        partner,
        state_dir,
        log_level,
        request_timeout_secs,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
