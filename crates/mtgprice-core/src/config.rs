use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can use a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("MTGPRICE_ENV", "development"))?;

    let bind_addr = or_default("MTGPRICE_BIND_ADDR", "127.0.0.1:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("MTGPRICE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("MTGPRICE_LOG_LEVEL", "info");
    let stores_path = PathBuf::from(or_default(
        "MTGPRICE_STORES_PATH",
        "./config/stores.example.yaml",
    ));

    let lookup_timeout_secs = parse_u64("MTGPRICE_LOOKUP_TIMEOUT_SECS", "10")?;
    if lookup_timeout_secs == 0 {
        return Err(invalid(
            "MTGPRICE_LOOKUP_TIMEOUT_SECS",
            "must be at least 1 second".to_string(),
        ));
    }

    let user_agent = or_default("MTGPRICE_USER_AGENT", "mtgprice/0.1 (price-checker)");

    let max_concurrent_lookups = parse_usize("MTGPRICE_MAX_CONCURRENT_LOOKUPS", "8")?;
    if max_concurrent_lookups == 0 {
        return Err(invalid(
            "MTGPRICE_MAX_CONCURRENT_LOOKUPS",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        stores_path,
        lookup_timeout_secs,
        user_agent,
        max_concurrent_lookups,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "MTGPRICE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
