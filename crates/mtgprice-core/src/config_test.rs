use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_known_values() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "MTGPRICE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:3000");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(
        cfg.stores_path,
        std::path::PathBuf::from("./config/stores.example.yaml")
    );
    assert_eq!(cfg.lookup_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "mtgprice/0.1 (price-checker)");
    assert_eq!(cfg.max_concurrent_lookups, 8);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MTGPRICE_BIND_ADDR"),
        "expected InvalidEnvVar(MTGPRICE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn lookup_timeout_override() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_LOOKUP_TIMEOUT_SECS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.lookup_timeout_secs, 3);
}

#[test]
fn lookup_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_LOOKUP_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MTGPRICE_LOOKUP_TIMEOUT_SECS"),
        "expected InvalidEnvVar(MTGPRICE_LOOKUP_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn lookup_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_LOOKUP_TIMEOUT_SECS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MTGPRICE_LOOKUP_TIMEOUT_SECS"
    ));
}

#[test]
fn max_concurrent_lookups_override() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_MAX_CONCURRENT_LOOKUPS", "32");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_concurrent_lookups, 32);
}

#[test]
fn max_concurrent_lookups_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_MAX_CONCURRENT_LOOKUPS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "MTGPRICE_MAX_CONCURRENT_LOOKUPS"),
        "expected InvalidEnvVar(MTGPRICE_MAX_CONCURRENT_LOOKUPS), got: {result:?}"
    );
}

#[test]
fn stores_path_and_user_agent_override() {
    let mut map = HashMap::new();
    map.insert("MTGPRICE_STORES_PATH", "/etc/mtgprice/stores.json");
    map.insert("MTGPRICE_USER_AGENT", "custom-agent/2.0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.stores_path,
        std::path::PathBuf::from("/etc/mtgprice/stores.json")
    );
    assert_eq!(cfg.user_agent, "custom-agent/2.0");
}

#[test]
fn default_stores_path_points_at_shipped_registry() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let workspace_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../..");
    let registry = crate::StoreRegistry::load(&workspace_root.join(&cfg.stores_path))
        .expect("default registry should load");
    assert!(!registry.is_empty());
}
