//! # Configuration Module
//!
//! Loads the process-wide CORS defaults once at startup.
//!
//! ## Sources
//!
//! 1. An optional YAML file with a `cors:` mapping:
//!
//! ```yaml
//! cors:
//!   allowOrigin: "https://app.example.com"
//!   exposeHeaders: "x-total-count"
//!   allowCredentials: true
//!   maxAge: 3600
//!   allowMethods: "GET,POST"
//!   allowHeaders: "content-type"
//! ```
//!
//! 2. Environment variables, applied on top of the file:
//!
//! | Variable | Property |
//! |---|---|
//! | `BRRTCORS_ALLOW_ORIGIN` | `allowOrigin` |
//! | `BRRTCORS_EXPOSE_HEADERS` | `exposeHeaders` |
//! | `BRRTCORS_ALLOW_CREDENTIALS` | `allowCredentials` |
//! | `BRRTCORS_MAX_AGE` | `maxAge` |
//! | `BRRTCORS_ALLOW_METHODS` | `allowMethods` |
//! | `BRRTCORS_ALLOW_HEADERS` | `allowHeaders` |
//!
//! Anything left unset falls back to [`CorsDefaults::default`]. A value that
//! does not parse aborts startup.

use std::env;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::middleware::{
    CorsDefaults, CorsProperties, ALLOW_CREDENTIALS_KEY, ALLOW_HEADERS_KEY, ALLOW_METHODS_KEY,
    ALLOW_ORIGIN_KEY, EXPOSE_HEADERS_KEY, MAX_AGE_KEY, PROPERTY_KEYS,
};

/// Environment variable → property key
pub const ENV_OVERRIDES: [(&str, &str); 6] = [
    ("BRRTCORS_ALLOW_ORIGIN", ALLOW_ORIGIN_KEY),
    ("BRRTCORS_EXPOSE_HEADERS", EXPOSE_HEADERS_KEY),
    ("BRRTCORS_ALLOW_CREDENTIALS", ALLOW_CREDENTIALS_KEY),
    ("BRRTCORS_MAX_AGE", MAX_AGE_KEY),
    ("BRRTCORS_ALLOW_METHODS", ALLOW_METHODS_KEY),
    ("BRRTCORS_ALLOW_HEADERS", ALLOW_HEADERS_KEY),
];

/// Top-level layout of the YAML config file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cors: CorsProperties,
}

impl AppConfig {
    /// Parse a YAML config document
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig = serde_yaml::from_str(content).context("invalid config YAML")?;
        for key in config.cors.keys() {
            if !PROPERTY_KEYS.contains(&key.as_str()) {
                anyhow::bail!("unknown cors property '{key}'");
            }
        }
        Ok(config)
    }

    /// Read and parse a YAML config file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("failed to load config {}", path.display()))
    }
}

/// Overlay environment values onto `props`
///
/// `lookup` is `std::env::var` in production; tests pass a closure.
pub fn apply_env_overrides<F>(props: &mut CorsProperties, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in ENV_OVERRIDES {
        if let Some(value) = lookup(var) {
            debug!(var, key, "CORS property overridden from environment");
            props.insert(key.to_string(), Value::String(value));
        }
    }
}

/// Build [`CorsDefaults`] from an optional config file and the environment
pub fn load_cors_defaults(path: Option<&Path>) -> anyhow::Result<CorsDefaults> {
    let mut props = match path {
        Some(p) => AppConfig::from_file(p)?.cors,
        None => CorsProperties::new(),
    };
    apply_env_overrides(&mut props, |var| env::var(var).ok());

    let defaults = CorsDefaults::from_properties(&props)?;
    info!(
        allow_origin = %defaults.allow_origin,
        allow_credentials = defaults.allow_credentials,
        max_age = defaults.max_age,
        allow_methods = %defaults.allow_methods,
        "CORS defaults loaded"
    );
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_yaml_section() {
        let config = AppConfig::from_yaml(
            "cors:\n  allowOrigin: \"http://a.com\"\n  maxAge: 60\n  allowCredentials: \"true\"\n",
        )
        .unwrap();
        let defaults = CorsDefaults::from_properties(&config.cors).unwrap();
        assert_eq!(defaults.allow_origin, "http://a.com");
        assert_eq!(defaults.max_age, 60);
        assert!(defaults.allow_credentials);
        assert_eq!(defaults.allow_methods, "GET");
    }

    #[test]
    fn test_missing_section_and_empty_file() {
        assert!(AppConfig::from_yaml("http:\n  keep_alive: true\n").unwrap().cors.is_empty());
        assert!(AppConfig::from_yaml("").unwrap().cors.is_empty());
    }

    #[test]
    fn test_unknown_property_is_rejected() {
        let err = AppConfig::from_yaml("cors:\n  maxAage: 10\n").unwrap_err();
        assert!(err.to_string().contains("maxAage"));
    }

    #[test]
    fn test_env_overrides_win() {
        let mut props = AppConfig::from_yaml("cors:\n  maxAge: 60\n").unwrap().cors;
        let env: HashMap<&str, &str> = [
            ("BRRTCORS_MAX_AGE", "120"),
            ("BRRTCORS_ALLOW_HEADERS", "x-a"),
        ]
        .into_iter()
        .collect();
        apply_env_overrides(&mut props, |var| env.get(var).map(|v| v.to_string()));

        let defaults = CorsDefaults::from_properties(&props).unwrap();
        assert_eq!(defaults.max_age, 120);
        assert_eq!(defaults.allow_headers, "x-a");
    }

    #[test]
    fn test_malformed_env_value_fails() {
        let mut props = CorsProperties::new();
        apply_env_overrides(&mut props, |var| {
            (var == "BRRTCORS_ALLOW_CREDENTIALS").then(|| "yes".to_string())
        });
        assert!(CorsDefaults::from_properties(&props).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "cors:\n  allowMethods: \"GET,PUT\"\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(
            config.cors.get(ALLOW_METHODS_KEY),
            Some(&Value::String("GET,PUT".into()))
        );
    }
}
