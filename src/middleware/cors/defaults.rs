use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::CorsConfigError;

/// Raw configuration properties, keyed by the `*_KEY` constants below
pub type CorsProperties = HashMap<String, Value>;

pub const ALLOW_ORIGIN_KEY: &str = "allowOrigin";
pub const EXPOSE_HEADERS_KEY: &str = "exposeHeaders";
pub const ALLOW_CREDENTIALS_KEY: &str = "allowCredentials";
pub const MAX_AGE_KEY: &str = "maxAge";
pub const ALLOW_METHODS_KEY: &str = "allowMethods";
pub const ALLOW_HEADERS_KEY: &str = "allowHeaders";

/// Every recognised property key
pub const PROPERTY_KEYS: [&str; 6] = [
    ALLOW_ORIGIN_KEY,
    EXPOSE_HEADERS_KEY,
    ALLOW_CREDENTIALS_KEY,
    MAX_AGE_KEY,
    ALLOW_METHODS_KEY,
    ALLOW_HEADERS_KEY,
];

/// One day, in seconds
pub const DEFAULT_MAX_AGE: i32 = 24 * 3600;

/// Process-wide CORS defaults, the last tier of every resolution
///
/// Unlike route declarations every field holds a concrete value. Build once at
/// startup and pass by reference to the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsDefaults {
    pub allow_origin: String,
    pub expose_headers: String,
    pub allow_credentials: bool,
    pub max_age: i32,
    pub allow_methods: String,
    pub allow_headers: String,
}

impl Default for CorsDefaults {
    /// Hardcoded fallbacks used for any property that is not configured
    ///
    /// - `allowOrigin`: `"*"`
    /// - `exposeHeaders`: `""`
    /// - `allowCredentials`: `false`
    /// - `maxAge`: `86400`
    /// - `allowMethods`: `"GET"`
    /// - `allowHeaders`: `""`
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            expose_headers: String::new(),
            allow_credentials: false,
            max_age: DEFAULT_MAX_AGE,
            allow_methods: "GET".to_string(),
            allow_headers: String::new(),
        }
    }
}

impl CorsDefaults {
    /// Build defaults from configuration properties
    ///
    /// Missing keys fall back to [`CorsDefaults::default`]. Strings must be
    /// strings; `maxAge` accepts an integer or its decimal string form;
    /// `allowCredentials` accepts a boolean or `"true"`/`"false"` in any case.
    ///
    /// # Errors
    ///
    /// Returns [`CorsConfigError::InvalidProperty`] for any value that does not
    /// parse as its expected type.
    pub fn from_properties(props: &CorsProperties) -> Result<Self, CorsConfigError> {
        let fallback = Self::default();
        Ok(Self {
            allow_origin: string_prop(props, ALLOW_ORIGIN_KEY, fallback.allow_origin)?,
            expose_headers: string_prop(props, EXPOSE_HEADERS_KEY, fallback.expose_headers)?,
            allow_credentials: bool_prop(
                props,
                ALLOW_CREDENTIALS_KEY,
                fallback.allow_credentials,
            )?,
            max_age: int_prop(props, MAX_AGE_KEY, fallback.max_age)?,
            allow_methods: string_prop(props, ALLOW_METHODS_KEY, fallback.allow_methods)?,
            allow_headers: string_prop(props, ALLOW_HEADERS_KEY, fallback.allow_headers)?,
        })
    }
}

fn invalid(key: &str, expected: &'static str, value: &Value) -> CorsConfigError {
    CorsConfigError::InvalidProperty {
        key: key.to_string(),
        expected,
        value: value.to_string(),
    }
}

fn string_prop(
    props: &CorsProperties,
    key: &str,
    default: String,
) -> Result<String, CorsConfigError> {
    match props.get(key) {
        None => Ok(default),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(invalid(key, "string", other)),
    }
}

fn int_prop(props: &CorsProperties, key: &str, default: i32) -> Result<i32, CorsConfigError> {
    let value = match props.get(key) {
        None => return Ok(default),
        Some(v) => v,
    };
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(key, "int", value))
}

fn bool_prop(props: &CorsProperties, key: &str, default: bool) -> Result<bool, CorsConfigError> {
    let value = match props.get(key) {
        None => return Ok(default),
        Some(v) => v,
    };
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(invalid(key, "bool", other)),
    }
}
