use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CorsConfigError, Tristate};

/// Reserved `maxAge` value meaning "not declared"
pub const UNSET_MAX_AGE: i32 = -1;

/// Simple-response CORS declaration (`x-cors`)
///
/// Every field is sparse: an empty string or `Tristate::Unset` means the
/// value is inherited from the next-outer tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CorsDeclaration {
    /// `"*"` or a single origin URI. `"*"` cannot be combined with credentials
    /// in browsers; this is not validated.
    pub allow_origin: String,
    /// Comma-separated header names
    pub expose_headers: String,
    pub allow_credentials: Tristate,
}

/// Preflight CORS declaration (`x-cors-preflight`)
///
/// Same sparse semantics as [`CorsDeclaration`]; `max_age` uses
/// [`UNSET_MAX_AGE`] as its absent marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PreflightDeclaration {
    pub allow_origin: String,
    /// Preflight cache lifetime in seconds
    pub max_age: i32,
    /// Comma-separated method names
    pub allow_methods: String,
    /// Comma-separated header names
    pub allow_headers: String,
    pub allow_credentials: Tristate,
}

impl Default for PreflightDeclaration {
    fn default() -> Self {
        Self {
            allow_origin: String::new(),
            max_age: UNSET_MAX_AGE,
            allow_methods: String::new(),
            allow_headers: String::new(),
            allow_credentials: Tristate::Unset,
        }
    }
}

impl CorsDeclaration {
    /// Parse an `x-cors` extension value
    ///
    /// Returns `Ok(None)` when the extension is `false` or `null`.
    pub fn from_extension(value: &Value, location: &str) -> Result<Option<Self>, CorsConfigError> {
        parse_declaration(value, location)
    }
}

impl PreflightDeclaration {
    /// Parse an `x-cors-preflight` extension value
    ///
    /// Returns `Ok(None)` when the extension is `false` or `null`.
    pub fn from_extension(value: &Value, location: &str) -> Result<Option<Self>, CorsConfigError> {
        parse_declaration(value, location)
    }

    /// Declared max age, `None` for the sentinel
    #[must_use]
    pub fn declared_max_age(&self) -> Option<i32> {
        (self.max_age != UNSET_MAX_AGE).then_some(self.max_age)
    }
}

fn parse_declaration<T>(value: &Value, location: &str) -> Result<Option<T>, CorsConfigError>
where
    T: DeserializeOwned + Default,
{
    match value {
        Value::Null | Value::Bool(false) => Ok(None),
        // `x-cors: true` declares with every field left to the outer tiers
        Value::Bool(true) => Ok(Some(T::default())),
        Value::Object(_) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| CorsConfigError::InvalidDeclaration {
                location: location.to_string(),
                message: e.to_string(),
            }),
        other => Err(CorsConfigError::InvalidDeclaration {
            location: location.to_string(),
            message: format!("expected an object or boolean, found {other}"),
        }),
    }
}

/// Declarations attached to one route, per tier
///
/// The resource tier comes from the path item, the method tier from the
/// operation itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteCorsDeclarations {
    pub resource_simple: Option<CorsDeclaration>,
    pub resource_preflight: Option<PreflightDeclaration>,
    pub method_simple: Option<CorsDeclaration>,
    pub method_preflight: Option<PreflightDeclaration>,
}

impl RouteCorsDeclarations {
    /// `true` when no tier declares anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resource_simple.is_none()
            && self.resource_preflight.is_none()
            && self.method_simple.is_none()
            && self.method_preflight.is_none()
    }

    pub fn with_resource_simple(mut self, decl: CorsDeclaration) -> Self {
        self.resource_simple = Some(decl);
        self
    }

    pub fn with_resource_preflight(mut self, decl: PreflightDeclaration) -> Self {
        self.resource_preflight = Some(decl);
        self
    }

    pub fn with_method_simple(mut self, decl: CorsDeclaration) -> Self {
        self.method_simple = Some(decl);
        self
    }

    pub fn with_method_preflight(mut self, decl: PreflightDeclaration) -> Self {
        self.method_preflight = Some(decl);
        self
    }
}
