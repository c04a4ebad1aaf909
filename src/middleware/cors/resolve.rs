//! Three-tier policy resolution.
//!
//! Resolution starts from [`CorsDefaults`], then applies the resource-level
//! declaration, then the method-level declaration. Each tier replaces a field
//! only when it declares a non-absent value for it, so precedence is decided
//! per field rather than per record.

use serde::Serialize;

use super::declaration::UNSET_MAX_AGE;
use super::{CorsConfigError, CorsDeclaration, CorsDefaults, PreflightDeclaration, Tristate};

/// Effective policy for simple (non-preflight) responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplePolicy {
    pub allow_origin: String,
    pub expose_headers: String,
    pub allow_credentials: bool,
}

/// Effective policy for preflight (OPTIONS) responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightPolicy {
    pub allow_origin: String,
    pub max_age: i32,
    pub allow_methods: String,
    pub allow_headers: String,
    pub allow_credentials: bool,
}

/// Mutable working copy used while the tiers are applied
struct SimpleBuilder {
    allow_origin: String,
    expose_headers: String,
    allow_credentials: Tristate,
}

impl SimpleBuilder {
    fn from_defaults(defaults: &CorsDefaults) -> Self {
        Self {
            allow_origin: defaults.allow_origin.clone(),
            expose_headers: defaults.expose_headers.clone(),
            allow_credentials: Tristate::from(defaults.allow_credentials),
        }
    }

    fn apply(&mut self, decl: &CorsDeclaration) {
        override_string(&mut self.allow_origin, &decl.allow_origin);
        override_string(&mut self.expose_headers, &decl.expose_headers);
        self.allow_credentials = decl.allow_credentials.or(self.allow_credentials);
    }

    fn build(self) -> Result<SimplePolicy, CorsConfigError> {
        Ok(SimplePolicy {
            allow_origin: self.allow_origin,
            expose_headers: self.expose_headers,
            allow_credentials: collapse(self.allow_credentials)?,
        })
    }
}

struct PreflightBuilder {
    allow_origin: String,
    max_age: i32,
    allow_methods: String,
    allow_headers: String,
    allow_credentials: Tristate,
}

impl PreflightBuilder {
    fn from_defaults(defaults: &CorsDefaults) -> Self {
        Self {
            allow_origin: defaults.allow_origin.clone(),
            max_age: defaults.max_age,
            allow_methods: defaults.allow_methods.clone(),
            allow_headers: defaults.allow_headers.clone(),
            allow_credentials: Tristate::from(defaults.allow_credentials),
        }
    }

    fn apply(&mut self, decl: &PreflightDeclaration) {
        override_string(&mut self.allow_origin, &decl.allow_origin);
        if decl.max_age != UNSET_MAX_AGE {
            self.max_age = decl.max_age;
        }
        override_string(&mut self.allow_methods, &decl.allow_methods);
        override_string(&mut self.allow_headers, &decl.allow_headers);
        self.allow_credentials = decl.allow_credentials.or(self.allow_credentials);
    }

    fn build(self) -> Result<PreflightPolicy, CorsConfigError> {
        Ok(PreflightPolicy {
            allow_origin: self.allow_origin,
            max_age: self.max_age,
            allow_methods: self.allow_methods,
            allow_headers: self.allow_headers,
            allow_credentials: collapse(self.allow_credentials)?,
        })
    }
}

fn override_string(slot: &mut String, declared: &str) {
    if !declared.is_empty() {
        declared.clone_into(slot);
    }
}

fn collapse(flag: Tristate) -> Result<bool, CorsConfigError> {
    flag.as_bool().ok_or(CorsConfigError::UnresolvedCredentials)
}

/// Resolve the effective simple policy for a route
///
/// # Errors
///
/// [`CorsConfigError::UnresolvedCredentials`] if `allowCredentials` is still
/// unset after every tier. `CorsDefaults` always holds a concrete boolean, so
/// this does not happen for defaults built through this crate.
pub fn resolve_simple(
    defaults: &CorsDefaults,
    resource: Option<&CorsDeclaration>,
    method: Option<&CorsDeclaration>,
) -> Result<SimplePolicy, CorsConfigError> {
    let mut builder = SimpleBuilder::from_defaults(defaults);
    for decl in [resource, method].into_iter().flatten() {
        builder.apply(decl);
    }
    builder.build()
}

/// Resolve the effective preflight policy for a route
///
/// # Errors
///
/// Same as [`resolve_simple`].
pub fn resolve_preflight(
    defaults: &CorsDefaults,
    resource: Option<&PreflightDeclaration>,
    method: Option<&PreflightDeclaration>,
) -> Result<PreflightPolicy, CorsConfigError> {
    let mut builder = PreflightBuilder::from_defaults(defaults);
    for decl in [resource, method].into_iter().flatten() {
        builder.apply(decl);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(origin: &str, expose: &str, creds: Tristate) -> CorsDeclaration {
        CorsDeclaration {
            allow_origin: origin.into(),
            expose_headers: expose.into(),
            allow_credentials: creds,
        }
    }

    #[test]
    fn test_no_declarations_yield_defaults() {
        let defaults = CorsDefaults::default();
        let policy = resolve_simple(&defaults, None, None).unwrap();
        assert_eq!(
            policy,
            SimplePolicy {
                allow_origin: "*".into(),
                expose_headers: String::new(),
                allow_credentials: false,
            }
        );

        let policy = resolve_preflight(&defaults, None, None).unwrap();
        assert_eq!(
            policy,
            PreflightPolicy {
                allow_origin: "*".into(),
                max_age: 86400,
                allow_methods: "GET".into(),
                allow_headers: String::new(),
                allow_credentials: false,
            }
        );
    }

    #[test]
    fn test_method_beats_resource_beats_default() {
        let defaults = CorsDefaults::default();
        let resource = simple("http://resource.com", "x-resource", Tristate::True);
        let method = simple("http://method.com", "x-method", Tristate::False);

        let policy = resolve_simple(&defaults, Some(&resource), Some(&method)).unwrap();
        assert_eq!(policy.allow_origin, "http://method.com");
        assert_eq!(policy.expose_headers, "x-method");
        assert!(!policy.allow_credentials);

        let policy = resolve_simple(&defaults, Some(&resource), None).unwrap();
        assert_eq!(policy.allow_origin, "http://resource.com");
        assert_eq!(policy.expose_headers, "x-resource");
        assert!(policy.allow_credentials);
    }

    #[test]
    fn test_precedence_is_per_field() {
        let defaults = CorsDefaults {
            expose_headers: "x-global".into(),
            ..CorsDefaults::default()
        };
        let resource = simple("http://resource.com", "", Tristate::Unset);
        let method = simple("", "", Tristate::True);

        let policy = resolve_simple(&defaults, Some(&resource), Some(&method)).unwrap();
        assert_eq!(policy.allow_origin, "http://resource.com");
        assert_eq!(policy.expose_headers, "x-global");
        assert!(policy.allow_credentials);
    }

    #[test]
    fn test_explicit_false_overrides_true_default() {
        let defaults = CorsDefaults {
            allow_credentials: true,
            ..CorsDefaults::default()
        };
        let method = simple("", "", Tristate::False);
        let policy = resolve_simple(&defaults, None, Some(&method)).unwrap();
        assert!(!policy.allow_credentials);
    }

    #[test]
    fn test_preflight_max_age_sentinel_is_ignored() {
        let defaults = CorsDefaults::default();
        let resource = PreflightDeclaration {
            max_age: 600,
            ..PreflightDeclaration::default()
        };
        let method = PreflightDeclaration {
            allow_methods: "POST".into(),
            ..PreflightDeclaration::default()
        };
        let policy = resolve_preflight(&defaults, Some(&resource), Some(&method)).unwrap();
        assert_eq!(policy.max_age, 600);
        assert_eq!(policy.allow_methods, "POST");
        assert_eq!(policy.allow_origin, "*");
    }

    #[test]
    fn test_preflight_zero_max_age_is_a_value() {
        let defaults = CorsDefaults::default();
        let method = PreflightDeclaration {
            max_age: 0,
            ..PreflightDeclaration::default()
        };
        let policy = resolve_preflight(&defaults, None, Some(&method)).unwrap();
        assert_eq!(policy.max_age, 0);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let defaults = CorsDefaults::default();
        let resource = PreflightDeclaration {
            allow_headers: "x-a".into(),
            allow_credentials: Tristate::True,
            ..PreflightDeclaration::default()
        };
        let first = resolve_preflight(&defaults, Some(&resource), None).unwrap();
        let second = resolve_preflight(&defaults, Some(&resource), None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_collapse_rejects_unset() {
        assert_eq!(collapse(Tristate::Unset), Err(CorsConfigError::UnresolvedCredentials));
        assert_eq!(collapse(Tristate::True), Ok(true));
    }
}
