use std::fmt;

use http::Method;
use serde::Serialize;
use tracing::{debug, error};

use super::{
    resolve_preflight, resolve_simple, CorsConfigError, CorsDefaults, PreflightEmitter,
    RouteCorsDeclarations, SimpleEmitter,
};
use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::spec::RouteMeta;

/// Why a route's declarations were rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorsIssueKind {
    /// `x-cors` on an operation bound to OPTIONS
    SimpleOnOptions,
    /// `x-cors-preflight` on an operation not bound to OPTIONS
    PreflightOnNonOptions,
}

/// A rejected declaration combination
///
/// Rejection is not fatal: the route is served without CORS headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsDeclarationIssue {
    /// `METHOD /path (handler)`
    pub location: String,
    pub kind: CorsIssueKind,
}

impl fmt::Display for CorsDeclarationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            CorsIssueKind::SimpleOnOptions => write!(
                f,
                "{} declares x-cors, which is not applicable to OPTIONS operations",
                self.location
            ),
            CorsIssueKind::PreflightOnNonOptions => write!(
                f,
                "{} declares x-cors-preflight, which is only applicable to OPTIONS operations",
                self.location
            ),
        }
    }
}

/// CORS behaviour attached to a single route
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RouteCors {
    /// No declaration applies; responses pass through untouched
    Transparent,
    Simple(SimpleEmitter),
    Preflight(PreflightEmitter),
    /// Invalid declarations; responses pass through untouched
    Rejected(CorsDeclarationIssue),
}

impl RouteCors {
    /// Run the attached emitter, if any
    pub fn emit(&self, req: &HandlerRequest, res: &mut HandlerResponse) {
        match self {
            RouteCors::Simple(emitter) => emitter.emit(req, res),
            RouteCors::Preflight(emitter) => emitter.emit(req, res),
            RouteCors::Transparent | RouteCors::Rejected(_) => {}
        }
    }

    /// `true` when an emitter is attached
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, RouteCors::Simple(_) | RouteCors::Preflight(_))
    }

    /// Rejection details, if the route was rejected
    #[must_use]
    pub fn issue(&self) -> Option<&CorsDeclarationIssue> {
        match self {
            RouteCors::Rejected(issue) => Some(issue),
            _ => None,
        }
    }
}

/// Decide which emitter applies to a route and materialise its policy
///
/// | Declarations | Outcome |
/// |---|---|
/// | method `x-cors` on OPTIONS | `Rejected` |
/// | method `x-cors-preflight` on non-OPTIONS | `Rejected` |
/// | resource `x-cors` on OPTIONS | simple branch skipped |
/// | resource `x-cors-preflight` on non-OPTIONS | preflight branch skipped |
/// | either tier `x-cors` | `Simple` |
/// | either tier `x-cors-preflight` | `Preflight` |
/// | nothing | `Transparent` |
///
/// # Errors
///
/// Propagates [`CorsConfigError::UnresolvedCredentials`] from resolution.
pub fn classify(
    defaults: &CorsDefaults,
    decls: &RouteCorsDeclarations,
    is_options: bool,
    location: &str,
) -> Result<RouteCors, CorsConfigError> {
    if is_options && decls.method_simple.is_some() {
        return Ok(reject(location, CorsIssueKind::SimpleOnOptions));
    }
    if !is_options && decls.method_preflight.is_some() {
        return Ok(reject(location, CorsIssueKind::PreflightOnNonOptions));
    }

    let wants_simple = decls.resource_simple.is_some() || decls.method_simple.is_some();
    // Resource-level x-cors never applies to OPTIONS operations
    if wants_simple && (!is_options || decls.resource_simple.is_none()) {
        let policy = resolve_simple(
            defaults,
            decls.resource_simple.as_ref(),
            decls.method_simple.as_ref(),
        )?;
        debug!(location = %location, policy = ?policy, "Attached simple CORS emitter");
        return Ok(RouteCors::Simple(SimpleEmitter::new(policy)));
    }

    let wants_preflight = decls.resource_preflight.is_some() || decls.method_preflight.is_some();
    // Resource-level x-cors-preflight only applies to OPTIONS operations
    if wants_preflight && (is_options || decls.resource_preflight.is_none()) {
        let policy = resolve_preflight(
            defaults,
            decls.resource_preflight.as_ref(),
            decls.method_preflight.as_ref(),
        )?;
        debug!(location = %location, policy = ?policy, "Attached preflight CORS emitter");
        return Ok(RouteCors::Preflight(PreflightEmitter::new(policy)));
    }

    Ok(RouteCors::Transparent)
}

/// [`classify`] for a route loaded from an OpenAPI document
///
/// # Errors
///
/// Same as [`classify`].
pub fn classify_route(
    defaults: &CorsDefaults,
    route: &RouteMeta,
) -> Result<RouteCors, CorsConfigError> {
    classify(
        defaults,
        &route.cors,
        route.method == Method::OPTIONS,
        &route.location(),
    )
}

fn reject(location: &str, kind: CorsIssueKind) -> RouteCors {
    let issue = CorsDeclarationIssue {
        location: location.to_string(),
        kind,
    };
    error!(location = %location, kind = ?kind, "{}", issue);
    RouteCors::Rejected(issue)
}
