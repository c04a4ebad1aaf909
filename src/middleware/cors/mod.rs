mod classify;
mod declaration;
mod defaults;
mod emit;
mod error;
pub mod headers;
mod resolve;
mod tristate;

pub use classify::{classify, classify_route, CorsDeclarationIssue, CorsIssueKind, RouteCors};
pub use declaration::{
    CorsDeclaration, PreflightDeclaration, RouteCorsDeclarations, UNSET_MAX_AGE,
};
pub use defaults::{
    CorsDefaults, CorsProperties, ALLOW_CREDENTIALS_KEY, ALLOW_HEADERS_KEY, ALLOW_METHODS_KEY,
    ALLOW_ORIGIN_KEY, DEFAULT_MAX_AGE, EXPOSE_HEADERS_KEY, MAX_AGE_KEY, PROPERTY_KEYS,
};
pub use emit::{PreflightEmitter, SimpleEmitter};
pub use error::CorsConfigError;
pub use resolve::{resolve_preflight, resolve_simple, PreflightPolicy, SimplePolicy};
pub use tristate::Tristate;

use std::collections::HashMap;
use std::time::Duration;

use http::Method;
use serde::Serialize;
use tracing::{info, trace, warn};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::middleware::Middleware;
use crate::spec::RouteMeta;

/// Classification result for one route, kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCorsReport {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub path: String,
    pub handler_name: String,
    pub cors: RouteCors,
}

fn serialize_method<S: serde::Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(method.as_str())
}

/// Classify every route once, in declaration order
///
/// Rejected declarations are logged and recorded in the report; they do not
/// stop the remaining routes from being classified.
///
/// # Errors
///
/// Returns [`CorsConfigError::UnresolvedCredentials`] if resolution ever ends
/// on an unset credentials flag.
pub fn build_route_cors_plan(
    defaults: &CorsDefaults,
    routes: &[RouteMeta],
) -> Result<Vec<RouteCorsReport>, CorsConfigError> {
    routes
        .iter()
        .map(|route| {
            Ok(RouteCorsReport {
                method: route.method.clone(),
                path: route.path_pattern.clone(),
                handler_name: route.handler_name.clone(),
                cors: classify_route(defaults, route)?,
            })
        })
        .collect()
}

/// CORS middleware driven by per-route declarations
///
/// Every route is classified once when the middleware is built; the
/// resulting emitter is stored under the route's handler name and method.
/// At request time `after` looks the emitter up and runs it. Nothing is resolved per
/// request and the table is never mutated, so one instance can be shared by
/// any number of threads.
///
/// # Usage
///
/// ```rust
/// use brrtcors::middleware::{CorsDefaults, CorsMiddleware};
/// use brrtcors::spec::load_spec_from_str;
///
/// let yaml = r#"
/// openapi: 3.1.0
/// info: { title: Demo, version: "1.0" }
/// paths:
///   /pets:
///     get:
///       operationId: list_pets
///       x-cors: {}
///       responses: { "200": { description: ok } }
/// "#;
/// let routes = load_spec_from_str(yaml, true).unwrap();
/// let cors = CorsMiddleware::from_routes(&CorsDefaults::default(), &routes).unwrap();
/// assert_eq!(cors.active_routes(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CorsMiddleware {
    /// handler name → method → behaviour; operations may share a handler name
    routes: HashMap<String, HashMap<Method, RouteCors>>,
    issues: Vec<CorsDeclarationIssue>,
}

impl CorsMiddleware {
    /// Classify `routes` against `defaults` and build the emitter table
    ///
    /// # Errors
    ///
    /// Same as [`build_route_cors_plan`].
    pub fn from_routes(
        defaults: &CorsDefaults,
        routes: &[RouteMeta],
    ) -> Result<Self, CorsConfigError> {
        let plan = build_route_cors_plan(defaults, routes)?;
        Ok(Self::from_plan(plan))
    }

    /// Build the emitter table from an already classified plan
    #[must_use]
    pub fn from_plan(plan: Vec<RouteCorsReport>) -> Self {
        let mut routes: HashMap<String, HashMap<Method, RouteCors>> =
            HashMap::with_capacity(plan.len());
        let mut issues = Vec::new();
        let mut total = 0usize;
        for report in plan {
            if let Some(issue) = report.cors.issue() {
                issues.push(issue.clone());
            }
            let by_method = routes.entry(report.handler_name).or_default();
            if let Some(previous) = by_method.insert(report.method.clone(), report.cors) {
                warn!(
                    method = %report.method,
                    path = %report.path,
                    replaced = ?previous,
                    "Duplicate CORS entry for method and handler, last one wins"
                );
            } else {
                total += 1;
            }
        }

        let mw = Self { routes, issues };
        info!(
            routes = total,
            active = mw.active_routes(),
            rejected = mw.issues.len(),
            "CORS middleware initialized"
        );
        mw
    }

    /// CORS behaviour attached to a handler for one method
    #[must_use]
    pub fn route_cors(&self, method: &Method, handler_name: &str) -> Option<&RouteCors> {
        self.routes.get(handler_name)?.get(method)
    }

    /// Number of routes with an emitter attached
    #[must_use]
    pub fn active_routes(&self) -> usize {
        self.routes
            .values()
            .flat_map(HashMap::values)
            .filter(|c| c.is_active())
            .count()
    }

    /// Declarations rejected during classification
    #[must_use]
    pub fn issues(&self) -> &[CorsDeclarationIssue] {
        &self.issues
    }
}

impl Middleware for CorsMiddleware {
    /// Run the route's emitter on the outgoing response
    ///
    /// Handlers without an entry, and transparent or rejected routes, are
    /// left untouched.
    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        match self.route_cors(&req.method, &req.handler_name) {
            Some(cors) => cors.emit(req, res),
            None => trace!(
                method = %req.method,
                handler_name = %req.handler_name,
                "No CORS entry for handler"
            ),
        }
    }
}
