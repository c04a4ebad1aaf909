use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{debug, info, warn};

use crate::middleware::Middleware;
use crate::spec::RouteMeta;

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage shared by requests and responses
///
/// Names are `Arc<str>` so the static CORS header names clone in O(1).
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data handed to middleware and handlers
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// HTTP method (GET, OPTIONS, etc.)
    pub method: Method,
    /// Request path
    pub path: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    /// HTTP headers
    pub headers: HeaderVec,
    /// Request body parsed as JSON (if present)
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// Create a request without headers or body
    #[must_use]
    pub fn new(method: Method, path: &str, handler_name: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            handler_name: handler_name.to_string(),
            headers: HeaderVec::new(),
            body: None,
        }
    }

    /// Builder-style header insertion, used by tests and adapters
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((Arc::from(name), value.to_string()));
        self
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response produced by a handler and post-processed by middleware
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code
    pub status: u16,
    /// HTTP response headers
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    /// Response body as JSON
    pub body: Value,
}

impl HandlerResponse {
    /// Create a new response with the given status, headers, and body
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create a JSON response with default headers
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `true` if a header with this name is present (case-insensitive)
    #[inline]
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }

    /// Add a header unless one with the same name is already present
    ///
    /// Returns `true` if the header was inserted.
    pub fn set_header_if_absent(&mut self, name: &str, value: String) -> bool {
        if self.has_header(name) {
            return false;
        }
        self.headers.push((Arc::from(name), value));
        true
    }
}

/// Handler callable stored in the dispatcher
pub type HandlerFn = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Synchronous dispatcher that runs middleware around named handlers
///
/// Middleware `before` hooks may short-circuit with a response; `after` hooks
/// always run, in registration order, on whatever response is produced.
#[derive(Clone, Default)]
pub struct Dispatcher {
    /// Map of handler names to their callables
    pub handlers: HashMap<String, HandlerFn>,
    /// Ordered list of middleware to apply to requests/responses
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    /// Create a new empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for the given route
    ///
    /// Handlers are keyed by name only, so operations sharing a handler name
    /// share one callable; registering the name again replaces it.
    pub fn add_route<F>(&mut self, route: RouteMeta, handler: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        let handler_name = route.handler_name.clone();
        if self.handlers.contains_key(&handler_name) {
            warn!(
                handler_name = %handler_name,
                "Replaced existing handler"
            );
        }
        info!(
            handler_name = %handler_name,
            method = %route.method,
            path = %route.path_pattern,
            "Handler registered"
        );
        self.handlers.insert(handler_name, Arc::new(handler));
    }

    /// Add middleware to the processing pipeline
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Run a request through middleware and its handler
    ///
    /// Unknown handlers produce a 404 response, which still passes through
    /// the `after` hooks.
    pub fn dispatch(&self, req: &HandlerRequest) -> HandlerResponse {
        let start = Instant::now();

        let short_circuit = self.middlewares.iter().find_map(|mw| mw.before(req));

        let mut resp = match short_circuit {
            Some(resp) => resp,
            None => match self.handlers.get(&req.handler_name) {
                Some(handler) => handler(req),
                None => {
                    warn!(
                        handler_name = %req.handler_name,
                        path = %req.path,
                        "No handler registered"
                    );
                    HandlerResponse::error(404, "Handler not found")
                }
            },
        };

        let latency = start.elapsed();
        for mw in &self.middlewares {
            mw.after(req, &mut resp, latency);
        }

        debug!(
            handler_name = %req.handler_name,
            status = resp.status,
            latency_us = latency.as_micros() as u64,
            "Request dispatched"
        );
        resp
    }
}
