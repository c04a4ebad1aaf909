//! # brrtcors
//!
//! **brrtcors** attaches Cross-Origin Resource Sharing headers to responses
//! according to declarations written into an
//! [OpenAPI 3.1.0](https://spec.openapis.org/oas/v3.1.0) document.
//!
//! ## Overview
//!
//! Each route may carry an `x-cors` (simple responses) or `x-cors-preflight`
//! (OPTIONS responses) vendor extension, either on the path item (resource
//! tier) or on the operation (method tier). Values left out of a declaration
//! fall back to the next-outer tier and finally to the process-wide defaults:
//!
//! ```text
//! method declaration  →  resource declaration  →  CorsDefaults
//! ```
//!
//! Every route is classified exactly once when the [`middleware::CorsMiddleware`]
//! is built. At request time the middleware only looks up the precomputed
//! emitter and adds whichever headers the response does not already carry.
//!
//! ## Architecture
//!
//! - **[`spec`]** - OpenAPI loading and `x-cors` / `x-cors-preflight` extraction
//! - **[`middleware`]** - Policy resolution, route classification, header emitters
//! - **[`dispatcher`]** - Request/response types and a handler dispatcher that runs middleware
//! - **[`config`]** - Global defaults from YAML and `BRRTCORS_*` environment variables
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`cli`]** - The `brrtcors` command-line tool
//!
//! ```mermaid
//! sequenceDiagram
//!     participant App
//!     participant Spec as spec::load_spec
//!     participant Config as config::load_cors_defaults
//!     participant Cors as CorsMiddleware
//!     participant Disp as Dispatcher
//!
//!     App->>Spec: load_spec("openapi.yaml")
//!     Spec-->>App: Vec<RouteMeta>
//!     App->>Config: load_cors_defaults(Some("config.yaml"))
//!     Config-->>App: CorsDefaults
//!     App->>Cors: from_routes(&defaults, &routes)
//!     Cors->>Cors: classify every route once
//!     App->>Disp: add_middleware(Arc::new(cors))
//!     Disp->>Cors: after(req, &mut res, latency)
//!     Cors->>Cors: emit headers if absent
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use brrtcors::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//! use brrtcors::middleware::{CorsDefaults, CorsMiddleware};
//! use brrtcors::spec::load_spec_from_str;
//! use http::Method;
//!
//! let routes = load_spec_from_str(r#"
//! openapi: 3.1.0
//! info: { title: Pets, version: "1.0" }
//! paths:
//!   /pets:
//!     get:
//!       operationId: list_pets
//!       x-cors: { exposeHeaders: "x-total-count" }
//!       responses: { "200": { description: ok } }
//! "#, true).unwrap();
//!
//! let cors = CorsMiddleware::from_routes(&CorsDefaults::default(), &routes).unwrap();
//! let mut dispatcher = Dispatcher::new();
//! for route in routes {
//!     dispatcher.add_route(route, |_req: &HandlerRequest| {
//!         HandlerResponse::json(200, serde_json::json!([]))
//!     });
//! }
//! dispatcher.add_middleware(Arc::new(cors));
//!
//! let req = HandlerRequest::new(Method::GET, "/pets", "list_pets")
//!     .with_header("Origin", "https://app.example.com");
//! let res = dispatcher.dispatch(&req);
//! assert_eq!(res.get_header("access-control-allow-origin"), Some("*"));
//! assert_eq!(res.get_header("access-control-expose-headers"), Some("x-total-count"));
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod logging;
pub mod middleware;
pub mod spec;

pub use config::load_cors_defaults;
pub use middleware::{CorsDefaults, CorsMiddleware, Middleware, RouteCors};
pub use spec::{load_spec, load_spec_from_str, RouteMeta};
