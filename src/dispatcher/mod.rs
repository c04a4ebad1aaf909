//! # Dispatcher Module
//!
//! Minimal request pipeline used to attach CORS behaviour to routes.
//!
//! A [`Dispatcher`] owns named handlers and an ordered list of
//! [`Middleware`](crate::middleware::Middleware). For every request it:
//!
//! 1. Runs each middleware's `before` hook; the first `Some` response wins
//! 2. Otherwise calls the handler registered under `handler_name`
//! 3. Runs every middleware's `after` hook on the response
//!
//! Handlers are plain closures. Everything is synchronous; `Dispatcher` is
//! `Clone` and can be shared across threads since handlers and middleware
//! are `Send + Sync`.
//!
//! ```rust
//! use brrtcors::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
//! use brrtcors::spec::RouteMeta;
//! use http::Method;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.add_route(RouteMeta::new(Method::GET, "/pets", "list_pets"), |_req| {
//!     HandlerResponse::json(200, serde_json::json!([]))
//! });
//!
//! let resp = dispatcher.dispatch(&HandlerRequest::new(Method::GET, "/pets", "list_pets"));
//! assert_eq!(resp.status, 200);
//! ```

mod core;

pub use core::{
    Dispatcher, HandlerFn, HandlerRequest, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS,
};
