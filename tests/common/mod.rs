#![allow(dead_code)]

use std::sync::Arc;

use brrtcors::dispatcher::{Dispatcher, HandlerRequest, HandlerResponse};
use brrtcors::middleware::{CorsDefaults, CorsMiddleware, Middleware};
use brrtcors::spec::load_spec_from_str;
use http::Method;

pub mod temp_files {
    use std::path::PathBuf;

    /// Write `content` into a fresh temp dir; the dir lives as long as the guard
    pub fn create_temp_file(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }
}

/// Test-scoped subscriber so classification logs show up with `--nocapture`
pub struct TestTracing {
    _guard: tracing::subscriber::DefaultGuard,
}

impl TestTracing {
    pub fn init() -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}

/// Build a dispatcher whose handlers echo the handler name, with CORS
/// middleware classified from the given OpenAPI YAML
pub fn dispatcher_from_yaml(
    yaml: &str,
    defaults: &CorsDefaults,
) -> (Dispatcher, Arc<CorsMiddleware>) {
    let routes = load_spec_from_str(yaml, true).unwrap();
    let cors = Arc::new(CorsMiddleware::from_routes(defaults, &routes).unwrap());

    let mut dispatcher = Dispatcher::new();
    for route in routes {
        let name = route.handler_name.clone();
        dispatcher.add_route(route, move |_req: &HandlerRequest| {
            HandlerResponse::json(200, serde_json::json!({ "handler": name }))
        });
    }
    dispatcher.add_middleware(Arc::clone(&cors) as Arc<dyn Middleware>);
    (dispatcher, cors)
}

pub fn request(method: Method, path: &str, handler: &str, origin: Option<&str>) -> HandlerRequest {
    let req = HandlerRequest::new(method, path, handler);
    match origin {
        Some(o) => req.with_header("Origin", o),
        None => req,
    }
}

/// All `Access-Control-*` headers on a response, lower-cased names
pub fn cors_headers(res: &HandlerResponse) -> Vec<(String, String)> {
    let mut out: Vec<_> = res
        .headers
        .iter()
        .filter(|(k, _)| k.to_ascii_lowercase().starts_with("access-control-"))
        .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
        .collect();
    out.sort();
    out
}
