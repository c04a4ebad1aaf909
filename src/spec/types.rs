use http::Method;

use crate::middleware::RouteCorsDeclarations;

/// Route metadata extracted from one OpenAPI operation
#[derive(Debug, Clone)]
pub struct RouteMeta {
    pub method: Method,
    pub path_pattern: String,
    pub handler_name: String,
    /// CORS declarations from the path item and the operation
    pub cors: RouteCorsDeclarations,
}

impl RouteMeta {
    /// Route without CORS declarations
    #[must_use]
    pub fn new(method: Method, path_pattern: &str, handler_name: &str) -> Self {
        Self {
            method,
            path_pattern: path_pattern.to_string(),
            handler_name: handler_name.to_string(),
            cors: RouteCorsDeclarations::default(),
        }
    }

    #[must_use]
    pub fn with_cors(mut self, cors: RouteCorsDeclarations) -> Self {
        self.cors = cors;
        self
    }

    /// `METHOD /path (handler)`, used in logs and issue reports
    #[must_use]
    pub fn location(&self) -> String {
        format!("{} {} ({})", self.method, self.path_pattern, self.handler_name)
    }
}
