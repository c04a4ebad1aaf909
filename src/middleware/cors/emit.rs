//! Response header emitters.
//!
//! Both emitters only ever add headers the response does not already carry,
//! so values set by the handler always win. Neither emits anything unless the
//! request has an `Origin` header.

use serde::Serialize;

use super::headers;
use super::{PreflightPolicy, SimplePolicy};
use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// Attaches CORS headers to simple (non-OPTIONS) responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimpleEmitter {
    policy: SimplePolicy,
}

impl SimpleEmitter {
    #[must_use]
    pub fn new(policy: SimplePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &SimplePolicy {
        &self.policy
    }

    /// Add `Allow-Origin`, `Expose-Headers` (if non-empty) and
    /// `Allow-Credentials` (if true)
    pub fn emit(&self, req: &HandlerRequest, res: &mut HandlerResponse) {
        if req.get_header(headers::ORIGIN).is_none() {
            return;
        }

        let p = &self.policy;
        res.set_header_if_absent(headers::ALLOW_ORIGIN, p.allow_origin.clone());
        if !p.expose_headers.is_empty() {
            res.set_header_if_absent(headers::EXPOSE_HEADERS, p.expose_headers.clone());
        }
        if p.allow_credentials {
            res.set_header_if_absent(headers::ALLOW_CREDENTIALS, "true".to_string());
        }
    }
}

/// Attaches CORS headers to preflight (OPTIONS) responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreflightEmitter {
    policy: PreflightPolicy,
}

impl PreflightEmitter {
    #[must_use]
    pub fn new(policy: PreflightPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &PreflightPolicy {
        &self.policy
    }

    /// Add `Allow-Origin` and `Max-Age`, then `Allow-Methods` and
    /// `Allow-Headers` when non-empty and `Allow-Credentials` when true
    pub fn emit(&self, req: &HandlerRequest, res: &mut HandlerResponse) {
        // A preflight without Origin is not a CORS request
        if req.get_header(headers::ORIGIN).is_none() {
            return;
        }

        let p = &self.policy;
        res.set_header_if_absent(headers::ALLOW_ORIGIN, p.allow_origin.clone());
        res.set_header_if_absent(headers::MAX_AGE, p.max_age.to_string());
        if !p.allow_methods.is_empty() {
            res.set_header_if_absent(headers::ALLOW_METHODS, p.allow_methods.clone());
        }
        if !p.allow_headers.is_empty() {
            res.set_header_if_absent(headers::ALLOW_HEADERS, p.allow_headers.clone());
        }
        if p.allow_credentials {
            res.set_header_if_absent(headers::ALLOW_CREDENTIALS, "true".to_string());
        }
    }
}
