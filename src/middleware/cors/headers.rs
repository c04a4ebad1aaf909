//! Header names read and written by the CORS emitters.

pub const ORIGIN: &str = "Origin";

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const EXPOSE_HEADERS: &str = "Access-Control-Expose-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// Every response header the emitters may set
pub const ALL_RESPONSE_HEADERS: [&str; 6] = [
    ALLOW_ORIGIN,
    EXPOSE_HEADERS,
    MAX_AGE,
    ALLOW_CREDENTIALS,
    ALLOW_METHODS,
    ALLOW_HEADERS,
];
