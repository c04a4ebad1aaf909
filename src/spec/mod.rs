//! OpenAPI loading.
//!
//! Routes are built from an OpenAPI 3.1 document. CORS declarations are read
//! from the `x-cors` and `x-cors-preflight` vendor extensions: on a path item
//! they form the resource tier, on an operation the method tier.

mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
