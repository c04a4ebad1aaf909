//! # CLI Module
//!
//! Command-line tooling around the CORS engine.
//!
//! ## Commands
//!
//! ### `inspect`
//!
//! Print the classification and effective headers of every route:
//!
//! ```bash
//! brrtcors inspect --spec openapi.yaml --config config.yaml
//! brrtcors inspect --spec openapi.yaml --format json
//! ```
//!
//! ### `lint`
//!
//! Report `x-cors` / `x-cors-preflight` declarations placed on the wrong
//! operations. Exits with status 1 when any are found:
//!
//! ```bash
//! brrtcors lint --spec openapi.yaml
//! ```
//!
//! Both commands honour the `BRRTCORS_*` environment overrides described in
//! [`crate::config`].

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{
    preview_headers, render_table, run_cli, run_command, Cli, Commands, OutputFormat,
};
