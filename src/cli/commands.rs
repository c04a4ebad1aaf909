use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use crate::config::load_cors_defaults;
use crate::dispatcher::{HandlerRequest, HandlerResponse, HeaderVec};
use crate::middleware::headers::ORIGIN;
use crate::middleware::{build_route_cors_plan, RouteCors, RouteCorsReport};
use crate::spec::load_spec;

/// Command-line interface for brrtcors
///
/// Loads an OpenAPI document and reports how each route's CORS declarations
/// resolve against the configured defaults.
#[derive(Parser)]
#[command(name = "brrtcors")]
#[command(about = "Inspect and lint x-cors declarations in OpenAPI documents", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective CORS behaviour of every route
    Inspect {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// YAML file with a `cors:` defaults section
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Report rejected declarations; exits non-zero if any exist
    Lint {
        /// Path to the OpenAPI specification file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// YAML file with a `cors:` defaults section
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Headers a route would add to a response for a cross-origin request
///
/// Runs the route's own emitter against an empty response, so the preview
/// follows exactly the same skip rules as live traffic.
#[must_use]
pub fn preview_headers(report: &RouteCorsReport) -> HeaderVec {
    let req = HandlerRequest::new(report.method.clone(), &report.path, &report.handler_name)
        .with_header(ORIGIN, "https://preview.invalid");
    let mut res = HandlerResponse::new(200, HeaderVec::new(), Value::Null);
    report.cors.emit(&req, &mut res);
    res.headers
}

fn outcome_label(cors: &RouteCors) -> &'static str {
    match cors {
        RouteCors::Transparent => "transparent",
        RouteCors::Simple(_) => "simple",
        RouteCors::Preflight(_) => "preflight",
        RouteCors::Rejected(_) => "rejected",
    }
}

/// Render the plan as an aligned text table
///
/// # Errors
///
/// Propagates write failures.
pub fn render_table<W: Write>(plan: &[RouteCorsReport], out: &mut W) -> std::io::Result<()> {
    let path_width = plan
        .iter()
        .map(|r| r.path.len())
        .chain(std::iter::once(4))
        .max()
        .unwrap_or(4);
    let handler_width = plan
        .iter()
        .map(|r| r.handler_name.len())
        .chain(std::iter::once(7))
        .max()
        .unwrap_or(7);

    writeln!(
        out,
        "{:<7} {:<path_width$} {:<handler_width$} {:<11} HEADERS",
        "METHOD", "PATH", "HANDLER", "OUTCOME"
    )?;
    for report in plan {
        let detail = match &report.cors {
            RouteCors::Rejected(issue) => issue.to_string(),
            _ => preview_headers(report)
                .iter()
                .map(|(k, v)| format!("{k}: {v}"))
                .collect::<Vec<_>>()
                .join("; "),
        };
        writeln!(
            out,
            "{:<7} {:<path_width$} {:<handler_width$} {:<11} {}",
            report.method.as_str(),
            report.path,
            report.handler_name,
            outcome_label(&report.cors),
            detail
        )?;
    }
    Ok(())
}

fn load_plan(spec: &Path, config: Option<&Path>) -> anyhow::Result<Vec<RouteCorsReport>> {
    let spec_path = spec
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in spec path"))?;
    let defaults = load_cors_defaults(config)?;
    let routes = load_spec(spec_path)?;
    build_route_cors_plan(&defaults, &routes).context("failed to classify routes")
}

/// Execute a parsed command, writing its report to `out`
///
/// Returns `false` when `lint` found rejected declarations.
///
/// # Errors
///
/// Returns an error if the spec or config cannot be loaded, or if
/// output fails.
pub fn run_command<W: Write>(command: &Commands, out: &mut W) -> anyhow::Result<bool> {
    match command {
        Commands::Inspect {
            spec,
            config,
            format,
        } => {
            let plan = load_plan(spec, config.as_deref())?;
            match format {
                OutputFormat::Table => render_table(&plan, out)?,
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut *out, &plan)?;
                    writeln!(out)?;
                }
            }
            Ok(true)
        }
        Commands::Lint { spec, config } => {
            let plan = load_plan(spec, config.as_deref())?;
            let issues: Vec<_> = plan.iter().filter_map(|r| r.cors.issue()).collect();
            if issues.is_empty() {
                writeln!(out, "✅ No CORS declaration issues found ({} routes)", plan.len())?;
                return Ok(true);
            }
            writeln!(out, "❌ {} rejected CORS declaration(s):", issues.len())?;
            for issue in issues {
                writeln!(out, "   {issue}")?;
            }
            Ok(false)
        }
    }
}

/// Parse the process arguments and run the selected command
///
/// # Errors
///
/// See [`run_command`].
pub fn run_cli() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(&cli.command, &mut out)
}
