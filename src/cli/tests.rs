//! Unit tests for CLI commands

use crate::cli::{preview_headers, render_table, run_command, Cli, Commands, OutputFormat};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

const SPEC: &str = r#"
openapi: 3.1.0
info: { title: CLI, version: "1.0" }
paths:
  /pets:
    x-cors: { allowOrigin: "http://pets.com" }
    get:
      operationId: list_pets
      responses: { "200": { description: ok } }
    options:
      operationId: pets_preflight
      x-cors-preflight: { allowMethods: "GET,POST" }
      responses: { "200": { description: ok } }
  /plain:
    get:
      operationId: plain
      responses: { "200": { description: ok } }
"#;

const BAD_SPEC: &str = r#"
openapi: 3.1.0
info: { title: CLI, version: "1.0" }
paths:
  /broken:
    get:
      operationId: broken
      x-cors-preflight: {}
      responses: { "200": { description: ok } }
"#;

fn write_spec(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("openapi.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn test_inspect_command_parses() {
    let cli = Cli::try_parse_from([
        "brrtcors",
        "inspect",
        "--spec",
        "api.yaml",
        "--config",
        "cfg.yaml",
        "--format",
        "json",
    ])
    .unwrap();

    match cli.command {
        Commands::Inspect {
            spec,
            config,
            format,
        } => {
            assert_eq!(spec.to_string_lossy(), "api.yaml");
            assert_eq!(config.unwrap().to_string_lossy(), "cfg.yaml");
            assert_eq!(format, OutputFormat::Json);
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_inspect_defaults_to_table() {
    let cli = Cli::try_parse_from(["brrtcors", "inspect", "-s", "api.yaml"]).unwrap();
    match cli.command {
        Commands::Inspect { format, config, .. } => {
            assert_eq!(format, OutputFormat::Table);
            assert!(config.is_none());
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_lint_requires_spec() {
    assert!(Cli::try_parse_from(["brrtcors", "lint"]).is_err());
}

#[test]
fn test_inspect_table_output() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(&dir, SPEC);
    let mut out = Vec::new();
    let ok = run_command(
        &Commands::Inspect {
            spec,
            config: None,
            format: OutputFormat::Table,
        },
        &mut out,
    )
    .unwrap();
    assert!(ok);

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("METHOD"));
    let list = text.lines().find(|l| l.contains("list_pets")).unwrap();
    assert!(list.contains("simple"));
    assert!(list.contains("Access-Control-Allow-Origin: http://pets.com"));
    let preflight = text.lines().find(|l| l.contains("pets_preflight")).unwrap();
    assert!(preflight.contains("preflight"));
    assert!(preflight.contains("Access-Control-Allow-Methods: GET,POST"));
    let plain = text.lines().find(|l| l.contains("plain")).unwrap();
    assert!(plain.contains("transparent"));
}

#[test]
fn test_inspect_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let spec = write_spec(&dir, SPEC);
    let mut out = Vec::new();
    run_command(
        &Commands::Inspect {
            spec,
            config: None,
            format: OutputFormat::Json,
        },
        &mut out,
    )
    .unwrap();

    let plan: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let routes = plan.as_array().unwrap();
    assert_eq!(routes.len(), 3);
    let preflight = routes
        .iter()
        .find(|r| r["handler_name"] == "pets_preflight")
        .unwrap();
    assert_eq!(preflight["cors"]["outcome"], "preflight");
    assert_eq!(preflight["cors"]["policy"]["maxAge"], 86400);
}

#[test]
fn test_lint_clean_and_failing() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_spec(&dir, SPEC);
    let mut out = Vec::new();
    assert!(run_command(&Commands::Lint { spec: good, config: None }, &mut out).unwrap());

    let bad = write_spec(&dir, BAD_SPEC);
    let mut out = Vec::new();
    assert!(!run_command(&Commands::Lint { spec: bad, config: None }, &mut out).unwrap());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("GET /broken (broken)"));
    assert!(text.contains("only applicable to OPTIONS"));
}

#[test]
fn test_missing_spec_is_an_error() {
    let mut out = Vec::new();
    let result = run_command(
        &Commands::Lint {
            spec: PathBuf::from("/nonexistent/openapi.yaml"),
            config: None,
        },
        &mut out,
    );
    assert!(result.is_err());
}

#[test]
fn test_render_empty_plan() {
    let mut out = Vec::new();
    render_table(&[], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
}

#[test]
fn test_preview_headers_of_transparent_route() {
    let report = crate::middleware::RouteCorsReport {
        method: http::Method::GET,
        path: "/x".into(),
        handler_name: "x".into(),
        cors: crate::middleware::RouteCors::Transparent,
    };
    assert!(preview_headers(&report).is_empty());
}
