use anyhow::Context;
use oas3::OpenApiV3Spec;
use serde_json::Value;

use super::build::build_routes;
use super::types::RouteMeta;

fn strip_unknown_verbs(val: &mut Value) {
    const METHODS: [&str; 8] = [
        "get", "post", "put", "delete", "patch", "options", "head", "trace",
    ];

    if let Some(Value::Object(paths_map)) = val.get_mut("paths") {
        for item in paths_map.values_mut() {
            if let Value::Object(obj) = item {
                obj.retain(|k, _| {
                    let lk = k.to_ascii_lowercase();
                    match lk.as_str() {
                        "summary" | "description" | "servers" | "parameters" | "$ref" => true,
                        m if METHODS.contains(&m) => true,
                        _ => k.starts_with("x-"),
                    }
                });
            }
        }
    }
}

fn routes_from_value(mut value: Value) -> anyhow::Result<Vec<RouteMeta>> {
    strip_unknown_verbs(&mut value);
    let spec: OpenApiV3Spec =
        serde_json::from_value(value.clone()).context("invalid OpenAPI document")?;
    build_routes(&spec, &value)
}

/// Load an OpenAPI document from disk and build its routes
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as JSON.
pub fn load_spec(file_path: &str) -> anyhow::Result<Vec<RouteMeta>> {
    let content = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read spec {file_path}"))?;
    let is_yaml = file_path.ends_with(".yaml") || file_path.ends_with(".yml");
    load_spec_from_str(&content, is_yaml)
        .with_context(|| format!("failed to load spec {file_path}"))
}

/// Build routes from an in-memory OpenAPI document
pub fn load_spec_from_str(content: &str, is_yaml: bool) -> anyhow::Result<Vec<RouteMeta>> {
    let value: Value = if is_yaml {
        serde_yaml::from_str(content)?
    } else {
        serde_json::from_str(content)?
    };
    routes_from_value(value)
}
