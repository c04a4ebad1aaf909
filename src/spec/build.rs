use oas3::OpenApiV3Spec;
use serde_json::Value;
use tracing::{debug, warn};

use super::types::RouteMeta;
use crate::middleware::{
    CorsConfigError, CorsDeclaration, PreflightDeclaration, RouteCorsDeclarations,
};

/// Vendor extension carrying a simple-response declaration
pub const CORS_EXTENSION: &str = "x-cors";
/// Vendor extension carrying a preflight declaration
pub const CORS_PREFLIGHT_EXTENSION: &str = "x-cors-preflight";

/// Look up a vendor extension on a raw path item or operation object
fn find_extension<'a>(object: Option<&'a Value>, name: &str) -> Option<&'a Value> {
    object?.as_object()?.get(name)
}

/// Extract both CORS declarations from one raw object
///
/// # Errors
///
/// [`CorsConfigError::InvalidDeclaration`] for malformed extension values.
pub fn extract_cors_declarations(
    object: Option<&Value>,
    location: &str,
) -> Result<(Option<CorsDeclaration>, Option<PreflightDeclaration>), CorsConfigError> {
    let simple = match find_extension(object, CORS_EXTENSION) {
        Some(v) => CorsDeclaration::from_extension(v, location)?,
        None => None,
    };
    let preflight = match find_extension(object, CORS_PREFLIGHT_EXTENSION) {
        Some(v) => PreflightDeclaration::from_extension(v, location)?,
        None => None,
    };
    Ok((simple, preflight))
}

fn resolve_handler_name(
    operation: &oas3::spec::Operation,
    raw_op: Option<&Value>,
) -> Option<String> {
    raw_op
        .and_then(Value::as_object)
        .and_then(|obj| {
            obj.iter().find_map(|(key, val)| {
                if key.starts_with("x-handler") {
                    val.as_str().map(str::to_string)
                } else {
                    None
                }
            })
        })
        .or_else(|| operation.operation_id.clone())
}

/// Build route metadata for all operations in an OpenAPI document
///
/// `raw` is the same document as `spec` in its untyped form; vendor
/// extensions are read from it so their keys are seen exactly as written.
///
/// Operations without an `operationId` or `x-handler*` extension are logged
/// and skipped.
///
/// # Errors
///
/// Returns an error if any `x-cors` / `x-cors-preflight` value is malformed.
pub fn build_routes(spec: &OpenApiV3Spec, raw: &Value) -> anyhow::Result<Vec<RouteMeta>> {
    let mut routes = Vec::new();

    let raw_paths = raw.get("paths");

    if let Some(paths_map) = spec.paths.as_ref() {
        for (path, item) in paths_map {
            let raw_item = raw_paths.and_then(|p| p.get(path.as_str()));
            let (resource_simple, resource_preflight) =
                extract_cors_declarations(raw_item, path)?;

            for (method, operation) in item.methods() {
                let method_key = method.as_str().to_ascii_lowercase();
                let raw_op = raw_item.and_then(|i| i.get(method_key.as_str()));
                let location = format!("{method} {path}");

                let handler_name = match resolve_handler_name(operation, raw_op) {
                    Some(name) => name,
                    None => {
                        warn!(
                            location = %location,
                            "Missing operationId or x-handler-* extension, skipping"
                        );
                        continue;
                    }
                };

                let (method_simple, method_preflight) =
                    extract_cors_declarations(raw_op, &location)?;

                let cors = RouteCorsDeclarations {
                    resource_simple: resource_simple.clone(),
                    resource_preflight: resource_preflight.clone(),
                    method_simple,
                    method_preflight,
                };

                debug!(
                    location = %location,
                    handler_name = %handler_name,
                    declared = !cors.is_empty(),
                    "Route metadata built"
                );

                routes.push(RouteMeta {
                    method,
                    path_pattern: path.clone(),
                    handler_name,
                    cors,
                });
            }
        }
    }

    Ok(routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_extension_requires_prefixed_key() {
        let prefixed = json!({ "x-cors": true });
        let bare = json!({ "cors-preflight": {}, "cors": {} });
        assert_eq!(find_extension(Some(&prefixed), CORS_EXTENSION), Some(&json!(true)));
        assert_eq!(find_extension(Some(&bare), CORS_PREFLIGHT_EXTENSION), None);
        assert_eq!(find_extension(Some(&bare), CORS_EXTENSION), None);
        assert_eq!(find_extension(None, CORS_EXTENSION), None);
    }

    #[test]
    fn test_extract_cors_declarations() {
        let item = json!({
            "x-cors": { "allowOrigin": "http://a.com" },
            "x-cors-preflight": false
        });
        let (simple, preflight) = extract_cors_declarations(Some(&item), "/a").unwrap();
        assert_eq!(simple.map(|d| d.allow_origin), Some("http://a.com".to_string()));
        assert!(preflight.is_none());
    }

    #[test]
    fn test_extract_cors_declarations_error_carries_location() {
        let op = json!({ "x-cors-preflight": { "maxAge": "soon" } });
        let err = extract_cors_declarations(Some(&op), "OPTIONS /a").unwrap_err();
        assert!(matches!(
            err,
            CorsConfigError::InvalidDeclaration { ref location, .. } if location == "OPTIONS /a"
        ));
    }
}
