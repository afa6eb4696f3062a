//! OpenAPI 3.1 document for the API, built from the request and response
//! types' JSON Schemas.

use schemars::{JsonSchema, schema_for};
use serde_json::{Map, Value, json};

use crate::{
    metadata::{PKG_DESCRIPTION, PKG_NAME, PKG_VERSION},
    types::{
        EchoRequest, EchoResponse, FormatNumberRequest, FormatNumberResponse, HealthResponse,
        WelcomeResponse,
    },
};

const ERROR_SCHEMA: &str = "ErrorResponse";

fn component<T: JsonSchema>() -> Value {
    let mut value = Value::from(schema_for!(T));
    if let Some(obj) = value.as_object_mut() {
        obj.remove("$schema");
    }
    value
}

fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{name}") })
}

fn json_content(name: &str) -> Value {
    json!({ "application/json": { "schema": schema_ref(name) } })
}

fn post_operation(summary: &str, request: &str, response: &str) -> Value {
    json!({
        "post": {
            "summary": summary,
            "requestBody": { "required": true, "content": json_content(request) },
            "responses": {
                "200": { "description": "Successful Response", "content": json_content(response) },
                "422": { "description": "Validation Error", "content": json_content(ERROR_SCHEMA) },
            }
        }
    })
}

fn get_operation(summary: &str, response: &str) -> Value {
    json!({
        "get": {
            "summary": summary,
            "responses": {
                "200": { "description": "Successful Response", "content": json_content(response) },
            }
        }
    })
}

/// Build the document once at startup; it never changes at runtime.
pub fn document() -> Value {
    let mut schemas = Map::new();
    schemas.insert("EchoRequest".into(), component::<EchoRequest>());
    schemas.insert("EchoResponse".into(), component::<EchoResponse>());
    schemas.insert("FormatNumberRequest".into(), component::<FormatNumberRequest>());
    schemas.insert("FormatNumberResponse".into(), component::<FormatNumberResponse>());
    schemas.insert("WelcomeResponse".into(), component::<WelcomeResponse>());
    schemas.insert("HealthResponse".into(), component::<HealthResponse>());
    schemas.insert(
        ERROR_SCHEMA.into(),
        json!({
            "type": "object",
            "properties": { "detail": { "type": "string" } },
            "required": ["detail"],
        }),
    );

    json!({
        "openapi": "3.1.0",
        "info": {
            "title": PKG_NAME,
            "description": PKG_DESCRIPTION,
            "version": PKG_VERSION,
        },
        "paths": {
            "/": get_operation("Welcome message", "WelcomeResponse"),
            "/health": get_operation("Service health", "HealthResponse"),
            "/echo": post_operation("Echo a message", "EchoRequest", "EchoResponse"),
            "/format-number": post_operation(
                "Format a number with a K/M/B suffix",
                "FormatNumberRequest",
                "FormatNumberResponse",
            ),
        },
        "components": { "schemas": Value::Object(schemas) },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_references_resolve() {
        let doc = document();
        let schemas = doc["components"]["schemas"].as_object().unwrap();
        for path in ["/echo", "/format-number"] {
            let reference = doc["paths"][path]["post"]["requestBody"]["content"]
                ["application/json"]["schema"]["$ref"]
                .as_str()
                .unwrap();
            let name = reference.trim_start_matches("#/components/schemas/");
            assert!(schemas.contains_key(name), "{name} missing");
        }
    }

    #[test]
    fn test_request_schemas_list_required_fields() {
        let doc = document();
        let echo = &doc["components"]["schemas"]["EchoRequest"];
        assert_eq!(echo["required"], json!(["message"]));
        assert!(echo.get("$schema").is_none());

        let format = &doc["components"]["schemas"]["FormatNumberRequest"];
        assert_eq!(format["properties"]["value"]["type"], "number");
        assert_eq!(format["required"], json!(["value"]));
    }

    #[test]
    fn test_decimal_places_schema_matches_accepted_range() {
        let doc = document();
        let schema = doc["components"]["schemas"]["FormatNumberRequest"]["properties"]
            ["decimal_places"]
            .to_string();
        let max = format!("\"maximum\":{}", crate::tools::MAX_DECIMAL_PLACES);
        assert!(schema.contains(&max), "{schema}");
        assert!(!schema.contains("\"maximum\":255"), "{schema}");
    }
}
