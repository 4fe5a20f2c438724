//! Compiling schemas into function-call parameter specs.

use serde::Serialize;
use serde_json::{json, Value as Json};

use crate::json_schema;
use crate::schema::Schema;

/// A function-call parameter spec: a named, described JSON Schema document.
///
/// Serializes to exactly `{"name", "description", "parameters"}`, the form
/// function-calling interfaces consume.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub parameters: Json,
}

impl FunctionSpec {
    /// The spec as a JSON document.
    pub fn to_value(&self) -> Json {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters,
        })
    }
}

/// Compile a schema into a function-call parameter spec.
///
/// `parameters` is the [`json_schema::compile`] output, with each top-level
/// field's doc string injected as that property's `"description"`. Only
/// top-level docs surface; nested fields keep theirs to themselves.
/// Supplying a non-empty `name` is the caller's contract; the compiler
/// itself never fails.
pub fn compile(
    name: impl Into<String>,
    description: impl Into<String>,
    schema: &Schema,
) -> FunctionSpec {
    let mut parameters = json_schema::compile(schema);
    for (key, spec) in schema {
        if let Some(ref doc) = spec.doc {
            parameters["properties"][key.as_str()]["description"] = Json::String(doc.clone());
        }
    }
    FunctionSpec {
        name: name.into(),
        description: description.into(),
        parameters,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::{FieldSpec, Kind};

    #[test]
    fn serializes_to_the_name_description_parameters_triple() {
        let schema = Schema::new().field("city", FieldSpec::new(Kind::Str).required(true));
        let spec = compile("get_weather", "Look up the current weather", &schema);
        let text = serde_json::to_string(&spec).unwrap();
        assert_eq!(
            text,
            r#"{"name":"get_weather","description":"Look up the current weather","parameters":{"type":"object","properties":{"city":{"type":"string"}},"required":["city"]}}"#
        );
        assert_eq!(spec.to_value(), serde_json::to_value(&spec).unwrap());
    }

    #[test]
    fn top_level_docs_become_descriptions() {
        let schema = Schema::new()
            .field(
                "count",
                FieldSpec::new(Kind::Int)
                    .default_value(30)
                    .doc("How many results to return"),
            )
            .field("quiet", FieldSpec::new(Kind::Bool));
        let spec = compile("search", "Run a search", &schema);
        let count = &spec.parameters["properties"]["count"];
        assert_eq!(count["description"], "How many results to return");
        assert_eq!(
            serde_json::to_string(count).unwrap(),
            r#"{"type":"integer","default":30,"description":"How many results to return"}"#
        );
        assert!(!spec.parameters["properties"]["quiet"]
            .as_object()
            .unwrap()
            .contains_key("description"));
    }

    #[test]
    fn nested_docs_stay_put() {
        let schema = Schema::new().field(
            "owner",
            FieldSpec::new(Kind::Record).keys(
                Schema::new().field(
                    "name",
                    FieldSpec::new(Kind::Str).doc("Should not surface"),
                ),
            ),
        );
        let spec = compile("register", "Register an owner", &schema);
        let nested = &spec.parameters["properties"]["owner"]["properties"]["name"];
        assert!(!nested.as_object().unwrap().contains_key("description"));
    }

    #[test]
    fn empty_schema_still_yields_an_object_document() {
        let spec = compile("noop", "Takes nothing", &Schema::new());
        assert_eq!(
            spec.parameters,
            json!({"type": "object", "properties": {}})
        );
    }
}
