//! Compiling schemas into JSON Schema documents.

use serde_json::{json, Map, Value as Json};

use crate::schema::{FieldSpec, Kind, Schema};

/// Compile a schema into a JSON Schema document.
///
/// The document is an object schema: `"type"`, `"properties"` holding one
/// fragment per field in schema order, and a `"required"` list naming every
/// field that is required and carries no default. A defaulted field can
/// always be filled in, so it is never listed as required, whatever its
/// `required` flag says. The list is omitted entirely when empty.
///
/// Compilation is total and deterministic: it never fails (the permissive
/// [`Kind::Any`] becomes an empty fragment), and the same schema always
/// serializes to the same bytes.
pub fn compile(schema: &Schema) -> Json {
    Json::Object(compile_object(schema))
}

fn compile_object(schema: &Schema) -> Map<String, Json> {
    let mut doc = Map::new();
    doc.insert("type".to_string(), json!("object"));
    let mut properties = Map::new();
    for (key, spec) in schema {
        properties.insert(key.to_string(), compile_field(spec));
    }
    doc.insert("properties".to_string(), Json::Object(properties));
    let required: Vec<Json> = schema
        .iter()
        .filter(|(_, spec)| spec.required && spec.default.is_none())
        .map(|(key, _)| json!(key.as_str()))
        .collect();
    if !required.is_empty() {
        doc.insert("required".to_string(), Json::Array(required));
    }
    doc
}

fn compile_field(spec: &FieldSpec) -> Json {
    let mut fragment = compile_kind(&spec.kind, spec.keys.as_ref());
    if let Some(ref default) = spec.default {
        fragment.insert("default".to_string(), default.to_json());
    }
    Json::Object(fragment)
}

fn compile_kind(kind: &Kind, keys: Option<&Schema>) -> Map<String, Json> {
    let empty = Schema::new();
    let keys_schema = keys.unwrap_or(&empty);
    match kind {
        Kind::Str | Kind::Sym => scalar("string"),
        Kind::Int => scalar("integer"),
        Kind::NonNegInt => {
            let mut m = scalar("integer");
            m.insert("minimum".to_string(), json!(0));
            m
        }
        Kind::PosInt => {
            let mut m = scalar("integer");
            m.insert("minimum".to_string(), json!(1));
            m
        }
        Kind::Float => scalar("number"),
        Kind::Bool => scalar("boolean"),
        Kind::Record => {
            let mut m = compile_object(keys_schema);
            m.insert("additionalProperties".to_string(), json!(false));
            m
        }
        Kind::Map => compile_object(keys_schema),
        Kind::MapOf(..) => {
            // Declared keys document expectations; without any, the map is
            // just an object.
            if keys_schema.is_empty() {
                scalar("object")
            } else {
                compile_object(keys_schema)
            }
        }
        Kind::Array(elem) => {
            let mut m = scalar("array");
            m.insert("items".to_string(), Json::Object(compile_kind(elem, keys)));
            m
        }
        Kind::Enum(values) => {
            let mut m = Map::new();
            m.insert(
                "enum".to_string(),
                Json::Array(values.iter().map(|v| v.to_json()).collect()),
            );
            m
        }
        Kind::Custom(_) => scalar("string"),
        Kind::Any => Map::new(),
    }
}

fn scalar(name: &str) -> Map<String, Json> {
    let mut m = Map::new();
    m.insert("type".to_string(), json!(name));
    m
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::{KeyKind, ValidatorRef};
    use crate::symbol::Symbol;
    use crate::value::Value;

    fn fragment(kind: Kind) -> Json {
        let schema = Schema::new().field("x", FieldSpec::new(kind));
        compile(&schema)["properties"]["x"].clone()
    }

    #[test]
    fn scalar_kinds() {
        assert_eq!(fragment(Kind::Str), json!({"type": "string"}));
        assert_eq!(fragment(Kind::Sym), json!({"type": "string"}));
        assert_eq!(fragment(Kind::Int), json!({"type": "integer"}));
        assert_eq!(
            fragment(Kind::NonNegInt),
            json!({"type": "integer", "minimum": 0})
        );
        assert_eq!(
            fragment(Kind::PosInt),
            json!({"type": "integer", "minimum": 1})
        );
        assert_eq!(fragment(Kind::Float), json!({"type": "number"}));
        assert_eq!(fragment(Kind::Bool), json!({"type": "boolean"}));
        assert_eq!(fragment(Kind::Any), json!({}));
    }

    #[test]
    fn custom_kind_is_an_opaque_string() {
        let checked = Kind::Custom(ValidatorRef::new("even", |v| Ok(v.clone())));
        assert_eq!(fragment(checked), json!({"type": "string"}));
    }

    #[test]
    fn empty_schema() {
        let doc = compile(&Schema::new());
        assert_eq!(doc, json!({"type": "object", "properties": {}}));
        assert!(!doc.as_object().unwrap().contains_key("required"));
    }

    #[test]
    fn required_skips_defaulted_fields() {
        let schema = Schema::new()
            .field("host", FieldSpec::new(Kind::Str).required(true))
            .field(
                "port",
                FieldSpec::new(Kind::PosInt).required(true).default_value(80),
            )
            .field("tls", FieldSpec::new(Kind::Bool));
        let doc = compile(&schema);
        assert_eq!(doc["required"], json!(["host"]));
    }

    #[test]
    fn required_omitted_when_everything_is_satisfiable() {
        let schema = Schema::new()
            .field("a", FieldSpec::new(Kind::Int).default_value(1))
            .field("b", FieldSpec::new(Kind::Str));
        let doc = compile(&schema);
        assert!(!doc.as_object().unwrap().contains_key("required"));
    }

    #[test]
    fn falsy_defaults_are_emitted() {
        let schema = Schema::new()
            .field("verbose", FieldSpec::new(Kind::Bool).default_value(false))
            .field("retries", FieldSpec::new(Kind::Int).default_value(0));
        let doc = compile(&schema);
        assert_eq!(
            doc["properties"]["verbose"],
            json!({"type": "boolean", "default": false})
        );
        assert_eq!(
            doc["properties"]["retries"],
            json!({"type": "integer", "default": 0})
        );
    }

    #[test]
    fn strict_objects_close_and_shorthand_objects_stay_open() {
        let keys = Schema::new().field("name", FieldSpec::new(Kind::Str).required(true));
        let strict = fragment_with_keys(Kind::Record, keys.clone());
        assert_eq!(
            strict,
            json!({
                "type": "object",
                "properties": {"name": {"type": "string"}},
                "required": ["name"],
                "additionalProperties": false
            })
        );
        let open = fragment_with_keys(Kind::Map, keys);
        assert!(!open.as_object().unwrap().contains_key("additionalProperties"));
        assert_eq!(open["properties"]["name"], json!({"type": "string"}));
    }

    #[test]
    fn dynamic_maps_compile_bare_or_merged() {
        let bare = fragment(Kind::map_of(KeyKind::Sym, Kind::Int));
        assert_eq!(bare, json!({"type": "object"}));

        let documented = fragment_with_keys(
            Kind::map_of(KeyKind::Str, Kind::Int),
            Schema::new().field("hint", FieldSpec::new(Kind::Int)),
        );
        assert_eq!(
            documented,
            json!({
                "type": "object",
                "properties": {"hint": {"type": "integer"}}
            })
        );
    }

    #[test]
    fn arrays_recurse_on_their_element_kind() {
        assert_eq!(
            fragment(Kind::array(Kind::Int)),
            json!({"type": "array", "items": {"type": "integer"}})
        );
        assert_eq!(
            fragment(Kind::array(Kind::array(Kind::Str))),
            json!({
                "type": "array",
                "items": {"type": "array", "items": {"type": "string"}}
            })
        );
    }

    #[test]
    fn arrays_of_objects_use_the_field_keys() {
        let items = Schema::new()
            .field("name", FieldSpec::new(Kind::Str).required(true))
            .field("age", FieldSpec::new(Kind::Int));
        let frag = fragment_with_keys(Kind::array(Kind::Record), items);
        assert_eq!(
            frag,
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "age": {"type": "integer"}
                    },
                    "required": ["name"],
                    "additionalProperties": false
                }
            })
        );
    }

    #[test]
    fn enums_copy_values_verbatim() {
        let status = Kind::Enum(vec![
            Value::from(Symbol::new("active")),
            Value::from(Symbol::new("inactive")),
        ]);
        assert_eq!(fragment(status), json!({"enum": ["active", "inactive"]}));

        let mixed = Kind::Enum(vec![Value::from(1), Value::from("one")]);
        let frag = fragment(mixed);
        assert_eq!(frag, json!({"enum": [1, "one"]}));
        assert!(!frag.as_object().unwrap().contains_key("type"));
    }

    #[test]
    fn compilation_is_deterministic_and_schema_ordered() {
        let schema = Schema::new()
            .field("zeta", FieldSpec::new(Kind::Str).required(true))
            .field("alpha", FieldSpec::new(Kind::Int));
        let first = serde_json::to_string(&compile(&schema)).unwrap();
        let second = serde_json::to_string(&compile(&schema)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"{"type":"object","properties":{"zeta":{"type":"string"},"alpha":{"type":"integer"}},"required":["zeta"]}"#
        );
    }

    fn fragment_with_keys(kind: Kind, keys: Schema) -> Json {
        let schema = Schema::new().field("x", FieldSpec::new(kind).keys(keys));
        compile(&schema)["properties"]["x"].clone()
    }
}
