//! Shaping decoded JSON input into schema-typed values.

use std::collections::BTreeMap;

use serde_json::Value as Json;

use crate::error::{Error, Result};
use crate::schema::{Kind, KeyKind, Schema};
use crate::symbol::SymbolRegistry;
use crate::value::{MapKey, Record, Value};

/// Shape `input` against `schema`, producing an ordered [`Record`].
///
/// Fields are handled independently, in schema order:
///
/// - An absent field takes its default verbatim if one exists, fails with
///   [`Error::MissingRequiredField`] if it is required, and is otherwise
///   omitted from the output entirely.
/// - A present field converts by its kind. Scalars pass through unchanged
///   (type enforcement belongs to an external validator). Symbol and
///   symbol-enum text resolves against `registry`, failing with
///   [`Error::UnknownSymbol`] rather than ever interning input text.
///   Object and array kinds recurse.
///
/// The whole call is all-or-nothing: the first failure anywhere in the
/// descent aborts it, and no partial structure is returned. The input
/// itself must be an object.
pub fn transform(input: &Json, schema: &Schema, registry: &SymbolRegistry) -> Result<Record> {
    let object = input
        .as_object()
        .ok_or_else(|| Error::Unhandled("expected an object at the top level".to_string()))?;
    transform_object(object, schema, registry)
}

fn transform_object(
    input: &serde_json::Map<String, Json>,
    schema: &Schema,
    registry: &SymbolRegistry,
) -> Result<Record> {
    let mut record = Record::with_capacity(schema.len());
    for (key, spec) in schema {
        match input.get(key.as_str()) {
            None => match spec.default {
                Some(ref default) => record.push(key.clone(), default.clone()),
                None if spec.required => {
                    return Err(Error::MissingRequiredField(key.to_string()))
                }
                None => (),
            },
            Some(raw) => {
                let value =
                    transform_value(key.as_str(), raw, &spec.kind, spec.keys.as_ref(), registry)?;
                record.push(key.clone(), value);
            }
        }
    }
    Ok(record)
}

fn transform_value(
    key: &str,
    raw: &Json,
    kind: &Kind,
    keys: Option<&Schema>,
    registry: &SymbolRegistry,
) -> Result<Value> {
    match kind {
        Kind::Sym => match raw.as_str() {
            Some(text) => resolve(text, registry),
            None => Ok(Value::from_json(raw)),
        },
        // Only an all-symbol enum converts text; plain-value enums pass
        // everything through. Membership is not checked here.
        Kind::Enum(values) => match raw.as_str() {
            Some(text) if values.iter().all(|v| v.is_sym()) => resolve(text, registry),
            _ => Ok(Value::from_json(raw)),
        },
        Kind::Record => {
            let object = expect_object(key, raw, kind)?;
            let empty = Schema::new();
            let rec = transform_object(object, keys.unwrap_or(&empty), registry)?;
            Ok(Value::Record(rec))
        }
        Kind::Map => {
            let object = expect_object(key, raw, kind)?;
            let empty = Schema::new();
            let rec = transform_object(object, keys.unwrap_or(&empty), registry)?;
            Ok(Value::Map(
                rec.into_iter().map(|(k, v)| (MapKey::Sym(k), v)).collect(),
            ))
        }
        Kind::MapOf(key_kind, value_kind) => {
            let object = expect_object(key, raw, kind)?;
            let mut map = BTreeMap::new();
            for (text, value) in object {
                let map_key = match key_kind {
                    KeyKind::Sym => match registry.resolve(text) {
                        Some(sym) => MapKey::Sym(sym),
                        None => return Err(Error::UnknownSymbol(text.clone())),
                    },
                    KeyKind::Str | KeyKind::Any => MapKey::Str(text.clone()),
                };
                let value = transform_value(text, value, value_kind, keys, registry)?;
                map.insert(map_key, value);
            }
            Ok(Value::Map(map))
        }
        Kind::Array(elem) => {
            let items = raw.as_array().ok_or_else(|| Error::ShapeMismatch {
                key: key.to_string(),
                expected: kind.name(),
            })?;
            let items = items
                .iter()
                .map(|item| transform_value(key, item, elem, keys, registry))
                .collect::<Result<Vec<Value>>>()?;
            Ok(Value::Array(items))
        }
        // Scalar, custom, and permissive kinds pass through untouched.
        _ => Ok(Value::from_json(raw)),
    }
}

fn resolve(text: &str, registry: &SymbolRegistry) -> Result<Value> {
    registry
        .resolve(text)
        .map(Value::Sym)
        .ok_or_else(|| Error::UnknownSymbol(text.to_string()))
}

fn expect_object<'a>(
    key: &str,
    raw: &'a Json,
    kind: &Kind,
) -> Result<&'a serde_json::Map<String, Json>> {
    raw.as_object().ok_or_else(|| Error::ShapeMismatch {
        key: key.to_string(),
        expected: kind.name(),
    })
}
