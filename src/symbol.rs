use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::schema::{Kind, Schema};
use crate::value::{MapKey, Value};

/// An interned identifier, distinct from ordinary text.
///
/// Symbols name schema fields, enum members, and map keys that have been
/// converted from input text. They clone cheaply and compare by their text.
/// Creating one directly is fine for values that come from code; text that
/// comes from input data must instead go through
/// [`SymbolRegistry::resolve`], which refuses to invent new symbols.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Make a new symbol from the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Symbol(Arc::from(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(text: &str) -> Self {
        Symbol::new(text)
    }
}

impl From<String> for Symbol {
    fn from(text: String) -> Self {
        Symbol::new(text)
    }
}

impl PartialEq<str> for Symbol {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Symbol {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Serialize for Symbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A fixed lookup table of known symbols.
///
/// The registry is populated up front, from a schema and optionally a few
/// extra names, and is then only read during transformation. Input text
/// resolves to a symbol only if that symbol was registered beforehand, so
/// untrusted data can never grow the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolRegistry {
    symbols: BTreeSet<Symbol>,
}

impl SymbolRegistry {
    /// Make a new, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every symbol a schema declares: field keys
    /// at all nesting levels, symbol-valued enum members, and symbols
    /// appearing inside default values.
    pub fn from_schema(schema: &Schema) -> Self {
        let mut reg = Self::new();
        reg.add_schema(schema);
        reg
    }

    /// Intern a symbol ahead of time. Returns the existing symbol when the
    /// name is already registered.
    pub fn register(&mut self, text: impl Into<String>) -> Symbol {
        let text = text.into();
        if let Some(sym) = self.symbols.get(text.as_str()) {
            return sym.clone();
        }
        let sym = Symbol::new(text);
        self.symbols.insert(sym.clone());
        sym
    }

    /// Look up already-registered text. Never creates an entry.
    pub fn resolve(&self, text: &str) -> Option<Symbol> {
        self.symbols.get(text).cloned()
    }

    pub fn contains(&self, text: &str) -> bool {
        self.symbols.contains(text)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<Symbol> {
        self.symbols.iter()
    }

    fn add_schema(&mut self, schema: &Schema) {
        for (key, spec) in schema {
            self.symbols.insert(key.clone());
            self.add_kind(&spec.kind);
            if let Some(ref default) = spec.default {
                self.add_value(default);
            }
            if let Some(ref keys) = spec.keys {
                self.add_schema(keys);
            }
        }
    }

    fn add_kind(&mut self, kind: &Kind) {
        match kind {
            Kind::Enum(values) => {
                for value in values {
                    self.add_value(value);
                }
            }
            Kind::Array(elem) => self.add_kind(elem),
            Kind::MapOf(_, values) => self.add_kind(values),
            _ => (),
        }
    }

    fn add_value(&mut self, value: &Value) {
        match value {
            Value::Sym(sym) => {
                self.symbols.insert(sym.clone());
            }
            Value::Array(values) => {
                for value in values {
                    self.add_value(value);
                }
            }
            Value::Record(record) => {
                for (key, value) in record {
                    self.symbols.insert(key.clone());
                    self.add_value(value);
                }
            }
            Value::Map(map) => {
                for (key, value) in map {
                    if let MapKey::Sym(sym) = key {
                        self.symbols.insert(sym.clone());
                    }
                    self.add_value(value);
                }
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::FieldSpec;

    #[test]
    fn symbols_compare_by_text() {
        let a = Symbol::new("tag");
        let b = Symbol::from("tag");
        assert_eq!(a, b);
        assert_eq!(a, "tag");
        assert_eq!(a.to_string(), "tag");
    }

    #[test]
    fn resolve_never_creates() {
        let mut reg = SymbolRegistry::new();
        assert_eq!(reg.resolve("linux"), None);
        let sym = reg.register("linux");
        assert_eq!(reg.resolve("linux"), Some(sym));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn register_reuses_existing() {
        let mut reg = SymbolRegistry::new();
        let first = reg.register("os");
        let second = reg.register("os");
        assert_eq!(first, second);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn from_schema_collects_all_declared_symbols() {
        let schema = Schema::new()
            .field(
                "status",
                FieldSpec::new(Kind::Enum(vec![
                    Value::from(Symbol::new("active")),
                    Value::from(Symbol::new("inactive")),
                ])),
            )
            .field(
                "owner",
                FieldSpec::new(Kind::Record).keys(
                    Schema::new().field("name", FieldSpec::new(Kind::Str)),
                ),
            )
            .field(
                "mode",
                FieldSpec::new(Kind::Sym).default_value(Symbol::new("fast")),
            );
        let reg = schema.symbols();
        for name in ["status", "active", "inactive", "owner", "name", "mode", "fast"] {
            assert!(reg.contains(name), "missing symbol {}", name);
        }
        assert!(!reg.contains("slow"));
    }
}
