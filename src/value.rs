use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Index;

use serde::ser::{Serialize, Serializer};

use crate::symbol::Symbol;

/// A typed value tree, as produced by transforming input against a schema.
///
/// This mirrors the JSON data model, with two additions: [`Sym`][Value::Sym]
/// holds an interned [`Symbol`] rather than free text, and objects come in
/// two distinct shapes. [`Record`][Value::Record] is an ordered pair
/// sequence for declared-key objects, while [`Value::Map`] is a key-indexed
/// mapping for dynamic-key objects. The two are never conflated.
///
/// Numbers are carried as [`serde_json::Number`], so integer and float
/// inputs pass through without loss.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Str(String),
    Sym(Symbol),
    Array(Vec<Value>),
    Record(Record),
    Map(BTreeMap<MapKey, Value>),
}

impl Value {
    /// Structural conversion from a decoded JSON tree. Objects become
    /// dynamic maps with text keys; nothing is interned.
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(*v),
            serde_json::Value::Number(n) => Value::Number(n.clone()),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(v) => {
                Value::Array(v.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(m) => Value::Map(
                m.iter()
                    .map(|(k, v)| (MapKey::Str(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Structural conversion to a JSON tree. Symbols render as strings,
    /// records as objects in field order.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Sym(s) => serde_json::Value::String(s.to_string()),
            Value::Array(v) => {
                serde_json::Value::Array(v.iter().map(Value::to_json).collect())
            }
            Value::Record(r) => {
                let mut obj = serde_json::Map::with_capacity(r.len());
                for (key, value) in r {
                    obj.insert(key.to_string(), value.to_json());
                }
                serde_json::Value::Object(obj)
            }
            Value::Map(m) => {
                let mut obj = serde_json::Map::with_capacity(m.len());
                for (key, value) in m {
                    obj.insert(key.as_str().to_string(), value.to_json());
                }
                serde_json::Value::Object(obj)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_i64(&self) -> bool {
        if let Value::Number(ref n) = *self {
            n.is_i64()
        } else {
            false
        }
    }

    pub fn is_u64(&self) -> bool {
        if let Value::Number(ref n) = *self {
            n.is_u64()
        } else {
            false
        }
    }

    pub fn is_f64(&self) -> bool {
        if let Value::Number(ref n) = *self {
            n.is_f64()
        } else {
            false
        }
    }

    pub fn is_str(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    pub fn is_sym(&self) -> bool {
        matches!(self, Value::Sym(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Bool(v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Number(ref n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Number(ref n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Number(ref n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::Str(ref v) = *self {
            Some(v.as_str())
        } else {
            None
        }
    }

    pub fn as_sym(&self) -> Option<&Symbol> {
        if let Value::Sym(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    /// The text of either text variant, string or symbol.
    pub fn as_text(&self) -> Option<&str> {
        match *self {
            Value::Str(ref v) => Some(v.as_str()),
            Value::Sym(ref v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(ref v) = *self {
            Some(v.as_slice())
        } else {
            None
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        if let Value::Record(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        if let Value::Map(ref v) = *self {
            Some(v)
        } else {
            None
        }
    }
}

static NULL: Value = Value::Null;

impl Index<usize> for Value {
    type Output = Value;

    fn index(&self, index: usize) -> &Self::Output {
        self.as_array().and_then(|v| v.get(index)).unwrap_or(&NULL)
    }
}

impl Index<&str> for Value {
    type Output = Value;

    fn index(&self, index: &str) -> &Self::Output {
        match self {
            Value::Record(r) => r.get(index).unwrap_or(&NULL),
            Value::Map(m) => m.get(index).unwrap_or(&NULL),
            _ => &NULL,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(n) => n.serialize(serializer),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Sym(s) => serializer.serialize_str(s.as_str()),
            Value::Array(v) => serializer.collect_seq(v),
            Value::Record(r) => r.serialize(serializer),
            Value::Map(m) => serializer.collect_map(m),
        }
    }
}

macro_rules! impl_value_from {
    ($t: ty, $p: ident) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$p(v)
            }
        }
    };
}

macro_rules! impl_value_from_integer {
    ($t: ty) => {
        impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::Number(From::from(v))
            }
        }
    };
}

impl_value_from!(bool, Bool);
impl_value_from!(serde_json::Number, Number);
impl_value_from!(String, Str);
impl_value_from!(Symbol, Sym);
impl_value_from!(Vec<Value>, Array);
impl_value_from!(Record, Record);
impl_value_from!(BTreeMap<MapKey, Value>, Map);
impl_value_from_integer!(u8);
impl_value_from_integer!(u16);
impl_value_from_integer!(u32);
impl_value_from_integer!(u64);
impl_value_from_integer!(usize);
impl_value_from_integer!(i8);
impl_value_from_integer!(i16);
impl_value_from_integer!(i32);
impl_value_from_integer!(i64);
impl_value_from_integer!(isize);

impl From<()> for Value {
    fn from((): ()) -> Self {
        Value::Null
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        // Non-finite floats have no JSON form and degrade to null.
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::from(f64::from(v))
    }
}

impl<'a> From<&'a str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<'a> From<Cow<'a, str>> for Value {
    fn from(v: Cow<'a, str>) -> Self {
        Value::Str(v.to_string())
    }
}

impl<V: Into<Value>> std::iter::FromIterator<V> for Value {
    fn from_iter<T: IntoIterator<Item = V>>(iter: T) -> Self {
        let v: Vec<Value> = iter.into_iter().map(Into::into).collect();
        Value::Array(v)
    }
}

macro_rules! impl_value_eq_number {
    ($as: ident, $target: ty, $($t: ty)*) => {
        $(
            impl PartialEq<$t> for Value {
                fn eq(&self, other: &$t) -> bool {
                    self.$as().map_or(false, |v| v == (*other as $target))
                }
            }
        )*
    };
}

impl_value_eq_number!(as_i64, i64, i8 i16 i32 i64 isize);
impl_value_eq_number!(as_u64, u64, u8 u16 u32 u64 usize);
impl_value_eq_number!(as_f64, f64, f32 f64);

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool().map_or(false, |v| v == *other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text().map_or(false, |v| v == other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text().map_or(false, |v| v == *other)
    }
}

impl PartialEq<String> for Value {
    fn eq(&self, other: &String) -> bool {
        self.as_text().map_or(false, |v| v == other.as_str())
    }
}

use std::convert::TryFrom;

macro_rules! impl_try_from_value {
    ($t: ty, $p: ident) => {
        impl TryFrom<Value> for $t {
            type Error = Value;
            fn try_from(v: Value) -> Result<Self, Self::Error> {
                match v {
                    Value::$p(v) => Ok(v),
                    _ => Err(v),
                }
            }
        }
    };
}

macro_rules! impl_try_from_value_integer {
    ($t: ty, $as: ident) => {
        impl TryFrom<Value> for $t {
            type Error = Value;
            fn try_from(v: Value) -> Result<Self, Self::Error> {
                match v.$as().and_then(|i| <$t>::try_from(i).ok()) {
                    Some(i) => Ok(i),
                    None => Err(v),
                }
            }
        }
    };
}

impl_try_from_value!(bool, Bool);
impl_try_from_value!(String, Str);
impl_try_from_value!(Symbol, Sym);
impl_try_from_value!(Vec<Value>, Array);
impl_try_from_value!(Record, Record);
impl_try_from_value!(BTreeMap<MapKey, Value>, Map);
impl_try_from_value_integer!(u8, as_u64);
impl_try_from_value_integer!(u16, as_u64);
impl_try_from_value_integer!(u32, as_u64);
impl_try_from_value_integer!(u64, as_u64);
impl_try_from_value_integer!(usize, as_u64);
impl_try_from_value_integer!(i8, as_i64);
impl_try_from_value_integer!(i16, as_i64);
impl_try_from_value_integer!(i32, as_i64);
impl_try_from_value_integer!(i64, as_i64);
impl_try_from_value_integer!(isize, as_i64);

impl TryFrom<Value> for f64 {
    type Error = Value;
    fn try_from(v: Value) -> Result<Self, Self::Error> {
        match v.as_f64() {
            Some(f) => Ok(f),
            None => Err(v),
        }
    }
}

/// An ordered sequence of symbol-keyed fields.
///
/// The output shape for declared-key objects: fields appear in schema
/// order and are looked up by a linear scan, so iteration order is part of
/// the contract. Serializes as a JSON object with its fields in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record(Vec<(Symbol, Value)>);

impl Record {
    /// Make a new, empty record.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Record(Vec::with_capacity(capacity))
    }

    /// Append a field. Lookup returns the first match, so pushing an
    /// already-present key shadows nothing.
    pub fn push(&mut self, key: impl Into<Symbol>, value: impl Into<Value>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<(Symbol, Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Symbol> {
        self.0.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().map(|(_, v)| v)
    }
}

impl Index<&str> for Record {
    type Output = Value;

    fn index(&self, index: &str) -> &Self::Output {
        self.get(index).unwrap_or(&NULL)
    }
}

impl IntoIterator for Record {
    type Item = (Symbol, Value);
    type IntoIter = std::vec::IntoIter<(Symbol, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a (Symbol, Value);
    type IntoIter = std::slice::Iter<'a, (Symbol, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<Symbol>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

/// A key in a dynamic map: either a resolved symbol or plain text.
///
/// Keys order and compare by their text alone, so a map holds one entry
/// per name regardless of which variant carries it.
#[derive(Clone, Debug)]
pub enum MapKey {
    Sym(Symbol),
    Str(String),
}

impl MapKey {
    pub fn as_str(&self) -> &str {
        match self {
            MapKey::Sym(s) => s.as_str(),
            MapKey::Str(s) => s.as_str(),
        }
    }

    pub fn is_sym(&self) -> bool {
        matches!(self, MapKey::Sym(_))
    }
}

impl PartialEq for MapKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for MapKey {}

impl PartialOrd for MapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl std::borrow::Borrow<str> for MapKey {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Symbol> for MapKey {
    fn from(sym: Symbol) -> Self {
        MapKey::Sym(sym)
    }
}

impl From<&str> for MapKey {
    fn from(text: &str) -> Self {
        MapKey::Str(text.to_string())
    }
}

impl From<String> for MapKey {
    fn from(text: String) -> Self {
        MapKey::Str(text)
    }
}

impl Serialize for MapKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
