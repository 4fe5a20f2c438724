use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::function_spec::FunctionSpec;
use crate::symbol::{Symbol, SymbolRegistry};
use crate::value::{Record, Value};

/// The type tag of a schema field.
///
/// Tags drive both directions of the engine:
/// [`json_schema::compile`][crate::json_schema::compile] maps each tag to a
/// JSON Schema fragment, and [`transform`][crate::transform::transform] maps
/// it to a conversion of the raw input value. Scalar tags describe but do
/// not enforce; range and membership checking belong to an external
/// validator.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Kind {
    /// Plain text.
    Str,
    /// An interned identifier. Input text resolves against the symbol
    /// registry during transformation.
    Sym,
    /// Any integer.
    Int,
    /// An integer of at least zero.
    NonNegInt,
    /// An integer of at least one.
    PosInt,
    /// A floating-point number.
    Float,
    /// A boolean.
    Bool,
    /// An object with declared keys only. Compiles closed, transforms to
    /// an ordered [`Record`].
    Record,
    /// An object with declared keys plus whatever else. Compiles open,
    /// transforms to a key-indexed [`Value::Map`].
    Map,
    /// A fully dynamic object. Keys convert per [`KeyKind`], values per the
    /// contained kind.
    MapOf(KeyKind, Box<Kind>),
    /// An array whose elements all follow the contained kind.
    Array(Box<Kind>),
    /// One of a fixed set of values, copied into the compiled document
    /// verbatim.
    Enum(Vec<Value>),
    /// An opaque custom validation, carried by reference and run by an
    /// external collaborator.
    Custom(ValidatorRef),
    /// Accepts anything without examining it.
    #[default]
    Any,
}

impl Kind {
    /// Shorthand for an array of the given element kind.
    pub fn array(elem: Kind) -> Self {
        Kind::Array(Box::new(elem))
    }

    /// Shorthand for a dynamic map with the given key and value kinds.
    pub fn map_of(keys: KeyKind, values: Kind) -> Self {
        Kind::MapOf(keys, Box::new(values))
    }

    /// The kind's display name, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Str => "string",
            Kind::Sym => "symbol",
            Kind::Int => "integer",
            Kind::NonNegInt => "non-negative integer",
            Kind::PosInt => "positive integer",
            Kind::Float => "float",
            Kind::Bool => "boolean",
            Kind::Record => "object",
            Kind::Map => "object",
            Kind::MapOf(..) => "map",
            Kind::Array(_) => "array",
            Kind::Enum(_) => "enum",
            Kind::Custom(_) => "custom",
            Kind::Any => "any",
        }
    }
}

/// How the keys of a [`Kind::MapOf`] object convert during transformation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyKind {
    /// Keys resolve to registered symbols; unknown key text fails.
    Sym,
    /// Keys stay as text.
    Str,
    /// Keys pass through untouched.
    Any,
}

/// The callable form of a custom validation.
pub type ValidatorFn = dyn Fn(&Value) -> std::result::Result<Value, String> + Send + Sync;

/// A named reference to an external validation function.
///
/// The function takes a transformed value and either returns it (possibly
/// adjusted) or describes why it is unacceptable. This crate only carries
/// the reference; invoking it is the external validator's job, via
/// [`callable`][ValidatorRef::callable].
#[derive(Clone)]
pub struct ValidatorRef {
    name: String,
    func: Arc<ValidatorFn>,
}

impl ValidatorRef {
    /// Make a new reference wrapping the given function.
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) -> Self {
        ValidatorRef {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn callable(&self) -> &ValidatorFn {
        &*self.func
    }
}

impl fmt::Debug for ValidatorRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("ValidatorRef").field(&self.name).finish()
    }
}

// Closures aren't comparable, so equality goes by name.
impl PartialEq for ValidatorRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// One field's declaration: its kind plus the surrounding rules.
///
/// Built with consuming setters:
///
/// ```
/// # use argshape::*;
/// let spec = FieldSpec::new(Kind::Int)
///     .required(true)
///     .doc("How many workers to start");
/// ```
///
/// # Defaults
///
/// - Kind is [`Any`][Kind::Any]
/// - Not required
/// - No default value, no doc string, no nested schema
///
/// A present `default` always satisfies a missing input field, so setting
/// one makes `required` irrelevant. Presence is what counts: a default of
/// `false` or `0` is still a default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSpec {
    /// The field's type tag.
    pub kind: Kind,
    /// Whether the field must appear in the input. Overridden by `default`.
    pub required: bool,
    /// Value to fill in when the field is absent, used verbatim.
    pub default: Option<Value>,
    /// Doc string, surfaced for top-level fields by the function-spec
    /// compiler.
    pub doc: Option<String>,
    /// Nested schema for object-shaped kinds, including the elements of an
    /// object-kinded array.
    pub keys: Option<Schema>,
}

impl FieldSpec {
    /// Make a new field declaration of the given kind.
    pub fn new(kind: Kind) -> Self {
        FieldSpec {
            kind,
            ..Self::default()
        }
    }

    /// Set whether the field must appear in the input.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the value to use when the field is absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set the field's doc string.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set the nested schema describing this field's object keys.
    pub fn keys(mut self, keys: Schema) -> Self {
        self.keys = Some(keys);
        self
    }
}

/// An ordered set of field declarations.
///
/// A schema is the single source for all three outputs: a JSON Schema
/// document ([`json_schema`][Schema::json_schema]), a function-call
/// parameter spec ([`function_spec`][Schema::function_spec]), and a typed
/// reshaping of input data ([`transform`][Schema::transform]). Field order
/// is preserved everywhere; keys are unique, and redeclaring one replaces
/// its spec in place.
///
/// ```
/// # use argshape::*;
/// let schema = Schema::new()
///     .field("name", FieldSpec::new(Kind::Str).required(true))
///     .field("age", FieldSpec::new(Kind::Int).default_value(30));
///
/// let doc = schema.json_schema();
/// assert_eq!(doc["properties"]["age"]["default"], 30);
///
/// let registry = schema.symbols();
/// let input = serde_json::json!({ "name": "Bo" });
/// let rec = schema.transform(&input, &registry)?;
/// assert_eq!(rec["name"], "Bo");
/// assert_eq!(rec["age"], 30);
/// # Ok::<(), argshape::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(Symbol, FieldSpec)>,
}

impl Schema {
    /// Make a new, empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring an existing key replaces its spec
    /// without moving the field.
    pub fn field(mut self, key: impl Into<Symbol>, spec: FieldSpec) -> Self {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = spec,
            None => self.fields.push((key, spec)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, spec)| spec)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<(Symbol, FieldSpec)> {
        self.fields.iter()
    }

    /// Compile into a JSON Schema document. Never fails.
    pub fn json_schema(&self) -> serde_json::Value {
        crate::json_schema::compile(self)
    }

    /// Compile into a function-call parameter spec. Never fails.
    pub fn function_spec(
        &self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> FunctionSpec {
        crate::function_spec::compile(name, description, self)
    }

    /// Shape the given input against this schema. See
    /// [`transform`][crate::transform::transform].
    pub fn transform(
        &self,
        input: &serde_json::Value,
        registry: &SymbolRegistry,
    ) -> Result<Record> {
        crate::transform::transform(input, self, registry)
    }

    /// Build a registry of every symbol this schema declares.
    pub fn symbols(&self) -> SymbolRegistry {
        SymbolRegistry::from_schema(self)
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a (Symbol, FieldSpec);
    type IntoIter = std::slice::Iter<'a, (Symbol, FieldSpec)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
