//! argshape turns one declarative option schema into three coordinated
//! outputs:
//!
//! - a JSON Schema document, for any standards-based validator
//!   ([`json_schema::compile`]),
//! - a function-call parameter spec, the `{"name", "description",
//!   "parameters"}` triple that function-calling interfaces consume
//!   ([`function_spec::compile`]),
//! - a typed reshaping of untyped input data: required-field checks,
//!   default filling, symbol conversion, and recursive descent into nested
//!   objects, arrays, and dynamic maps ([`transform::transform`]).
//!
//! The schema is plain data built in code from [`FieldSpec`] declarations,
//! and the three outputs share its policies rather than encoding their own:
//! a default always beats a required flag, a default of `false` or `0` is
//! still a default, declared-key objects stay ordered while dynamic maps
//! are key-indexed, and field order is preserved end to end. Compiling
//! never fails and is deterministic down to the byte.
//!
//! Two deliberate boundaries keep the core small:
//!
//! - Scalar types, numeric ranges, enum membership, and custom checks are
//!   described, not enforced. Enforcement belongs to an external validator
//!   working from the compiled document and the transformed output.
//! - Symbols never come from input data. A [`SymbolRegistry`] is populated
//!   up front ([`Schema::symbols`], plus [`SymbolRegistry::register`] for
//!   extras) and transformation only resolves against it, so untrusted
//!   text cannot grow the symbol table.
//!
//! # Example
//!
//! ```
//! use argshape::{FieldSpec, Kind, Schema};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), argshape::Error> {
//! let schema = Schema::new()
//!     .field(
//!         "city",
//!         FieldSpec::new(Kind::Str)
//!             .required(true)
//!             .doc("City to look up"),
//!     )
//!     .field("days", FieldSpec::new(Kind::PosInt).default_value(1));
//!
//! // A JSON Schema document.
//! let doc = schema.json_schema();
//! assert_eq!(doc["required"], json!(["city"]));
//!
//! // A function-call parameter spec.
//! let spec = schema.function_spec("get_forecast", "Fetch a weather forecast");
//! assert_eq!(
//!     spec.parameters["properties"]["city"]["description"],
//!     "City to look up"
//! );
//!
//! // Typed shaping of input data.
//! let registry = schema.symbols();
//! let rec = schema.transform(&json!({"city": "Oslo"}), &registry)?;
//! assert_eq!(rec["city"], "Oslo");
//! assert_eq!(rec["days"], 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod function_spec;
pub mod json_schema;
pub mod schema;
pub mod symbol;
pub mod transform;
pub mod value;

pub use self::error::{Error, Result};
pub use self::function_spec::FunctionSpec;
pub use self::schema::{FieldSpec, Kind, KeyKind, Schema, ValidatorFn, ValidatorRef};
pub use self::symbol::{Symbol, SymbolRegistry};
pub use self::value::{MapKey, Record, Value};
