use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors produced while shaping an input tree against a schema.
///
/// Compiling a schema never fails; every failure mode here belongs to
/// [`transform`][crate::transform::transform] and its recursive descent.
/// The first error encountered aborts the whole call, so a caller only
/// ever sees one of these at a time.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A field was marked required, had no default, and was absent from the
    /// input.
    #[error("missing required field \"{0}\"")]
    MissingRequiredField(String),
    /// Text needed to become a symbol, but no symbol with that name was in
    /// the registry. Symbols are never created from input data.
    #[error("unknown symbol \"{0}\"")]
    UnknownSymbol(String),
    /// A composite kind expected an object or array and the input held
    /// something else.
    #[error("wrong shape for field \"{key}\": expected {expected}")]
    ShapeMismatch {
        key: String,
        expected: &'static str,
    },
    /// Any other failure encountered mid-descent, including a top-level
    /// input that is not an object.
    #[error("{0}")]
    Unhandled(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_names_the_offender() {
        let err = Error::MissingRequiredField("name".into());
        assert_eq!(err.to_string(), "missing required field \"name\"");
        let err = Error::UnknownSymbol("turbo".into());
        assert_eq!(err.to_string(), "unknown symbol \"turbo\"");
        let err = Error::ShapeMismatch {
            key: "tags".into(),
            expected: "array",
        };
        assert_eq!(
            err.to_string(),
            "wrong shape for field \"tags\": expected array"
        );
    }
}
