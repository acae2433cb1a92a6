use thiserror::Error;

/// Resolution-time failures. These surface immediately from
/// [`crate::resolve_reference`]; resolution is idempotent, so retrying with
/// the same inputs reproduces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("`{type_name}` has no member named `{name}`")]
    NoSuchMember { type_name: String, name: String },

    #[error("no applicable overload of `{name}` for target {target}")]
    NoApplicableMethod { name: String, target: String },

    /// Two or more equally specific candidates survived the same phase.
    /// `candidates` holds their display signatures, sorted.
    #[error("reference to `{name}` is ambiguous: {candidates:?}")]
    AmbiguousReference {
        name: String,
        candidates: Vec<String>,
    },

    #[error("`{type_name}` is not a functional interface ({abstract_count} abstract methods)")]
    NotFunctional {
        type_name: String,
        abstract_count: usize,
    },
}
