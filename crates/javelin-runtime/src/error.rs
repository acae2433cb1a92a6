use thiserror::Error;

/// Invocation-time failures. These propagate to the adapter's caller
/// uncaught; the engine neither swallows nor downgrades them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("expected {expected} arguments, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// A conversion promised by resolution cannot be performed on the actual
    /// runtime value, e.g. `null` unboxed to a primitive.
    #[error("cannot convert {value} to `{expected}`")]
    ConversionError { value: String, expected: String },

    #[error("null receiver for instance method `{0}`")]
    NullReceiver(String),

    #[error("no native implementation registered for `{class}::{member}`")]
    MissingNative { class: String, member: String },

    /// An error raised inside a native method body.
    #[error("{0}")]
    Native(String),
}
