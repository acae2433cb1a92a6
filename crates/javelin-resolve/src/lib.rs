//! Method-reference resolution for Javelin.
//!
//! Given a reference expression (`Type::method`, `expr::method`, `Type::new`)
//! and the single-abstract-method signature of a target callback interface,
//! this crate picks the one declared method or constructor the reference
//! denotes. Candidate collection walks the nominal hierarchy, then a
//! three-phase applicability algorithm (strict, loose, variable-arity) with a
//! most-specific tie-break selects the winner or reports why it can't.
//!
//! Resolution is deterministic, synchronous, and side-effect free; callers
//! typically run it once per reference expression at translation time.

mod collect;
mod error;
mod overload;
mod sam;

pub use collect::{collect_candidates, collect_constructors};
pub use error::ResolutionError;
pub use overload::{
    resolve_reference, ConversionMode, MethodRef, RefKind, ResolvedReference,
};
pub use sam::{abstract_signature_of, CallbackSignature, SamIndex};
