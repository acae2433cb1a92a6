//! Adapter synthesis and invocation for resolved method references.
//!
//! [`javelin_resolve`] decides *which* method a reference denotes; this crate
//! turns that decision into something callable. An [`Adapter`] binds the
//! resolved candidate to its calling convention (static, bound instance,
//! unbound instance, constructor) and, at each `invoke`, converts arguments,
//! packs varargs, dispatches through an explicit [`DispatchTable`], and
//! converts the result to the callback's declared return type.
//!
//! Adapters are immutable after synthesis and safe to share across threads;
//! a captured receiver follows its own type's locking discipline.

mod adapter;
mod dispatch;
mod error;
mod value;

pub use adapter::Adapter;
pub use dispatch::{DispatchTable, MethodKey, NativeFn};
pub use error::InvocationError;
pub use value::{convert_value, ArrayRef, Instance, ObjectRef, Value};
