use javelin_resolve::{RefKind, ResolvedReference};
use javelin_types::TypeEnv;

use crate::{
    convert_value, ArrayRef, DispatchTable, Instance, InvocationError, MethodKey, Value,
};

/// A resolved reference bound to its calling convention: the callable unit
/// backing a callback value.
///
/// Synthesis never invokes target code. A bound-instance adapter captures its
/// receiver exactly once, at synthesis; all other kinds hold no receiver
/// state. Immutable thereafter.
#[derive(Clone, Debug)]
pub struct Adapter {
    resolved: ResolvedReference,
    receiver: Option<Value>,
}

impl Adapter {
    /// Synthesize an adapter for a static, unbound-instance, or constructor
    /// reference.
    pub fn new(resolved: ResolvedReference) -> Self {
        debug_assert!(
            resolved.kind != RefKind::BoundInstance,
            "bound references capture a receiver; use Adapter::bound"
        );
        Self {
            resolved,
            receiver: None,
        }
    }

    /// Synthesize a bound-instance adapter, capturing `receiver` now.
    pub fn bound(resolved: ResolvedReference, receiver: Value) -> Self {
        debug_assert!(resolved.kind == RefKind::BoundInstance);
        Self {
            resolved,
            receiver: Some(receiver),
        }
    }

    pub fn resolved(&self) -> &ResolvedReference {
        &self.resolved
    }

    /// Invoke the adapter with the callback's argument list.
    ///
    /// Checks arity against the callback signature, converts each argument to
    /// the candidate's declared parameter type, packs trailing arguments into
    /// a varargs array when the variable-arity phase selected the candidate,
    /// dispatches (virtually for instance methods, exactly for statics,
    /// allocating for constructors), and converts the result to the
    /// callback's declared return type.
    pub fn invoke(
        &self,
        env: &dyn TypeEnv,
        table: &DispatchTable,
        args: &[Value],
    ) -> Result<Value, InvocationError> {
        let expected = self.resolved.target.params.len();
        if args.len() != expected {
            return Err(InvocationError::ArityMismatch {
                expected,
                actual: args.len(),
            });
        }

        let cand = &self.resolved.candidate;
        let (receiver, call_args): (Option<&Value>, &[Value]) = match self.resolved.kind {
            RefKind::Static | RefKind::Constructor => (None, args),
            RefKind::BoundInstance => (self.receiver.as_ref(), args),
            RefKind::UnboundInstance => {
                let (recv, rest) = args
                    .split_first()
                    .expect("arity checked against a receiver-consuming signature");
                (Some(recv), rest)
            }
        };

        let converted = self.convert_arguments(env, call_args)?;
        tracing::trace!(
            member = %cand.name,
            kind = ?self.resolved.kind,
            varargs = self.resolved.used_varargs,
            "dispatching adapter invocation"
        );

        let result = match self.resolved.kind {
            RefKind::Static => {
                let key = MethodKey::of(cand);
                let body = table.lookup_exact(cand.owner, &key).ok_or_else(|| {
                    self.missing_native(env)
                })?;
                body(None, &converted)?
            }
            RefKind::Constructor => {
                // Allocation happens here; the registered body only
                // initializes. Bare allocation stands in solely for the
                // implicit default constructor; a declared constructor
                // without a body is a missing native.
                let instance = Value::Object(Instance::new(cand.owner));
                if let Some(body) = table.lookup_constructor(cand.owner, &cand.params) {
                    body(Some(&instance), &converted)?;
                } else {
                    let declared = env
                        .class(cand.owner)
                        .map(|c| !c.constructors.is_empty())
                        .unwrap_or(false);
                    if declared {
                        return Err(self.missing_native(env));
                    }
                }
                instance
            }
            RefKind::BoundInstance | RefKind::UnboundInstance => {
                let recv = receiver.expect("instance kinds carry a receiver");
                if *recv == Value::Null {
                    return Err(InvocationError::NullReceiver(cand.name.clone()));
                }
                let runtime_class = recv
                    .runtime_class(env)
                    .ok_or_else(|| InvocationError::NullReceiver(cand.name.clone()))?;
                let key = MethodKey::of(cand);
                let body = table
                    .lookup_virtual(env, runtime_class, &key)
                    .ok_or_else(|| self.missing_native(env))?;
                body(Some(recv), &converted)?
            }
        };

        let target_return = &self.resolved.target.return_type;
        if target_return.is_void() {
            return Ok(Value::Void);
        }
        convert_value(env, &result, target_return)
    }

    /// Convert call-site arguments to the candidate's declared parameter
    /// types, packing the varargs tail when resolution chose the
    /// variable-arity form. Zero trailing arguments pack an empty array.
    fn convert_arguments(
        &self,
        env: &dyn TypeEnv,
        call_args: &[Value],
    ) -> Result<Vec<Value>, InvocationError> {
        let cand = &self.resolved.candidate;
        if !self.resolved.used_varargs {
            return call_args
                .iter()
                .zip(&cand.params)
                .map(|(arg, param)| convert_value(env, arg, param))
                .collect();
        }

        let fixed = cand.params.len() - 1;
        let elem = self
            .resolved
            .candidate
            .varargs_element()
            .expect("variable-arity resolution implies an array parameter")
            .clone();

        let mut out = Vec::with_capacity(cand.params.len());
        for (arg, param) in call_args[..fixed].iter().zip(&cand.params[..fixed]) {
            out.push(convert_value(env, arg, param)?);
        }
        let mut tail = Vec::with_capacity(call_args.len() - fixed);
        for arg in &call_args[fixed..] {
            tail.push(convert_value(env, arg, &elem)?);
        }
        out.push(Value::Array(ArrayRef::new(elem, tail)));
        Ok(out)
    }

    fn missing_native(&self, env: &dyn TypeEnv) -> InvocationError {
        let cand = &self.resolved.candidate;
        let class = env
            .class(cand.owner)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| format!("<class#{}>", cand.owner.0));
        InvocationError::MissingNative {
            class,
            member: cand.name.clone(),
        }
    }
}
