use javelin_types::{convertible, ClassId, MethodCandidate, Type, TypeEnv};

use crate::{collect_candidates, collect_constructors, CallbackSignature, ResolutionError};

/// The four calling conventions a reference expression can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefKind {
    /// `Type::method` naming a static method; no receiver slot consumed.
    Static,
    /// `expr::method`; the receiver is a fixed, already-evaluated value.
    BoundInstance,
    /// `Type::method` naming an instance method; the receiver arrives as the
    /// callback's first argument at call time.
    UnboundInstance,
    /// `Type::new`; invocation allocates a new instance.
    Constructor,
}

/// A reference expression, reduced to what resolution needs: the qualifying
/// class (for a bound reference, the receiver's runtime class), the member
/// name, and the calling convention. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodRef {
    pub qualifier: ClassId,
    /// `None` for constructor references.
    pub name: Option<String>,
    pub kind: RefKind,
}

impl MethodRef {
    pub fn static_method(qualifier: ClassId, name: impl Into<String>) -> Self {
        Self {
            qualifier,
            name: Some(name.into()),
            kind: RefKind::Static,
        }
    }

    pub fn bound(qualifier: ClassId, name: impl Into<String>) -> Self {
        Self {
            qualifier,
            name: Some(name.into()),
            kind: RefKind::BoundInstance,
        }
    }

    pub fn unbound(qualifier: ClassId, name: impl Into<String>) -> Self {
        Self {
            qualifier,
            name: Some(name.into()),
            kind: RefKind::UnboundInstance,
        }
    }

    pub fn constructor(qualifier: ClassId) -> Self {
        Self {
            qualifier,
            name: None,
            kind: RefKind::Constructor,
        }
    }

    fn member_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<init>")
    }
}

/// Which conversion rules the chosen phase promised. The invocation
/// dispatcher converts arguments accordingly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConversionMode {
    Strict,
    Loose,
}

/// Outcome of a successful resolution: the unique candidate plus everything
/// invocation needs to adapt call-site arguments to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedReference {
    pub candidate: MethodCandidate,
    pub kind: RefKind,
    pub mode: ConversionMode,
    /// Selected by the variable-arity phase; trailing arguments get packed.
    pub used_varargs: bool,
    /// The full target signature, including the receiver parameter for
    /// unbound references.
    pub target: CallbackSignature,
}

/// Resolve a reference expression against a callback signature.
///
/// Three ordered phases, each tried only when the previous one produced zero
/// applicable candidates (JLS 15.12.2): strict arity with strict conversion,
/// strict arity with loose conversion, then variable arity. Within a phase,
/// candidates whose return type cannot satisfy the target's are dropped
/// before the most-specific tie-break runs. Deterministic: identical inputs
/// give the identical candidate or error.
pub fn resolve_reference(
    env: &dyn TypeEnv,
    reference: &MethodRef,
    target: &CallbackSignature,
) -> Result<ResolvedReference, ResolutionError> {
    let name = reference.member_name().to_string();
    let mut candidates = match reference.kind {
        RefKind::Constructor => collect_constructors(env, reference.qualifier)?,
        _ => collect_candidates(env, reference.qualifier, &name)?,
    };
    candidates.retain(|c| match reference.kind {
        RefKind::Static => c.is_static,
        RefKind::BoundInstance | RefKind::UnboundInstance => !c.is_static,
        RefKind::Constructor => true,
    });

    let no_applicable = || ResolutionError::NoApplicableMethod {
        name: name.clone(),
        target: display_signature(env, target),
    };

    // An unbound reference consumes the callback's first parameter as the
    // synthesized receiver; it must convert to the qualifier type, boxing a
    // primitive first parameter if needed.
    let effective: &[Type] = match reference.kind {
        RefKind::UnboundInstance => {
            let Some((receiver, rest)) = target.params.split_first() else {
                return Err(no_applicable());
            };
            if !convertible(env, receiver, &Type::Class(reference.qualifier), false) {
                return Err(no_applicable());
            }
            rest
        }
        _ => &target.params,
    };

    for mode in [ConversionMode::Strict, ConversionMode::Loose] {
        let strict = mode == ConversionMode::Strict;
        let survivors: Vec<&MethodCandidate> = candidates
            .iter()
            .filter(|c| {
                c.params.len() == effective.len()
                    && effective
                        .iter()
                        .zip(&c.params)
                        .all(|(arg, param)| convertible(env, arg, param, strict))
                    && return_compatible(env, c, &target.return_type)
            })
            .collect();
        tracing::debug!(
            member = %name,
            phase = if strict { "strict" } else { "loose" },
            survivors = survivors.len(),
            "overload phase"
        );
        if !survivors.is_empty() {
            let winner = most_specific(env, &name, &survivors, None)?;
            return Ok(ResolvedReference {
                candidate: winner.clone(),
                kind: reference.kind,
                mode,
                used_varargs: false,
                target: target.clone(),
            });
        }
    }

    let survivors: Vec<&MethodCandidate> = candidates
        .iter()
        .filter(|c| {
            varargs_applicable(env, c, effective) && return_compatible(env, c, &target.return_type)
        })
        .collect();
    tracing::debug!(
        member = %name,
        phase = "varargs",
        survivors = survivors.len(),
        "overload phase"
    );
    if survivors.is_empty() {
        return Err(no_applicable());
    }
    let winner = most_specific(env, &name, &survivors, Some(effective.len()))?;
    Ok(ResolvedReference {
        candidate: winner.clone(),
        kind: reference.kind,
        mode: ConversionMode::Loose,
        used_varargs: true,
        target: target.clone(),
    })
}

fn varargs_applicable(env: &dyn TypeEnv, c: &MethodCandidate, effective: &[Type]) -> bool {
    let Some(elem) = c.varargs_element() else {
        return false;
    };
    let fixed = c.params.len() - 1;
    if effective.len() < fixed {
        return false;
    }
    effective[..fixed]
        .iter()
        .zip(&c.params[..fixed])
        .all(|(arg, param)| convertible(env, arg, param, false))
        && effective[fixed..]
            .iter()
            .all(|arg| convertible(env, arg, elem, false))
}

/// Final per-phase filter: the candidate's produced value must satisfy the
/// target's declared return type. A `void` target accepts anything; only a
/// `void` target accepts a `void` candidate.
fn return_compatible(env: &dyn TypeEnv, c: &MethodCandidate, target_return: &Type) -> bool {
    if target_return.is_void() {
        return true;
    }
    if c.return_type.is_void() {
        return false;
    }
    convertible(env, &c.return_type, target_return, false)
}

/// The most-specific tie-break over a phase's survivors.
///
/// A is more specific than B when each of A's parameter types
/// strict-converts to B's corresponding type and not vice versa at every
/// position. In the variable-arity phase both candidates are compared in
/// their arity-expanded form (`expanded_arity`). No unique maximal element
/// means the reference is ambiguous.
fn most_specific<'c>(
    env: &dyn TypeEnv,
    name: &str,
    survivors: &[&'c MethodCandidate],
    expanded_arity: Option<usize>,
) -> Result<&'c MethodCandidate, ResolutionError> {
    if survivors.len() == 1 {
        return Ok(survivors[0]);
    }

    let param_lists: Vec<Vec<Type>> = survivors
        .iter()
        .map(|c| match expanded_arity {
            None => c.params.clone(),
            Some(n) => {
                let fixed = c.params.len() - 1;
                let elem = c
                    .varargs_element()
                    .expect("variable-arity survivor has an array parameter")
                    .clone();
                let mut out = c.params[..fixed].to_vec();
                out.resize(n, elem);
                out
            }
        })
        .collect();

    let at_least_as_specific = |a: &[Type], b: &[Type]| {
        a.iter()
            .zip(b)
            .all(|(x, y)| convertible(env, x, y, true))
    };

    let maximal: Vec<usize> = (0..survivors.len())
        .filter(|&i| {
            // Keep i unless some j is strictly more specific than it.
            !(0..survivors.len()).any(|j| {
                j != i
                    && at_least_as_specific(&param_lists[j], &param_lists[i])
                    && !at_least_as_specific(&param_lists[i], &param_lists[j])
            })
        })
        .collect();

    if maximal.len() == 1 {
        return Ok(survivors[maximal[0]]);
    }

    let mut tied: Vec<String> = maximal.iter().map(|&i| survivors[i].display(env)).collect();
    tied.sort();
    Err(ResolutionError::AmbiguousReference {
        name: name.to_string(),
        candidates: tied,
    })
}

fn display_signature(env: &dyn TypeEnv, sig: &CallbackSignature) -> String {
    let params: Vec<String> = sig.params.iter().map(|p| p.display(env)).collect();
    format!(
        "({}) -> {}",
        params.join(", "),
        sig.return_type.display(env)
    )
}
