use std::collections::{HashSet, VecDeque};

use javelin_types::{ClassId, ClassKind, MethodCandidate, MethodDef, Type, TypeEnv};

use crate::ResolutionError;

/// All methods named `name` reachable from `qualifier` through the nominal
/// hierarchy: declared, inherited, and overloaded.
///
/// Traversal is breadth-first from the qualifier (superclass before
/// interfaces), so a more derived declaration is seen first and shadows a
/// less derived one with the identical (parameter types, static flag)
/// signature. Pure query; the order of the returned set is deterministic.
pub fn collect_candidates(
    env: &dyn TypeEnv,
    qualifier: ClassId,
    name: &str,
) -> Result<Vec<MethodCandidate>, ResolutionError> {
    let root = env
        .class(qualifier)
        .ok_or_else(|| ResolutionError::UnknownClass(format!("<class#{}>", qualifier.0)))?;

    let mut queue: VecDeque<ClassId> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(qualifier);

    let mut out: Vec<MethodCandidate> = Vec::new();

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        for m in &def.methods {
            if m.name != name {
                continue;
            }
            let shadowed = out
                .iter()
                .any(|c| c.params == m.params && c.is_static == m.is_static);
            if !shadowed {
                out.push(MethodCandidate::from_def(current, m));
            }
        }
        if let Some(sc) = def.super_class {
            queue.push_back(sc);
        }
        for iface in &def.interfaces {
            queue.push_back(*iface);
        }
        if def.kind == ClassKind::Interface {
            queue.push_back(env.well_known().object);
        }
    }

    if out.is_empty() {
        return Err(ResolutionError::NoSuchMember {
            type_name: root.name.clone(),
            name: name.to_string(),
        });
    }
    Ok(out)
}

/// The constructors declared on `qualifier`. Constructors are not inherited;
/// a class declaring none gets the implicit no-argument constructor
/// (JLS 8.8.9).
pub fn collect_constructors(
    env: &dyn TypeEnv,
    qualifier: ClassId,
) -> Result<Vec<MethodCandidate>, ResolutionError> {
    let def = env
        .class(qualifier)
        .ok_or_else(|| ResolutionError::UnknownClass(format!("<class#{}>", qualifier.0)))?;

    if def.constructors.is_empty() {
        let implicit = MethodDef {
            name: "<init>".to_string(),
            params: vec![],
            return_type: Type::Class(qualifier),
            is_static: false,
            is_varargs: false,
            is_abstract: false,
        };
        return Ok(vec![MethodCandidate::from_def(qualifier, &implicit)]);
    }

    Ok(def
        .constructors
        .iter()
        .map(|c| {
            let mut cand = MethodCandidate::from_def(qualifier, c);
            // Constructor declarations carry no meaningful return type; the
            // resolver treats the owner class as the produced value's type.
            cand.return_type = Type::Class(qualifier);
            cand
        })
        .collect())
}
