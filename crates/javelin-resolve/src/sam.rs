use std::collections::{HashMap, HashSet, VecDeque};

use javelin_types::{ClassId, ClassKind, PrimitiveType, Type, TypeEnv};

use crate::ResolutionError;

/// The single abstract method of a callback interface: what a reference
/// expression must be adapted to satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackSignature {
    pub params: Vec<Type>,
    pub return_type: Type,
}

/// Caches one [`CallbackSignature`] per interface type.
///
/// Derivation walks the interface hierarchy once; subsequent lookups are hash
/// hits. The index never invalidates, matching the read-only contract of the
/// underlying [`TypeEnv`].
#[derive(Debug, Default)]
pub struct SamIndex {
    cache: HashMap<ClassId, CallbackSignature>,
}

impl SamIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signature_of(
        &mut self,
        env: &dyn TypeEnv,
        iface: ClassId,
    ) -> Result<CallbackSignature, ResolutionError> {
        if let Some(sig) = self.cache.get(&iface) {
            return Ok(sig.clone());
        }
        let sig = abstract_signature_of(env, iface)?;
        self.cache.insert(iface, sig.clone());
        Ok(sig)
    }
}

/// Derive the single-abstract-method signature of `iface`.
///
/// Abstract instance methods are collected across the interface and its
/// superinterfaces, deduplicated by (name, parameter types) with the most
/// derived declaration winning, and with `java.lang.Object`'s universal
/// methods excluded (JLS 9.8). Anything other than exactly one survivor is
/// [`ResolutionError::NotFunctional`].
pub fn abstract_signature_of(
    env: &dyn TypeEnv,
    iface: ClassId,
) -> Result<CallbackSignature, ResolutionError> {
    let root = env
        .class(iface)
        .ok_or_else(|| ResolutionError::UnknownClass(format!("<class#{}>", iface.0)))?;
    if root.kind != ClassKind::Interface {
        return Err(ResolutionError::NotFunctional {
            type_name: root.name.clone(),
            abstract_count: 0,
        });
    }

    let mut queue: VecDeque<ClassId> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(iface);

    // (name, params) -> return type; first insertion (most derived) wins.
    let mut abstracts: HashMap<(String, Vec<Type>), Type> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        for m in &def.methods {
            if m.is_static || !m.is_abstract {
                continue;
            }
            if is_object_method(env, &m.name, &m.params, &m.return_type) {
                continue;
            }
            abstracts
                .entry((m.name.clone(), m.params.clone()))
                .or_insert_with(|| m.return_type.clone());
        }
        for sup in &def.interfaces {
            queue.push_back(*sup);
        }
    }

    if abstracts.len() != 1 {
        return Err(ResolutionError::NotFunctional {
            type_name: root.name.clone(),
            abstract_count: abstracts.len(),
        });
    }
    let ((_name, params), return_type) = abstracts.into_iter().next().expect("len checked");
    Ok(CallbackSignature {
        params,
        return_type,
    })
}

/// Does the signature redeclare a `java.lang.Object` method? Such members do
/// not count towards an interface's abstract-method tally.
fn is_object_method(env: &dyn TypeEnv, name: &str, params: &[Type], return_type: &Type) -> bool {
    let wk = env.well_known();
    match name {
        "equals" => {
            params.len() == 1
                && params[0] == Type::Class(wk.object)
                && *return_type == Type::Primitive(PrimitiveType::Boolean)
        }
        "hashCode" => params.is_empty() && *return_type == Type::Primitive(PrimitiveType::Int),
        "toString" => params.is_empty() && *return_type == Type::Class(wk.string),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use javelin_types::{ClassDef, MethodDef, TypeStore};

    fn abstract_method(name: &str, params: Vec<Type>, return_type: Type) -> MethodDef {
        MethodDef {
            name: name.to_string(),
            params,
            return_type,
            is_static: false,
            is_varargs: false,
            is_abstract: true,
        }
    }

    fn iface(name: &str, interfaces: Vec<ClassId>, methods: Vec<MethodDef>) -> ClassDef {
        ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            super_class: None,
            interfaces,
            constructors: vec![],
            methods,
        }
    }

    #[test]
    fn single_abstract_method_is_extracted() {
        let mut env = TypeStore::with_minimal_jdk();
        let string = Type::class(env.well_known().string);
        let f = env.add_class(iface(
            "com.example.Fn",
            vec![],
            vec![abstract_method("apply", vec![string.clone()], string.clone())],
        ));

        let sig = abstract_signature_of(&env, f).unwrap();
        assert_eq!(sig.params, vec![string.clone()]);
        assert_eq!(sig.return_type, string);
    }

    #[test]
    fn default_and_static_methods_are_ignored() {
        let mut env = TypeStore::with_minimal_jdk();
        let string = Type::class(env.well_known().string);
        let f = env.add_class(iface(
            "com.example.Fn",
            vec![],
            vec![
                MethodDef {
                    name: "andThen".to_string(),
                    params: vec![],
                    return_type: Type::Void,
                    is_static: false,
                    is_varargs: false,
                    is_abstract: false,
                },
                MethodDef {
                    name: "identity".to_string(),
                    params: vec![],
                    return_type: string.clone(),
                    is_static: true,
                    is_varargs: false,
                    is_abstract: true,
                },
                abstract_method("apply", vec![string.clone()], string.clone()),
            ],
        ));

        let sig = abstract_signature_of(&env, f).unwrap();
        assert_eq!(sig.params, vec![string]);
    }

    #[test]
    fn object_method_redeclarations_do_not_count() {
        let mut env = TypeStore::with_minimal_jdk();
        let wk = env.well_known().clone();
        // Comparator-style: compare + an abstract redeclaration of equals.
        let f = env.add_class(iface(
            "com.example.Cmp",
            vec![],
            vec![
                abstract_method(
                    "compare",
                    vec![Type::class(wk.object), Type::class(wk.object)],
                    Type::Primitive(PrimitiveType::Int),
                ),
                abstract_method(
                    "equals",
                    vec![Type::class(wk.object)],
                    Type::Primitive(PrimitiveType::Boolean),
                ),
            ],
        ));

        let sig = abstract_signature_of(&env, f).unwrap();
        assert_eq!(sig.params.len(), 2);
    }

    #[test]
    fn inherited_abstract_method_counts_once() {
        let mut env = TypeStore::with_minimal_jdk();
        let string = Type::class(env.well_known().string);
        let base = env.add_class(iface(
            "com.example.Base",
            vec![],
            vec![abstract_method("run", vec![], string.clone())],
        ));
        // Re-declares the same signature; still functional.
        let derived = env.add_class(iface(
            "com.example.Derived",
            vec![base],
            vec![abstract_method("run", vec![], string.clone())],
        ));

        let sig = abstract_signature_of(&env, derived).unwrap();
        assert_eq!(sig.return_type, string);
    }

    #[test]
    fn two_abstract_methods_are_rejected() {
        let mut env = TypeStore::with_minimal_jdk();
        let string = Type::class(env.well_known().string);
        let f = env.add_class(iface(
            "com.example.Bi",
            vec![],
            vec![
                abstract_method("a", vec![], string.clone()),
                abstract_method("b", vec![], string),
            ],
        ));

        assert_eq!(
            abstract_signature_of(&env, f),
            Err(ResolutionError::NotFunctional {
                type_name: "com.example.Bi".to_string(),
                abstract_count: 2,
            })
        );
    }

    #[test]
    fn classes_are_not_functional_interfaces() {
        let env = TypeStore::with_minimal_jdk();
        let string = env.well_known().string;
        assert!(matches!(
            abstract_signature_of(&env, string),
            Err(ResolutionError::NotFunctional { .. })
        ));
    }

    #[test]
    fn sam_index_caches_derivation() {
        let mut env = TypeStore::with_minimal_jdk();
        let string = Type::class(env.well_known().string);
        let f = env.add_class(iface(
            "com.example.Fn",
            vec![],
            vec![abstract_method("apply", vec![], string)],
        ));

        let mut index = SamIndex::new();
        let first = index.signature_of(&env, f).unwrap();
        let second = index.signature_of(&env, f).unwrap();
        assert_eq!(first, second);
    }
}
