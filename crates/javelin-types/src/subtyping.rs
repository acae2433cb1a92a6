use std::collections::{HashSet, VecDeque};

use crate::{ClassId, ClassKind, Type, TypeEnv};

/// Nominal subtyping over erased types.
///
/// Identity, reference widening through the class/interface hierarchy, array
/// covariance for reference element types, and the three array supertypes
/// (`Object`, `Cloneable`, `Serializable`). Primitives are subtypes only of
/// themselves; widening between primitives is a conversion, not subtyping
/// (see [`crate::convertible`]).
pub fn is_subtype(env: &dyn TypeEnv, a: &Type, b: &Type) -> bool {
    if a == b {
        return true;
    }
    match (a, b) {
        (Type::Class(a_id), Type::Class(b_id)) => class_extends(env, *a_id, *b_id),
        (Type::Array(a_elem), Type::Array(b_elem)) => {
            // Arrays of primitives are invariant; `int[]` is not `long[]`.
            matches!(**a_elem, Type::Class(_) | Type::Array(_))
                && is_subtype(env, a_elem, b_elem)
        }
        (Type::Array(_), Type::Class(b_id)) => {
            let wk = env.well_known();
            *b_id == wk.object || *b_id == wk.cloneable || *b_id == wk.serializable
        }
        _ => false,
    }
}

fn class_extends(env: &dyn TypeEnv, a: ClassId, b: ClassId) -> bool {
    let mut queue: VecDeque<ClassId> = VecDeque::new();
    let mut seen: HashSet<ClassId> = HashSet::new();
    queue.push_back(a);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if current == b {
            return true;
        }
        let Some(def) = env.class(current) else {
            continue;
        };
        if let Some(sc) = def.super_class {
            queue.push_back(sc);
        }
        for iface in &def.interfaces {
            queue.push_back(*iface);
        }
        // Every interface implicitly has Object as a supertype (JLS 4.10.2).
        if def.kind == ClassKind::Interface {
            queue.push_back(env.well_known().object);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDef, TypeStore};

    #[test]
    fn boxed_numeric_widens_to_number_and_object() {
        let env = TypeStore::with_minimal_jdk();
        let wk = env.well_known();
        let integer = Type::class(wk.integer);
        assert!(is_subtype(&env, &integer, &Type::class(wk.number)));
        assert!(is_subtype(&env, &integer, &Type::class(wk.object)));
        assert!(!is_subtype(&env, &Type::class(wk.number), &integer));
    }

    #[test]
    fn interfaces_are_subtypes_of_object() {
        let env = TypeStore::with_minimal_jdk();
        let wk = env.well_known();
        assert!(is_subtype(
            &env,
            &Type::class(wk.cloneable),
            &Type::class(wk.object)
        ));
    }

    #[test]
    fn arrays_are_covariant_in_reference_elements_only() {
        let env = TypeStore::with_minimal_jdk();
        let wk = env.well_known();
        let string_arr = Type::array(Type::class(wk.string));
        let object_arr = Type::array(Type::class(wk.object));
        assert!(is_subtype(&env, &string_arr, &object_arr));
        assert!(!is_subtype(&env, &object_arr, &string_arr));

        let int_arr = Type::array(Type::Primitive(crate::PrimitiveType::Int));
        let long_arr = Type::array(Type::Primitive(crate::PrimitiveType::Long));
        assert!(!is_subtype(&env, &int_arr, &long_arr));

        assert!(is_subtype(&env, &int_arr, &Type::class(wk.object)));
        assert!(is_subtype(&env, &string_arr, &Type::class(wk.serializable)));
    }

    #[test]
    fn interface_inheritance_is_transitive() {
        let mut env = TypeStore::with_minimal_jdk();
        let wk = env.well_known().clone();
        let base = env.add_class(ClassDef {
            name: "com.example.Base".to_string(),
            kind: crate::ClassKind::Class,
            super_class: Some(wk.object),
            interfaces: vec![wk.cloneable],
            constructors: vec![],
            methods: vec![],
        });
        let derived = env.add_class(ClassDef {
            name: "com.example.Derived".to_string(),
            kind: crate::ClassKind::Class,
            super_class: Some(base),
            interfaces: vec![],
            constructors: vec![],
            methods: vec![],
        });
        assert!(is_subtype(
            &env,
            &Type::class(derived),
            &Type::class(wk.cloneable)
        ));
        assert!(is_subtype(&env, &Type::class(derived), &Type::class(base)));
        assert!(!is_subtype(&env, &Type::class(base), &Type::class(derived)));
    }
}
