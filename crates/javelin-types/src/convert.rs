use crate::{is_subtype, PrimitiveType, Type, TypeEnv};

/// Widening primitive conversion (JLS 5.1.2).
///
/// `from == to` is not widening; callers that want reflexivity check identity
/// first.
pub fn widens_to(from: PrimitiveType, to: PrimitiveType) -> bool {
    use PrimitiveType::*;
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short => matches!(to, Int | Long | Float | Double),
        Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => matches!(to, Double),
        Boolean | Double => false,
    }
}

/// Conversion compatibility between an argument's static type and a declared
/// parameter type. Pure predicate; never fails.
///
/// Strict mode admits identity and reference widening only. Loose mode layers
/// Java's method-invocation conversions on top: widening primitive
/// conversion, boxing followed by reference widening (`int` to `Integer`,
/// `Number`, or `Object`), and unboxing followed by widening primitive
/// conversion (`Integer` to `int` or `long`).
pub fn convertible(env: &dyn TypeEnv, from: &Type, to: &Type, strict: bool) -> bool {
    if is_subtype(env, from, to) {
        return true;
    }
    if strict {
        return false;
    }
    let wk = env.well_known();
    match (from, to) {
        (Type::Primitive(p), Type::Primitive(q)) => widens_to(*p, *q),
        (Type::Primitive(p), Type::Class(_) | Type::Array(_)) => {
            let boxed = Type::Class(wk.boxed(*p));
            is_subtype(env, &boxed, to)
        }
        (Type::Class(id), Type::Primitive(q)) => match wk.primitive_for(*id) {
            Some(p) => p == *q || widens_to(p, *q),
            None => false,
        },
        _ => false,
    }
}
