use javelin_types::{convertible, is_subtype, ClassDef, ClassKind, Type, TypeEnv, TypeStore};

use pretty_assertions::assert_eq;

#[test]
fn user_classes_participate_in_reference_widening() {
    let mut env = TypeStore::with_minimal_jdk();
    let object = env.well_known().object;

    let shape = env.add_class(ClassDef {
        name: "com.example.Shape".to_string(),
        kind: ClassKind::Class,
        super_class: Some(object),
        interfaces: vec![],
        constructors: vec![],
        methods: vec![],
    });
    let circle = env.add_class(ClassDef {
        name: "com.example.Circle".to_string(),
        kind: ClassKind::Class,
        super_class: Some(shape),
        interfaces: vec![],
        constructors: vec![],
        methods: vec![],
    });

    assert!(is_subtype(&env, &Type::class(circle), &Type::class(shape)));
    assert!(convertible(
        &env,
        &Type::class(circle),
        &Type::class(object),
        true
    ));
    assert!(!convertible(
        &env,
        &Type::class(shape),
        &Type::class(circle),
        false
    ));
}

#[test]
fn candidate_display_names_owner_and_params() {
    let env = TypeStore::with_minimal_jdk();
    let wk = env.well_known();
    let cand = javelin_types::MethodCandidate {
        owner: wk.string,
        name: "concat".to_string(),
        params: vec![Type::class(wk.string)],
        return_type: Type::class(wk.string),
        is_static: false,
        is_varargs: false,
    };
    assert_eq!(
        cand.display(&env),
        "java.lang.String::concat(java.lang.String)"
    );
}
