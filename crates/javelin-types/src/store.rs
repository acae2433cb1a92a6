use std::collections::HashMap;

use crate::{
    ClassDef, ClassId, ClassKind, MethodDef, PrimitiveType, Type, TypeEnv, WellKnownTypes,
};

/// Concrete [`TypeEnv`] backed by an append-only class table.
///
/// Classes are registered once (typically at load time) and the store is
/// treated as read-only data afterwards. `class_mut` exists for test fixtures
/// that patch seeded classes.
#[derive(Clone, Debug)]
pub struct TypeStore {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    well_known: WellKnownTypes,
}

impl TypeStore {
    /// A store seeded with the small slice of `java.lang`/`java.io` the
    /// engine needs: `Object` with its universal methods, `String`, `Number`,
    /// the array marker interfaces, and the eight boxed types.
    pub fn with_minimal_jdk() -> Self {
        let mut classes: Vec<ClassDef> = Vec::new();
        let mut by_name: HashMap<String, ClassId> = HashMap::new();

        let add = |classes: &mut Vec<ClassDef>,
                       by_name: &mut HashMap<String, ClassId>,
                       def: ClassDef|
         -> ClassId {
            let id = ClassId(classes.len() as u32);
            by_name.insert(def.name.clone(), id);
            classes.push(def);
            id
        };

        let class = |name: &str, super_class: Option<ClassId>| ClassDef {
            name: name.to_string(),
            kind: ClassKind::Class,
            super_class,
            interfaces: vec![],
            constructors: vec![],
            methods: vec![],
        };
        let interface = |name: &str| ClassDef {
            name: name.to_string(),
            kind: ClassKind::Interface,
            super_class: None,
            interfaces: vec![],
            constructors: vec![],
            methods: vec![],
        };

        let object = add(&mut classes, &mut by_name, class("java.lang.Object", None));
        let string = add(
            &mut classes,
            &mut by_name,
            class("java.lang.String", Some(object)),
        );
        let number = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Number", Some(object)),
        );
        let cloneable = add(&mut classes, &mut by_name, interface("java.lang.Cloneable"));
        let serializable = add(&mut classes, &mut by_name, interface("java.io.Serializable"));

        let boolean = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Boolean", Some(object)),
        );
        let character = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Character", Some(object)),
        );
        let byte = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Byte", Some(number)),
        );
        let short = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Short", Some(number)),
        );
        let integer = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Integer", Some(number)),
        );
        let long = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Long", Some(number)),
        );
        let float = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Float", Some(number)),
        );
        let double = add(
            &mut classes,
            &mut by_name,
            class("java.lang.Double", Some(number)),
        );

        // Object's universal methods (JLS 4.3.2). SAM derivation must skip
        // these when they surface as abstract interface members.
        classes[object.0 as usize].methods = vec![
            MethodDef {
                name: "equals".to_string(),
                params: vec![Type::Class(object)],
                return_type: Type::Primitive(PrimitiveType::Boolean),
                is_static: false,
                is_varargs: false,
                is_abstract: false,
            },
            MethodDef {
                name: "hashCode".to_string(),
                params: vec![],
                return_type: Type::Primitive(PrimitiveType::Int),
                is_static: false,
                is_varargs: false,
                is_abstract: false,
            },
            MethodDef {
                name: "toString".to_string(),
                params: vec![],
                return_type: Type::Class(string),
                is_static: false,
                is_varargs: false,
                is_abstract: false,
            },
        ];

        Self {
            classes,
            by_name,
            well_known: WellKnownTypes {
                object,
                string,
                number,
                cloneable,
                serializable,
                boolean,
                byte,
                short,
                character,
                integer,
                long,
                float,
                double,
            },
        }
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.classes.push(def);
        id
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.0 as usize)
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.0 as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        self.by_name.get(name).copied()
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_jdk_names_resolve() {
        let store = TypeStore::with_minimal_jdk();
        assert_eq!(
            store.class_id("java.lang.Object"),
            Some(store.well_known().object)
        );
        assert_eq!(
            store.class_id("java.lang.Integer"),
            Some(store.well_known().integer)
        );
        assert_eq!(store.class_id("java.util.List"), None);
    }

    #[test]
    fn numeric_boxes_extend_number() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known();
        for id in [wk.byte, wk.short, wk.integer, wk.long, wk.float, wk.double] {
            let def = store.class(id).unwrap();
            assert_eq!(def.super_class, Some(wk.number));
        }
        let boolean = store.class(wk.boolean).unwrap();
        assert_eq!(boolean.super_class, Some(wk.object));
    }
}
