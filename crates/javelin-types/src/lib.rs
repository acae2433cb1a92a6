//! Shared type model for Javelin's method-reference engine.
//!
//! This crate is the value layer everything else builds on: semantic types,
//! class/method metadata, the nominal-hierarchy index ([`TypeEnv`] /
//! [`TypeStore`]) and the conversion predicates used by overload resolution.
//! It deliberately stops short of generics and wildcards; references are
//! resolved against erased signatures.

use std::fmt;

use serde::{Deserialize, Serialize};

mod convert;
mod store;
mod subtyping;

pub use convert::{convertible, widens_to};
pub use store::TypeStore;
pub use subtyping::is_subtype;

/// Interned identity of a declared class or interface.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClassId(pub u32);

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

/// The eight primitive kinds. Each has exactly one boxed counterpart, see
/// [`WellKnownTypes::boxed`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

/// A semantic type: primitive, nominal reference, array, or `void`.
///
/// Equality is structural. Arrays nest (`int[][]` is `Array(Array(Primitive))`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Primitive(PrimitiveType),
    Class(ClassId),
    Array(Box<Type>),
    Void,
}

impl Type {
    pub fn class(id: ClassId) -> Type {
        Type::Class(id)
    }

    pub fn array(elem: Type) -> Type {
        Type::Array(Box::new(elem))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    /// Render a Java-like spelling for diagnostics (`java.lang.String[]`,
    /// `int`, ...). Unknown class ids fall back to the raw id.
    pub fn display(&self, env: &dyn TypeEnv) -> String {
        match self {
            Type::Primitive(p) => p.keyword().to_string(),
            Type::Class(id) => env
                .class(*id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("<class#{}>", id.0)),
            Type::Array(elem) => format!("{}[]", elem.display(env)),
            Type::Void => "void".to_string(),
        }
    }
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A declared method or constructor, as it appears on its owner.
///
/// Constructors reuse this shape with the conventional name `<init>` and the
/// owner class as their notional return type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    /// When set, the last entry of `params` is the varargs array.
    pub is_varargs: bool,
    pub is_abstract: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    pub kind: ClassKind,
    pub super_class: Option<ClassId>,
    pub interfaces: Vec<ClassId>,
    pub constructors: Vec<MethodDef>,
    pub methods: Vec<MethodDef>,
}

/// A method (or constructor) paired with the class that declares it.
///
/// This is the unit overload resolution works over. Identity is
/// (owner, name, parameter sequence, static flag); the return type does not
/// participate in identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodCandidate {
    pub owner: ClassId,
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_varargs: bool,
}

impl MethodCandidate {
    pub fn from_def(owner: ClassId, def: &MethodDef) -> Self {
        Self {
            owner,
            name: def.name.clone(),
            params: def.params.clone(),
            return_type: def.return_type.clone(),
            is_static: def.is_static,
            is_varargs: def.is_varargs,
        }
    }

    /// Element type of the trailing varargs array, if this candidate is
    /// variable-arity and well-formed.
    pub fn varargs_element(&self) -> Option<&Type> {
        if !self.is_varargs {
            return None;
        }
        match self.params.last() {
            Some(Type::Array(elem)) => Some(elem),
            _ => None,
        }
    }

    /// `owner::name(param, ...)` spelling for diagnostics.
    pub fn display(&self, env: &dyn TypeEnv) -> String {
        let owner = env
            .class(self.owner)
            .map(|c| c.name.as_str())
            .unwrap_or("<unknown>");
        let params: Vec<String> = self.params.iter().map(|p| p.display(env)).collect();
        format!("{}::{}({})", owner, self.name, params.join(", "))
    }
}

/// Class ids the engine needs to know by name: `Object` and friends, plus the
/// boxed counterpart of every primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub number: ClassId,
    pub cloneable: ClassId,
    pub serializable: ClassId,
    pub boolean: ClassId,
    pub byte: ClassId,
    pub short: ClassId,
    pub character: ClassId,
    pub integer: ClassId,
    pub long: ClassId,
    pub float: ClassId,
    pub double: ClassId,
}

impl WellKnownTypes {
    /// The boxed class for a primitive. Total: every primitive has one.
    pub fn boxed(&self, p: PrimitiveType) -> ClassId {
        match p {
            PrimitiveType::Boolean => self.boolean,
            PrimitiveType::Byte => self.byte,
            PrimitiveType::Short => self.short,
            PrimitiveType::Char => self.character,
            PrimitiveType::Int => self.integer,
            PrimitiveType::Long => self.long,
            PrimitiveType::Float => self.float,
            PrimitiveType::Double => self.double,
        }
    }

    /// Inverse of [`WellKnownTypes::boxed`]: `Some` exactly for the eight
    /// boxed classes.
    pub fn primitive_for(&self, id: ClassId) -> Option<PrimitiveType> {
        if id == self.boolean {
            Some(PrimitiveType::Boolean)
        } else if id == self.byte {
            Some(PrimitiveType::Byte)
        } else if id == self.short {
            Some(PrimitiveType::Short)
        } else if id == self.character {
            Some(PrimitiveType::Char)
        } else if id == self.integer {
            Some(PrimitiveType::Int)
        } else if id == self.long {
            Some(PrimitiveType::Long)
        } else if id == self.float {
            Some(PrimitiveType::Float)
        } else if id == self.double {
            Some(PrimitiveType::Double)
        } else {
            None
        }
    }
}

/// Read-only view of the nominal type hierarchy.
///
/// Resolution and dispatch are pure queries over this index; nothing in the
/// engine mutates it after construction.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;
    fn lookup_class(&self, name: &str) -> Option<ClassId>;
    fn well_known(&self) -> &WellKnownTypes;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxing_is_a_bijection() {
        let store = TypeStore::with_minimal_jdk();
        let wk = store.well_known();
        let all = [
            PrimitiveType::Boolean,
            PrimitiveType::Byte,
            PrimitiveType::Short,
            PrimitiveType::Char,
            PrimitiveType::Int,
            PrimitiveType::Long,
            PrimitiveType::Float,
            PrimitiveType::Double,
        ];
        for p in all {
            assert_eq!(wk.primitive_for(wk.boxed(p)), Some(p));
        }
        assert_eq!(wk.primitive_for(wk.object), None);
        assert_eq!(wk.primitive_for(wk.string), None);
    }

    #[test]
    fn type_display_spells_java_types() {
        let store = TypeStore::with_minimal_jdk();
        let string = Type::class(store.well_known().string);
        assert_eq!(string.display(&store), "java.lang.String");
        assert_eq!(
            Type::array(Type::Primitive(PrimitiveType::Int)).display(&store),
            "int[]"
        );
        assert_eq!(Type::Void.display(&store), "void");
    }
}
