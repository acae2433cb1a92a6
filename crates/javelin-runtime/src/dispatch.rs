use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;

use javelin_types::{ClassId, ClassKind, MethodCandidate, Type, TypeEnv};

use crate::{InvocationError, Value};

/// A native method body. The first argument is the receiver (`None` for
/// statics; the freshly allocated instance for constructors).
pub type NativeFn =
    Arc<dyn Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError> + Send + Sync>;

/// A declared method signature, minus the owner: the dispatch key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub name: String,
    pub params: Vec<Type>,
}

impl MethodKey {
    pub fn new(name: impl Into<String>, params: Vec<Type>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn of(candidate: &MethodCandidate) -> Self {
        Self {
            name: candidate.name.clone(),
            params: candidate.params.clone(),
        }
    }
}

/// Explicit dispatch table keyed by (declaring class, method signature).
///
/// Virtual dispatch walks the receiver's runtime class up the hierarchy until
/// a registration for the signature is found, so an override registered on a
/// subclass wins over the superclass entry. Static and constructor lookups
/// are exact.
#[derive(Default)]
pub struct DispatchTable {
    methods: HashMap<(ClassId, MethodKey), NativeFn>,
    constructors: HashMap<(ClassId, Vec<Type>), NativeFn>,
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("methods", &self.methods.len())
            .field("constructors", &self.constructors.len())
            .finish_non_exhaustive()
    }
}

impl DispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_method(
        &mut self,
        owner: ClassId,
        key: MethodKey,
        body: impl Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    ) {
        self.methods.insert((owner, key), Arc::new(body));
    }

    pub fn register_constructor(
        &mut self,
        owner: ClassId,
        params: Vec<Type>,
        body: impl Fn(Option<&Value>, &[Value]) -> Result<Value, InvocationError>
            + Send
            + Sync
            + 'static,
    ) {
        self.constructors.insert((owner, params), Arc::new(body));
    }

    /// Exact lookup, used for static methods.
    pub fn lookup_exact(&self, owner: ClassId, key: &MethodKey) -> Option<NativeFn> {
        self.methods.get(&(owner, key.clone())).cloned()
    }

    pub fn lookup_constructor(&self, owner: ClassId, params: &[Type]) -> Option<NativeFn> {
        self.constructors.get(&(owner, params.to_vec())).cloned()
    }

    /// Virtual lookup: start at the receiver's concrete class and walk
    /// supertypes breadth-first until the signature is registered.
    pub fn lookup_virtual(
        &self,
        env: &dyn TypeEnv,
        runtime_class: ClassId,
        key: &MethodKey,
    ) -> Option<NativeFn> {
        let mut queue: VecDeque<ClassId> = VecDeque::new();
        let mut seen: HashSet<ClassId> = HashSet::new();
        queue.push_back(runtime_class);

        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(body) = self.methods.get(&(current, key.clone())) {
                return Some(body.clone());
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
            if def.kind == ClassKind::Interface {
                queue.push_back(env.well_known().object);
            }
        }
        None
    }
}
