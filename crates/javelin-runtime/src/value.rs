use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use javelin_types::{widens_to, ClassId, PrimitiveType, Type, TypeEnv};

use crate::InvocationError;

/// A runtime value.
///
/// Boxed numerics share the primitive representations; boxing and unboxing
/// are static-type notions and cost nothing at runtime, except `Null` flowing
/// into a primitive slot, which is a conversion error.
#[derive(Clone, Debug)]
pub enum Value {
    Null,
    /// The absence of a value, produced for `void` callback returns.
    Void,
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(Arc<str>),
    Object(ObjectRef),
    Array(ArrayRef),
}

pub type ObjectRef = Arc<Instance>;

/// A heap object: its concrete class plus named fields. Field access is
/// mutex-guarded so bound-instance adapters stay shareable across threads.
#[derive(Debug)]
pub struct Instance {
    pub class: ClassId,
    fields: Mutex<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: ClassId) -> ObjectRef {
        Arc::new(Self {
            class,
            fields: Mutex::new(HashMap::new()),
        })
    }

    pub fn set_field(&self, name: &str, value: Value) {
        self.fields
            .lock()
            .expect("instance field lock poisoned")
            .insert(name.to_string(), value);
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.fields
            .lock()
            .expect("instance field lock poisoned")
            .get(name)
            .cloned()
    }
}

/// A reference-semantics array with a declared element type.
#[derive(Clone, Debug)]
pub struct ArrayRef(Arc<ArrayData>);

#[derive(Debug)]
struct ArrayData {
    elem: Type,
    values: Mutex<Vec<Value>>,
}

impl ArrayRef {
    pub fn new(elem: Type, values: Vec<Value>) -> Self {
        Self(Arc::new(ArrayData {
            elem,
            values: Mutex::new(values),
        }))
    }

    pub fn element_type(&self) -> &Type {
        &self.0.elem
    }

    pub fn len(&self) -> usize {
        self.0.values.lock().expect("array lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0
            .values
            .lock()
            .expect("array lock poisoned")
            .get(index)
            .cloned()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.values.lock().expect("array lock poisoned").clone()
    }
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Value {
        Value::Str(s.into())
    }

    /// The primitive kind this value can act as, if any.
    pub fn primitive_kind(&self) -> Option<PrimitiveType> {
        match self {
            Value::Boolean(_) => Some(PrimitiveType::Boolean),
            Value::Byte(_) => Some(PrimitiveType::Byte),
            Value::Short(_) => Some(PrimitiveType::Short),
            Value::Char(_) => Some(PrimitiveType::Char),
            Value::Int(_) => Some(PrimitiveType::Int),
            Value::Long(_) => Some(PrimitiveType::Long),
            Value::Float(_) => Some(PrimitiveType::Float),
            Value::Double(_) => Some(PrimitiveType::Double),
            _ => None,
        }
    }

    /// The concrete class virtual dispatch keys on. Primitives answer with
    /// their boxed class, so a boxed receiver dispatches like any object.
    pub fn runtime_class(&self, env: &dyn TypeEnv) -> Option<ClassId> {
        let wk = env.well_known();
        match self {
            Value::Object(obj) => Some(obj.class),
            Value::Str(_) => Some(wk.string),
            Value::Array(_) => Some(wk.object),
            other => other.primitive_kind().map(|p| wk.boxed(p)),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(*v as i64),
            Value::Short(v) => Some(*v as i64),
            Value::Char(v) => Some(*v as u32 as i64),
            Value::Int(v) => Some(*v as i64),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v as f64),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    fn describe(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Void => "void".to_string(),
            Value::Str(_) => "String".to_string(),
            Value::Object(_) => "object".to_string(),
            Value::Array(_) => "array".to_string(),
            other => other
                .primitive_kind()
                .map(|p| p.keyword().to_string())
                .unwrap_or_else(|| "value".to_string()),
        }
    }
}

/// Java-flavoured string conversion, for native bodies that concatenate.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Void => write!(f, "void"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Object(obj) => write!(f, "Object@{:p}", Arc::as_ptr(obj)),
            Value::Array(arr) => {
                write!(f, "[")?;
                for (i, v) in arr.to_vec().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Void, Value::Void) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }
}

/// Convert a runtime value to a declared type.
///
/// Primitive targets unbox and widen; `Null` into a primitive is the classic
/// failed-unboxing [`InvocationError::ConversionError`]. Reference targets
/// leave the representation untouched (boxing is a no-op at runtime).
pub fn convert_value(
    env: &dyn TypeEnv,
    value: &Value,
    to: &Type,
) -> Result<Value, InvocationError> {
    match to {
        Type::Primitive(p) => widen_primitive(value, *p).ok_or_else(|| {
            InvocationError::ConversionError {
                value: value.describe(),
                expected: to.display(env),
            }
        }),
        _ => Ok(value.clone()),
    }
}

fn widen_primitive(value: &Value, to: PrimitiveType) -> Option<Value> {
    let from = value.primitive_kind()?;
    if from == to {
        return Some(value.clone());
    }
    if !widens_to(from, to) {
        return None;
    }
    match to {
        PrimitiveType::Short => Some(Value::Short(value.as_i64()? as i16)),
        PrimitiveType::Int => Some(Value::Int(value.as_i64()? as i32)),
        PrimitiveType::Long => Some(Value::Long(value.as_i64()?)),
        PrimitiveType::Float => Some(Value::Float(value.as_f64()? as f32)),
        PrimitiveType::Double => Some(Value::Double(value.as_f64()?)),
        // Nothing widens into these.
        PrimitiveType::Boolean | PrimitiveType::Byte | PrimitiveType::Char => None,
    }
}
